use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::StatusCode,
    response::{Html, Json},
};

use crate::api::models::*;
use crate::api::routes::AppState;
use crate::previsao;

const BOAS_VINDAS: &str = "👋 Olá! Sou o assistente do sistema de previsão de resíduos. \
Envie uma pergunta e eu respondo com a ajuda da IA do projeto.";

type RespostaErro = (StatusCode, Json<ErrorResponse>);

fn erro_http(status: StatusCode, mensagem: String) -> RespostaErro {
    (status, Json(ErrorResponse { error: mensagem }))
}

// ========== STATUS ==========

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "API em execução" }))
}

// ========== PREVISÃO ==========

pub async fn prever(
    State(estado): State<AppState>,
    payload: Result<Json<PreverRequest>, JsonRejection>,
) -> Result<Json<PreverResponse>, RespostaErro> {
    let Json(requisicao) = payload
        .map_err(|e| erro_http(StatusCode::BAD_REQUEST, format!("corpo inválido: {}", e)))?;

    let pedido = requisicao
        .validar()
        .map_err(|e| erro_http(StatusCode::BAD_REQUEST, e.to_string()))?;

    let resultado = previsao::gerar_previsao(&pedido, &estado.artefatos, &estado.politica)
        .map_err(|e| erro_http(StatusCode::BAD_REQUEST, e.to_string()))?;

    // Disparo "fire-and-forget": falha de notificação nunca chega ao chamador.
    for alerta in &resultado.alertas {
        if let Err(e) = estado.notificador.enviar_alerta(alerta).await {
            tracing::warn!("⚠️ Falha ao enviar alerta ao Telegram: {}", e);
        }
    }

    Ok(Json(PreverResponse {
        start_date: pedido.data_inicial.to_string(),
        sensor_count: pedido.sensor_count,
        days: pedido.dias,
        predictions: resultado.previsoes,
    }))
}

// ========== IA ==========

pub async fn perguntar(
    State(estado): State<AppState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, RespostaErro> {
    let Json(requisicao) = payload
        .map_err(|e| erro_http(StatusCode::BAD_REQUEST, format!("corpo inválido: {}", e)))?;

    let prompt = requisicao.prompt.unwrap_or_default();
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return Err(erro_http(
            StatusCode::BAD_REQUEST,
            "prompt vazio".to_string(),
        ));
    }

    match estado.ia.perguntar(prompt).await {
        Ok(resposta) => Ok(Json(AskResponse { response: resposta })),
        Err(e) => Err(erro_http(StatusCode::BAD_GATEWAY, e.to_string())),
    }
}

// ========== WEBHOOK DO TELEGRAM ==========

fn e_comando_start(texto: &str) -> bool {
    texto.trim() == "/start"
}

/// Sempre responde 200 com um status, independentemente do ramo tomado:
/// o Telegram reentrega updates respondidos com erro.
pub async fn webhook(
    State(estado): State<AppState>,
    payload: Result<Json<AtualizacaoTelegram>, JsonRejection>,
) -> Json<serde_json::Value> {
    let ignorado = Json(serde_json::json!({ "status": "ignorado" }));

    let Ok(Json(atualizacao)) = payload else {
        return ignorado;
    };
    let Some(mensagem) = atualizacao.message else {
        return ignorado;
    };
    let Some(texto) = mensagem.text else {
        return ignorado;
    };
    let texto = texto.trim();
    if texto.is_empty() {
        return ignorado;
    }

    let resposta = if e_comando_start(texto) {
        BOAS_VINDAS.to_string()
    } else {
        match estado.ia.perguntar(texto).await {
            Ok(resposta) => resposta,
            Err(e) => {
                tracing::warn!("⚠️ IA indisponível para o chat {}: {}", mensagem.chat.id, e);
                format!("⚠️ Não consegui consultar a IA agora: {}", e)
            }
        }
    };

    let chat_id = mensagem.chat.id.to_string();
    if let Err(e) = estado.notificador.enviar_mensagem(&chat_id, &resposta).await {
        tracing::warn!("⚠️ Falha ao responder o chat {}: {}", chat_id, e);
    }

    Json(serde_json::json!({ "status": "ok" }))
}

// ========== PÁGINA ESTÁTICA ==========

pub async fn pagina_previsao() -> Html<&'static str> {
    Html(include_str!("../../templates/prediction.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn so_o_comando_exato_abre_a_conversa() {
        assert!(e_comando_start("/start"));
        assert!(e_comando_start("  /start  "));
        assert!(!e_comando_start("/start agora"));
        assert!(!e_comando_start("start"));
        assert!(!e_comando_start("qual a previsão de amanhã?"));
    }
}
