use crate::erro::ErroNotificacao;
use crate::previsao::Alerta;
use reqwest::Client;
use serde_json::json;

/// Remetente de mensagens via Bot API do Telegram. Usado tanto para os
/// alertas de limiar quanto para as respostas do webhook.
#[derive(Clone)]
pub struct NotificadorTelegram {
    http: Client,
    token: String,
    chat_id_padrao: String,
}

impl NotificadorTelegram {
    pub fn new(http: Client, token: String, chat_id_padrao: String) -> Self {
        NotificadorTelegram {
            http,
            token,
            chat_id_padrao,
        }
    }

    pub async fn enviar_mensagem(&self, chat_id: &str, texto: &str) -> Result<(), ErroNotificacao> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let corpo = json!({
            "chat_id": chat_id,
            "text": texto,
            "parse_mode": "Markdown"
        });

        let resposta = self.http.post(&url).json(&corpo).send().await?;
        if !resposta.status().is_success() {
            return Err(ErroNotificacao::Status(resposta.status()));
        }
        Ok(())
    }

    /// Envia o alerta formatado ao destinatário padrão configurado.
    pub async fn enviar_alerta(&self, alerta: &Alerta) -> Result<(), ErroNotificacao> {
        self.enviar_mensagem(&self.chat_id_padrao, &formatar_alerta(alerta))
            .await
    }
}

pub fn formatar_alerta(alerta: &Alerta) -> String {
    format!(
        "🚨 *ALERTA DE VOLUME!*\nData: {}\nSensores: {}\nVolume previsto: {} litros",
        alerta.data.format("%d-%m-%Y"),
        alerta.sensor_count,
        alerta.volume_previsto_litros
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn alerta_formatado_carrega_data_sensores_e_volume() {
        let alerta = Alerta {
            data: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            sensor_count: 12.0,
            volume_previsto_litros: 25000.0,
            limiar_excedido: true,
        };
        let texto = formatar_alerta(&alerta);
        assert!(texto.contains("01-01-2024"));
        assert!(texto.contains("12"));
        assert!(texto.contains("25000"));
    }
}
