use crate::erro::ErroPrevisao;
use crate::previsao::{PedidoPrevisao, PrevisaoDiaria};
use serde::{Deserialize, Serialize};

/// `sensor_count` chega como número ou como string numérica, dependendo do
/// cliente. A validação converte os dois para f64.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumeroOuTexto {
    Numero(f64),
    Texto(String),
}

#[derive(Debug, Deserialize)]
pub struct PreverRequest {
    pub sensor_count: NumeroOuTexto,
    #[serde(alias = "start_date")]
    pub date: String,
    pub days: Option<i64>,
}

impl PreverRequest {
    pub fn validar(&self) -> Result<PedidoPrevisao, ErroPrevisao> {
        let sensor_count = match &self.sensor_count {
            NumeroOuTexto::Numero(n) => *n,
            NumeroOuTexto::Texto(texto) => texto.trim().parse::<f64>().map_err(|_| {
                ErroPrevisao::Validacao(format!("sensor_count deve ser numérico: '{}'", texto))
            })?,
        };
        PedidoPrevisao::novo(sensor_count, &self.date, self.days)
    }
}

#[derive(Debug, Serialize)]
pub struct PreverResponse {
    pub start_date: String,
    pub sensor_count: f64,
    pub days: u32,
    pub predictions: Vec<PrevisaoDiaria>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// Recorte mínimo do update do Telegram: só o que o roteamento usa.

#[derive(Debug, Deserialize)]
pub struct AtualizacaoTelegram {
    pub message: Option<MensagemTelegram>,
}

#[derive(Debug, Deserialize)]
pub struct MensagemTelegram {
    pub chat: ChatTelegram,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatTelegram {
    pub id: i64,
}
