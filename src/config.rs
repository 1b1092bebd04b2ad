use anyhow::{Context, Result};

pub const LIMIAR_ALERTA_PADRAO_LITROS: f64 = 23000.0;

/// Configuração lida do ambiente (com suporte a .env) na subida do processo.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub bot_token: String,
    pub chat_id_alerta: String,
    pub porta: u16,
    pub diretorio_modelos: String,
    pub limiar_alerta_litros: f64,
    pub incluir_anomalia: bool,
    pub persona_ia: String,
}

impl Config {
    pub fn carregar() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            groq_api_key: std::env::var("GROQ_API_KEY").context("GROQ_API_KEY não definida")?,
            bot_token: std::env::var("BOT_TOKEN").context("BOT_TOKEN não definida")?,
            chat_id_alerta: std::env::var("CHAT_ID").context("CHAT_ID não definida")?,
            porta: std::env::var("PORT")
                .unwrap_or_else(|_| "5001".to_string())
                .parse()
                .context("PORT inválida")?,
            diretorio_modelos: std::env::var("MODELOS_DIR")
                .unwrap_or_else(|_| "modelos".to_string()),
            limiar_alerta_litros: std::env::var("LIMIAR_ALERTA_LITROS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(LIMIAR_ALERTA_PADRAO_LITROS),
            incluir_anomalia: std::env::var("INCLUIR_ANOMALIA")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            persona_ia: std::env::var("PERSONA_IA").unwrap_or_else(|_| {
                "Assistente de IA do projeto de previsão de volume de resíduos.".to_string()
            }),
        })
    }
}
