use thiserror::Error;

/// Erros da geração de previsão. Ambas as variantes viram HTTP 400 com a
/// mensagem no corpo; nenhuma derruba o processo.
#[derive(Debug, Error)]
pub enum ErroPrevisao {
    #[error("{0}")]
    Validacao(String),

    #[error("{0}")]
    Modelo(String),
}

/// Falha na chamada à API de IA (upstream). Exposta ao chamador HTTP como 502.
#[derive(Debug, Error)]
pub enum ErroIa {
    #[error("falha na chamada à API de IA: {0}")]
    Http(#[from] reqwest::Error),

    #[error("resposta da API de IA em formato inesperado")]
    RespostaInvalida,
}

/// Falha no envio de mensagem ao Telegram. Nunca chega ao chamador HTTP:
/// quem dispara o envio apenas registra o erro no log.
#[derive(Debug, Error)]
pub enum ErroNotificacao {
    #[error("falha de rede ao enviar mensagem ao Telegram: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API do Telegram respondeu {0}")]
    Status(reqwest::StatusCode),
}
