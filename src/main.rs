mod api;
mod config;
mod erro;
mod ia_api;
mod modelo;
mod notificacao;
mod previsao;

use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use api::routes::AppState;
use config::Config;
use ia_api::ClienteIa;
use modelo::ArtefatosModelo;
use notificacao::NotificadorTelegram;
use previsao::PoliticaAlerta;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::carregar()?;

    let artefatos = ArtefatosModelo::carregar(Path::new(&config.diretorio_modelos))
        .context("falha ao carregar os artefatos de modelo")?;
    tracing::info!(
        "📦 Artefatos de modelo carregados de '{}'",
        config.diretorio_modelos
    );

    let http = reqwest::Client::new();
    let estado = AppState {
        artefatos: Arc::new(artefatos),
        ia: ClienteIa::new(
            http.clone(),
            config.groq_api_key.clone(),
            config.persona_ia.clone(),
        ),
        notificador: NotificadorTelegram::new(
            http,
            config.bot_token.clone(),
            config.chat_id_alerta.clone(),
        ),
        politica: PoliticaAlerta {
            limiar_litros: config.limiar_alerta_litros,
            incluir_anomalia: config.incluir_anomalia,
        },
    };

    let app = api::routes::create_router(estado);

    let endereco = SocketAddr::from(([0, 0, 0, 0], config.porta));
    tracing::info!("🚀 Servidor escutando em {}", endereco);

    let listener = tokio::net::TcpListener::bind(endereco)
        .await
        .with_context(|| format!("não foi possível escutar em {}", endereco))?;
    axum::serve(listener, app).await?;

    Ok(())
}
