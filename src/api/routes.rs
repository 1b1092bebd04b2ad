use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    classify::ServerErrorsFailureClass,
    cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::Level;

use crate::api::handlers::*;
use crate::ia_api::ClienteIa;
use crate::modelo::ArtefatosModelo;
use crate::notificacao::NotificadorTelegram;
use crate::previsao::PoliticaAlerta;

pub fn create_router(estado: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(prever))
        .route("/ask", post(perguntar))
        .route("/webhook", post(webhook))
        .route("/prediction", get(pagina_previsao))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::span!(
                        Level::INFO,
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    tracing::info!(
                        "📥 Requisição recebida: {} {}",
                        request.method(),
                        request.uri()
                    );
                })
                .on_response(|_response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                    tracing::info!(
                        "📤 Resposta enviada: status={} latency={:.2}ms",
                        _response.status(),
                        latency.as_secs_f64() * 1000.0
                    );
                })
                .on_failure(|_error: ServerErrorsFailureClass, _latency: std::time::Duration, _span: &tracing::Span| {
                    tracing::error!(
                        "❌ Erro na requisição: {:?} latency={:.2}ms",
                        _error,
                        _latency.as_secs_f64() * 1000.0
                    );
                })
        )
        .layer(CorsLayer::permissive())
        .with_state(estado)
}

/// Dependências imutáveis compartilhadas entre as requisições: os artefatos
/// são somente-leitura e os clientes HTTP são baratos de clonar.
#[derive(Clone)]
pub struct AppState {
    pub artefatos: Arc<ArtefatosModelo>,
    pub ia: ClienteIa,
    pub notificador: NotificadorTelegram,
    pub politica: PoliticaAlerta,
}
