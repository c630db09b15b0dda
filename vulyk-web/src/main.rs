//! Servidor web Axum que expõe a conversão BSF → Vulyk como endpoints JSON

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vulyk_core::{ConversionJob, ConvertError, Converter, ConverterConfig, CorpusFile};

/// Endereço padrão do servidor (sobrescrito por `VULYK_WEB_ADDR`)
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Estado compartilhado da aplicação
struct AppState {
    converter: Converter,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::var("VULYK_CONFIG") {
        Ok(path) => {
            info!("Carregando configuração de {}", path);
            ConverterConfig::load(&path)?
        }
        Err(_) => ConverterConfig::default(),
    };
    let state = Arc::new(AppState {
        converter: Converter::new(config),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = std::env::var("VULYK_WEB_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Conversor Vulyk iniciado em http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/tags", get(tags_handler))
        .route("/convert", post(convert_handler))
        .route("/convert/batch", post(batch_handler))
        .route("/corpus", post(corpus_handler))
        .route("/prompt", post(prompt_handler))
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Tabela de rótulos ativa (tag BSF → rótulo exibido)
async fn tags_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.converter.config().tag_labels.clone())
}

/// Converte um documento (tokens ou texto cru + BSF)
async fn convert_handler(
    State(state): State<Arc<AppState>>,
    Json(job): Json<ConversionJob>,
) -> Response {
    match state.converter.convert_job(&job) {
        Ok(record) => Json(record).into_response(),
        Err(err) => {
            warn!("Conversão falhou: {}", err);
            error_response(&err)
        }
    }
}

/// Converte um lote; cada item falha ou passa de forma independente
async fn batch_handler(
    State(state): State<Arc<AppState>>,
    Json(items): Json<Vec<serde_json::Value>>,
) -> Response {
    info!("Convertendo lote de {} documentos", items.len());

    // A conversão é síncrona e usa o pool do Rayon: roda fora do runtime
    let state_for_thread = Arc::clone(&state);
    let handle = tokio::task::spawn_blocking(move || state_for_thread.converter.convert_batch(items));

    match handle.await {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({"error": err.to_string()})),
        )
            .into_response(),
    }
}

/// Converte um arquivo do corpus `<S>...</S>`
async fn corpus_handler(State(state): State<Arc<AppState>>, Json(file): Json<CorpusFile>) -> Response {
    Json(state.converter.convert_corpus(&file)).into_response()
}

/// Converte um arquivo IOB (texto puro) em prompts
async fn prompt_handler(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.converter.convert_iob(&body) {
        Ok(prompts) => prompts.into_response(),
        Err(err) => {
            warn!("Geração de prompts falhou: {}", err);
            error_response(&err)
        }
    }
}

fn error_response(err: &ConvertError) -> Response {
    let status = match err {
        ConvertError::MissingField { .. } | ConvertError::InvalidIobLine { .. } | ConvertError::Json(_) => {
            StatusCode::BAD_REQUEST
        }
        ConvertError::EntityOutOfBounds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ConvertError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let missing = ConvertError::MissingField { field: "tokens" };
        assert_eq!(error_response(&missing).status(), StatusCode::BAD_REQUEST);

        let out_of_bounds = ConvertError::EntityOutOfBounds {
            id: "T1".to_string(),
            start: 0,
            end: 9,
            len: 3,
        };
        assert_eq!(error_response(&out_of_bounds).status(), StatusCode::UNPROCESSABLE_ENTITY);

        let iob = ConvertError::InvalidIobLine { line: "Київ".to_string() };
        assert_eq!(error_response(&iob).status(), StatusCode::BAD_REQUEST);
    }
}
