//! HTTP API for spam prediction

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{Result, SpamError};
use crate::models::EmailInput;
use crate::pipeline::SpamPipeline;

/// Prediction request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub email_text: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }

    fn respond(status: StatusCode, msg: impl Into<String>) -> Response {
        (status, Json(Self::new(msg))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct ApiServer {
    pipeline: Arc<SpamPipeline>,
    addr: String,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// `pipeline` must be fully loaded; the server never loads resources itself
    pub fn new(pipeline: Arc<SpamPipeline>, addr: String, static_dir: Option<PathBuf>) -> Self {
        Self {
            pipeline,
            addr,
            static_dir,
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let api_routes = Router::new()
            .route("/predict", post(predict))
            .route("/health", get(health));

        let mut router = Router::new()
            .nest("/api", api_routes)
            .with_state(Arc::clone(&self.pipeline));

        if let Some(dir) = &self.static_dir {
            router = router.fallback_service(ServeDir::new(dir));
        }

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    pub async fn run(&self) -> Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| SpamError::ServerError(format!("Failed to bind {}: {}", self.addr, e)))?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| SpamError::ServerError(e.to_string()))?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn predict(
    State(pipeline): State<Arc<SpamPipeline>>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(request)) = payload else {
        return ApiError::respond(StatusCode::BAD_REQUEST, "Invalid request body");
    };

    if request.email_text.trim().is_empty() {
        return ApiError::respond(StatusCode::BAD_REQUEST, "Email text cannot be empty");
    }

    let input = EmailInput::from(request.email_text);
    let outcome = tokio::task::spawn_blocking(move || pipeline.predict(&input)).await;

    match outcome {
        Ok(Ok(result)) => Json(result).into_response(),
        Ok(Err(e)) => {
            error!("Prediction failed: {}", e);
            ApiError::respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("prediction failed: {}", e),
            )
        }
        Err(e) => {
            error!("Prediction task panicked: {}", e);
            ApiError::respond(StatusCode::INTERNAL_SERVER_ERROR, "prediction failed")
        }
    }
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "healthy" })
}
