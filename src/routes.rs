use crate::models::{SummaryPayload, SummaryRequest, SummaryResult};
use crate::services::orchestrator::Orchestrator;
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/generate-summary", post(generate_summary))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
}

async fn health_check() -> &'static str {
    "OK"
}

async fn generate_summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryPayload>, JsonRejection>,
) -> Response {
    let span = tracing::info_span!("generate_summary", request_id = %Uuid::new_v4());

    async move {
        let Json(payload) = match payload {
            Ok(payload) => payload,
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "rejected request body");
                return bad_request(rejection.body_text());
            }
        };

        let request = match SummaryRequest::try_from(payload) {
            Ok(request) => request,
            Err(err) => {
                tracing::warn!(error = %err, "invalid summary request");
                return bad_request(err.to_string());
            }
        };

        tracing::info!(
            topic = %request.topic(),
            book = %request.book_title(),
            language = ?request.language(),
            "generating summary"
        );
        let result: SummaryResult = state.orchestrator.generate(&request).await;
        if result.is_notice() {
            tracing::warn!(path = ?result.path, "no summary could be generated");
        }

        Json(result).into_response()
    }
    .instrument(span)
    .await
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
