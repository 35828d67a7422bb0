//! REST API server for the bucket list generator
//!
//! Exposes the generation flow and the per-card enrichments via HTTP
//! endpoints. Integrates with the frontend UI. The per-card endpoints are
//! where the retry wrapper is applied; a degraded answer still returns 200
//! with the placeholder value, so the UI never stalls on a dead call.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::error::BucketListError;
use crate::flows;
use crate::gemini::GenerativeBackend;
use crate::models::{ActivityStatus, GenerationRequest};
use crate::retry::{with_retry, RetryPolicy};
use crate::session::SessionStore;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Deserialize)]
pub struct GenerateApiRequest {
    pub interests: String,
    pub budget: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub activity: String,
}

#[derive(Debug, Deserialize)]
pub struct CostRequest {
    pub activity: String,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: ActivityStatus,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub backend: Arc<dyn GenerativeBackend>,
    pub sessions: Arc<SessionStore>,
    pub retry: RetryPolicy,
}

/// =============================
/// Helpers
/// =============================

fn error_status(e: &BucketListError) -> StatusCode {
    match e {
        BucketListError::Validation { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn stable_uuid_from_string(input: &str) -> Uuid {
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hash[..16]);

    // Set UUID version (4) and variant (RFC4122) bits.
    bytes[6] = (bytes[6] & 0x0f) | 0x40;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    Uuid::from_bytes(bytes)
}

/// Sessions arrive either as UUIDs or as opaque client strings; the latter
/// map stably onto a UUID so repeat calls land on the same list. A missing
/// session id starts a fresh one.
fn resolve_session(value: Option<&str>) -> Uuid {
    match value {
        Some(v) if !v.trim().is_empty() => {
            Uuid::parse_str(v).unwrap_or_else(|_| stable_uuid_from_string(v))
        }
        _ => Uuid::new_v4(),
    }
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Generation Endpoint
/// =============================

async fn generate_handler(
    State(state): State<ApiState>,
    Json(req): Json<GenerateApiRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    info!("Received generation request");

    let session = resolve_session(req.session_id.as_deref());
    let request = GenerationRequest {
        interests: req.interests,
        budget: req.budget,
    };

    match flows::generate::generate_bucket_list(state.backend.as_ref(), &request).await {
        Ok(activities) => {
            let items = state.sessions.replace_list(session, activities).await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(serde_json::json!({
                    "sessionId": session,
                    "items": items,
                }))),
            )
        }
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::error(format!("List generation failed: {}", e))),
        ),
    }
}

/// =============================
/// Per-card Enrichment Endpoints
/// =============================

async fn timing_handler(
    State(state): State<ApiState>,
    Json(req): Json<ActivityRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let outcome = with_retry(
        state.retry,
        || flows::timing::suggest_activity_timing(state.backend.as_ref(), &req.activity),
        flows::timing::fallback_suggestion,
    )
    .await;

    let degraded = outcome.is_degraded();
    let suggestion = outcome.into_value();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "bestTime": suggestion.best_time,
            "degraded": degraded,
        }))),
    )
}

async fn cost_handler(
    State(state): State<ApiState>,
    Json(req): Json<CostRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    let outcome = with_retry(
        state.retry,
        || {
            flows::cost::estimate_activity_cost(
                state.backend.as_ref(),
                &req.activity,
                req.location.as_deref(),
            )
        },
        flows::cost::fallback_estimate,
    )
    .await;

    let degraded = outcome.is_degraded();
    let estimate = outcome.into_value();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "estimatedCost": estimate.estimated_cost,
            "currency": estimate.currency,
            "costBreakdown": estimate.cost_breakdown,
            "degraded": degraded,
        }))),
    )
}

async fn image_handler(
    State(state): State<ApiState>,
    Json(req): Json<ActivityRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match flows::image::generate_activity_image(state.backend.as_ref(), &req.activity).await {
        Ok(image_url) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "imageUrl": image_url,
            }))),
        ),
        Err(e) => (
            error_status(&e),
            Json(ApiResponse::error(format!("Image generation failed: {}", e))),
        ),
    }
}

/// =============================
/// Status Endpoint
/// =============================

async fn status_handler(
    State(state): State<ApiState>,
    Path((session, item_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<StatusRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.sessions.set_status(session, item_id, req.status).await {
        Some(item) => (StatusCode::OK, Json(ApiResponse::success(item))),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Unknown session or item".to_string())),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(backend: Arc<dyn GenerativeBackend>) -> Router {
    let state = ApiState {
        backend,
        sessions: Arc::new(SessionStore::new()),
        retry: RetryPolicy::per_card(),
    };

    Router::new()
        .route("/health", get(health))
        .route("/api/generate", post(generate_handler))
        .route("/api/timing", post(timing_handler))
        .route("/api/cost", post(cost_handler))
        .route("/api/image", post(image_handler))
        .route(
            "/api/sessions/:session/items/:item/status",
            post(status_handler),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    backend: Arc<dyn GenerativeBackend>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(backend);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct CannedBackend;

    #[async_trait]
    impl GenerativeBackend for CannedBackend {
        async fn generate_structured(
            &self,
            template_name: &str,
            _prompt: &str,
            output: &Schema,
        ) -> crate::Result<Value> {
            match template_name {
                "generateBucketList" => output.validate(&json!({
                    "bucketListItems": [
                        {"activity": "Sail the Aegean", "description": "A week island-hopping"},
                    ]
                })),
                "suggestActivityTiming" => output.validate(&json!({
                    "bestTime": "Late spring, before the meltemi winds pick up.",
                })),
                _ => Err(BucketListError::Generation("unknown template".to_string())),
            }
        }

        async fn generate_image(&self, _prompt: &str) -> crate::Result<String> {
            Ok("data:image/png;base64,abc".to_string())
        }
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(Arc::new(CannedBackend));
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generate_then_update_status() {
        let router = create_router(Arc::new(CannedBackend));

        let response = router
            .clone()
            .oneshot(post_json(
                "/api/generate",
                json!({"interests": "sailing and greek islands"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["success"], true);
        let session = body["data"]["sessionId"].as_str().unwrap().to_string();
        let item = body["data"]["items"][0]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["items"][0]["status"], "To Do");

        let uri = format!("/api/sessions/{}/items/{}/status", session, item);
        let response = router
            .oneshot(post_json(&uri, json!({"status": "Completed"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["data"]["status"], "Completed");
    }

    #[tokio::test]
    async fn test_status_on_unknown_session_is_404() {
        let router = create_router(Arc::new(CannedBackend));
        let uri = format!(
            "/api/sessions/{}/items/{}/status",
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let response = router
            .oneshot(post_json(&uri, json!({"status": "In Progress"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_short_interests_rejected() {
        let router = create_router(Arc::new(CannedBackend));
        let response = router
            .oneshot(post_json("/api/generate", json!({"interests": "sail"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response_json(response).await;
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_timing_endpoint_returns_suggestion() {
        let router = create_router(Arc::new(CannedBackend));
        let response = router
            .oneshot(post_json("/api/timing", json!({"activity": "Sail the Aegean"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response_json(response).await;
        assert_eq!(body["data"]["degraded"], false);
        assert!(body["data"]["bestTime"]
            .as_str()
            .unwrap()
            .contains("spring"));
    }

    #[test]
    fn test_stable_uuid_is_deterministic() {
        let a = stable_uuid_from_string("client-session-1");
        let b = stable_uuid_from_string("client-session-1");
        let c = stable_uuid_from_string("client-session-2");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.get_version_num(), 4);
    }
}
