//! HTTP gateway for Docent.
//!
//! Exposes `POST /chat` for the portfolio chat widget and `GET /health` for
//! monitoring. Built on Axum.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use docent_agent::Assistant;
use docent_core::ChatTurn;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

/// Request body limit for every route.
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Shared application state for the gateway.
pub type SharedState = Arc<Assistant>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - CORS allowing any origin (the chat widget is embedded cross-site)
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Builds the assistant once, which fetches the knowledge document, then
/// serves until the process is stopped.
pub async fn start(config: docent_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = config.bind_addr();
    let assistant = Arc::new(docent_agent::build_assistant(&config).await?);

    let app = build_router(assistant);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

async fn chat_handler(
    State(assistant): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(history = payload.history.len(), "Chat request");

    match assistant.chat(&payload.message, &payload.history).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(e) => {
            let status = if e.is_credentials_exhausted() {
                StatusCode::SERVICE_UNAVAILABLE
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            warn!(error = %e, status = status.as_u16(), "Chat request failed");
            Err((
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use docent_core::{
        FinishReason, Identity, Message, Provider, ProviderError, ProviderRequest,
        ProviderResponse,
    };
    use docent_knowledge::KnowledgeText;
    use docent_telemetry::{InteractionLogger, MemorySink};
    use docent_tools::{ToolDispatcher, TracingNotifier};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Echoes the message count it was sent, or fails with a fixed error.
    struct StubProvider {
        error: Option<ProviderError>,
        seen: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.seen.lock().unwrap().push(request.messages.len());
            if let Some(e) = &self.error {
                return Err(e.clone());
            }
            Ok(ProviderResponse {
                message: Message::assistant(format!("saw {} messages", request.messages.len())),
                finish_reason: Some(FinishReason::Stop),
                usage: None,
                model: "stub".into(),
            })
        }
    }

    fn test_state(error: Option<ProviderError>) -> SharedState {
        let provider = Arc::new(StubProvider {
            error,
            seen: Mutex::new(Vec::new()),
        });
        Arc::new(Assistant::new(
            provider,
            "stub-model",
            ToolDispatcher::new(Arc::new(TracingNotifier)),
            Identity::default(),
            KnowledgeText::new("knowledge"),
            InteractionLogger::new(Arc::new(MemorySink::new())),
        ))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = build_router(test_state(None));

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn chat_without_history() {
        let app = build_router(test_state(None));

        let response = app
            .oneshot(chat_request(r#"{"message":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // System + User
        assert_eq!(body_json(response).await["response"], "saw 2 messages");
    }

    #[tokio::test]
    async fn chat_with_history_pairs() {
        let app = build_router(test_state(None));

        let body = r#"{"message":"and now?","history":[["hi","hello!"],["who are you?",null]]}"#;
        let response = app.oneshot(chat_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        // System + (User, Assistant) + User + User
        assert_eq!(body_json(response).await["response"], "saw 5 messages");
    }

    #[tokio::test]
    async fn exhausted_credentials_are_503() {
        let app = build_router(test_state(Some(ProviderError::CredentialsExhausted {
            credentials: 4,
            attempts: 8,
        })));

        let response = app
            .oneshot(chat_request(r#"{"message":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("exhausted"));
    }

    #[tokio::test]
    async fn other_failures_are_500() {
        let app = build_router(test_state(Some(ProviderError::ApiError {
            status_code: 400,
            message: "bad request".into(),
        })));

        let response = app
            .oneshot(chat_request(r#"{"message":"hello"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_message_is_rejected() {
        let app = build_router(test_state(None));

        let response = app
            .oneshot(chat_request(r#"{"history":[]}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = build_router(test_state(None));

        let big = format!(r#"{{"message":"{}"}}"#, "a".repeat(BODY_LIMIT_BYTES + 1));
        let response = app.oneshot(chat_request(&big)).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let app = build_router(test_state(None));

        let req = Request::builder()
            .method("OPTIONS")
            .uri("/chat")
            .header(header::ORIGIN, "https://portfolio.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
