//! HTTP surface: the contact endpoint plus, optionally, the built site.

use super::{ContactSubmission, Relay, RelayError, success_body};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Build the router: `POST <endpoint>` for submissions and, when `site_dir`
/// is given, every other path served from the generated site with
/// `404.html` as the not-found page.
pub fn router(relay: Arc<Relay>, site_dir: Option<&Path>) -> Router {
    let endpoint = relay.config().endpoint.clone();
    let app = Router::new()
        .route(&endpoint, post(submit_contact))
        .with_state(relay);

    let app = match site_dir {
        Some(dir) => app.fallback_service(
            ServeDir::new(dir).not_found_service(ServeFile::new(dir.join("404.html"))),
        ),
        None => app,
    };
    app.layer(TraceLayer::new_for_http())
}

async fn submit_contact(
    State(relay): State<Arc<Relay>>,
    payload: Result<Json<ContactSubmission>, JsonRejection>,
) -> Response {
    let Json(submission) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected contact request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": INVALID_BODY_MESSAGE })),
            )
                .into_response();
        }
    };

    match relay.submit(&submission).await {
        Ok(_) => (StatusCode::OK, Json(success_body())).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await
}
