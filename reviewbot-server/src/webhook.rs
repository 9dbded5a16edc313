use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::pipeline;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    pub pull_request: Option<WebhookPullRequest>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookPullRequest {
    pub id: i64,
    pub user: Option<WebhookUser>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookUser {
    pub login: String,
}

#[derive(Serialize)]
pub struct WebhookResponse {
    pub message: String,
}

pub fn webhook_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook_handler))
        .with_state(state)
}

fn reply(status: StatusCode, message: &str) -> (StatusCode, Json<WebhookResponse>) {
    (
        status,
        Json(WebhookResponse {
            message: message.to_string(),
        }),
    )
}

/// Handle one pull request event.
///
/// The pipeline runs synchronously; the webhook caller waits for the full
/// extract -> generate -> publish cycle before getting a response.
pub async fn webhook_handler(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> (StatusCode, Json<WebhookResponse>) {
    info!("Received webhook payload");

    let bytes = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(bytes) => bytes,
        Err(_) => return reply(StatusCode::BAD_REQUEST, "invalid payload"),
    };

    let payload: WebhookPayload = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(_) => return reply(StatusCode::BAD_REQUEST, "invalid payload"),
    };

    let Some(webhook_pr) = payload.pull_request else {
        return reply(StatusCode::BAD_REQUEST, "invalid payload");
    };

    let pr_id = webhook_pr.id;

    // Filter on the login embedded in the event before touching the API.
    if let Some(user) = &webhook_pr.user {
        if state.ignore.is_ignored(&user.login) {
            info!("Ignoring PR #{} by {}", pr_id, user.login);
            return reply(StatusCode::OK, "ignored");
        }
    }

    if !state.processed.mark(pr_id).await {
        info!("PR #{} was already processed recently", pr_id);
        return reply(StatusCode::OK, "already processed");
    }

    let pr = match state.devops.get_pull_request(pr_id).await {
        Ok(pr) => pr,
        Err(e) => {
            warn!("Could not resolve PR #{}: {}", pr_id, e);
            return reply(StatusCode::OK, "pull request not found");
        }
    };

    if state.ignore.is_ignored(&pr.created_by.display_name) {
        info!(
            "Ignoring PR #{} by {}",
            pr_id, pr.created_by.display_name
        );
        return reply(StatusCode::OK, "ignored");
    }

    let outcome = pipeline::review_pull_request(&state, &pr).await;
    info!("PR #{} review outcome: {:?}", pr_id, outcome);

    reply(StatusCode::OK, "processed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_without_pull_request_parses_but_is_empty() {
        let payload: WebhookPayload = serde_json::from_str("{}").unwrap();
        assert!(payload.pull_request.is_none());
    }

    #[test]
    fn payload_parses_id_and_author_login() {
        let json = r#"{ "pull_request": { "id": 42, "user": { "login": "bot-ci" } } }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        let pr = payload.pull_request.unwrap();
        assert_eq!(pr.id, 42);
        assert_eq!(pr.user.unwrap().login, "bot-ci");
    }

    #[test]
    fn payload_author_is_optional() {
        let json = r#"{ "pull_request": { "id": 7 } }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        let pr = payload.pull_request.unwrap();
        assert_eq!(pr.id, 7);
        assert!(pr.user.is_none());
    }
}
