use axum::extract::State;
use axum::http::StatusCode;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::state::AppState;

const SYSTEM_PROMPT: &str =
    "You are a helpful assistant that makes lots of Star Wars references and uses emojis.";
const USER_PROMPT: &str =
    "Write a haiku about Star wars Rebels Series member Captain Syndulla";

const TEMPERATURE: f32 = 0.7;
const CANDIDATES: u32 = 1;

/// Issue one completion, enqueue the reply text for the downstream consumer,
/// and return it as the plain-text response body.
pub async fn complete(State(state): State<Arc<AppState>>) -> ApiResult<(StatusCode, String)> {
    tracing::info!("HTTP trigger processed a request");

    let text = state
        .client
        .complete(SYSTEM_PROMPT, USER_PROMPT, TEMPERATURE, CANDIDATES)
        .await?;

    state.queue.publish(&text).await?;

    Ok((StatusCode::OK, text))
}
