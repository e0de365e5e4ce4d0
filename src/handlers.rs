// handlers.rs

use crate::{
    devices::Device,
    error::LampError,
    models::{Channel, Command, LampStatus},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub lamp: Arc<dyn Device>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/channels/{channel}/commands", post(post_command))
        .with_state(state)
}

pub async fn get_state(State(state): State<AppState>) -> Result<Json<LampStatus>, LampError> {
    let status = state.lamp.get_status().await?;
    Ok(Json(status))
}

pub async fn post_command(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Json(command): Json<Command>,
) -> Result<StatusCode, LampError> {
    let channel: Channel = channel.parse()?;
    info!(channel = channel.id(), ?command, "Command received");
    state.lamp.handle_command(channel, command).await?;
    Ok(StatusCode::ACCEPTED)
}
