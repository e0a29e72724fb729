//! Settings API endpoints - JSON API

use axum::Json;
use diary_config::Config;

use crate::AppState;

pub async fn api_settings(state: axum::extract::State<AppState>) -> Json<Config> {
    Json(state.config.as_ref().clone())
}
