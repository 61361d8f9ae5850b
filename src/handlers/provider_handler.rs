// src/handlers/provider_handler.rs
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::{errors::SparrowResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct DebugConfigResponse {
    pub configured: bool,
    pub api_url: String,
    pub app_id: Option<String>,
    pub rest_api_key_set: bool,
    pub timeout_secs: u64,
    pub site_url: String,
}

/// Keep enough of a secret to recognise it in logs.
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
    })
}

pub async fn notification_stats(
    State(state): State<Arc<AppState>>,
    Path(notification_id): Path<String>,
) -> SparrowResult<Json<Value>> {
    let stats = state
        .dispatcher
        .gateway()
        .notification_stats(&notification_id)
        .await?;
    Ok(Json(json!({ "success": true, "data": stats })))
}

pub async fn app_info(State(state): State<Arc<AppState>>) -> SparrowResult<Json<Value>> {
    let info = state.dispatcher.gateway().app_info().await?;
    Ok(Json(json!({ "success": true, "data": info })))
}

pub async fn debug_config(State(state): State<Arc<AppState>>) -> Json<DebugConfigResponse> {
    let provider = &state.settings.provider;
    Json(DebugConfigResponse {
        configured: provider.credentials().is_ok(),
        api_url: provider.api_url.clone(),
        app_id: provider.app_id.as_deref().map(mask),
        rest_api_key_set: provider
            .rest_api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty()),
        timeout_secs: provider.timeout().as_secs(),
        site_url: state.settings.decoration.site_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_hides_the_tail() {
        assert_eq!(mask("f8865b25-29e8"), "f886****");
        assert_eq!(mask("ab"), "ab****");
    }
}
