//! Health check endpoint

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use serenity::prelude::TypeMapKey;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::RwLock;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub bot_username: Option<String>,
    pub commands_registered: bool,
    pub uptime_secs: u64,
}

#[derive(Debug, Default)]
struct Inner {
    bot_username: Option<String>,
    commands_registered: bool,
}

/// Shared liveness state, written by the ready handler.
#[derive(Clone)]
pub struct HealthState {
    start_time: SystemTime,
    inner: Arc<RwLock<Inner>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            start_time: SystemTime::now(),
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    pub async fn set_bot_username(&self, username: String) {
        self.inner.write().await.bot_username = Some(username);
    }

    pub async fn set_commands_registered(&self) {
        self.inner.write().await.commands_registered = true;
    }
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapKey for HealthState {
    type Value = HealthState;
}

async fn health_handler(State(state): State<HealthState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();
    let inner = state.inner.read().await;

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "ok".to_string(),
            bot_username: inner.bot_username.clone(),
            commands_registered: inner.commands_registered,
            uptime_secs: uptime,
        }),
    )
}

async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create the health check router
pub fn create_health_router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start the health check server
pub async fn start_health_server(state: HealthState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Health check server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_state_new() {
        let state = HealthState::new();
        let inner = state.inner.read().await;
        assert!(inner.bot_username.is_none());
        assert!(!inner.commands_registered);
    }

    #[tokio::test]
    async fn test_set_bot_username() {
        let state = HealthState::new();
        state.set_bot_username("linkbot".to_string()).await;
        assert_eq!(
            state.inner.read().await.bot_username,
            Some("linkbot".to_string())
        );
    }

    #[tokio::test]
    async fn test_set_commands_registered() {
        let state = HealthState::new();
        state.set_commands_registered().await;
        assert!(state.inner.read().await.commands_registered);
    }

    #[test]
    fn test_health_status_serde() {
        let status = HealthStatus {
            status: "ok".to_string(),
            bot_username: Some("linkbot".to_string()),
            commands_registered: true,
            uptime_secs: 100,
        };
        let json = serde_json::to_string(&status).unwrap();
        let back: HealthStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, "ok");
        assert_eq!(back.uptime_secs, 100);
        assert!(back.commands_registered);
    }
}
