use std::sync::Arc;

use pb_feed::feed_from_config;
use pb_store::open_store;
use tokio::net::TcpListener;

use crate::auth::SharedSecretAuth;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::AppState;
use crate::router::build_router;

/// Postboard API server.
pub struct PostboardServer {
    config: ServerConfig,
}

impl PostboardServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured store and feed.
    pub async fn build_state(&self) -> ServerResult<AppState> {
        let store = open_store(&self.config.store).await?;
        let feed = feed_from_config(&self.config.feed)?;
        if self.config.api_key.is_none() {
            tracing::warn!("no API key configured; create, update and delete are disabled");
        }
        Ok(AppState {
            store,
            feed,
            auth: Arc::new(SharedSecretAuth::new(self.config.api_key.clone())),
        })
    }

    /// Build the router (useful for testing).
    pub async fn router(&self) -> ServerResult<axum::Router> {
        Ok(build_router(self.build_state().await?))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router().await?;
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            addr = %self.config.bind_addr,
            store = %self.config.store.backend(),
            feed = self.config.feed.enabled,
            "postboard server listening"
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
