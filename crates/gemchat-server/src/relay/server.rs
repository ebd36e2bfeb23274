// crates/gemchat-server/src/relay/server.rs
// Axum HTTP server for the relay

use crate::config::RelayConfig;
use crate::relay::{RelayState, routes};
use tracing::{info, warn};

pub struct RelayServer {
    config: RelayConfig,
}

impl RelayServer {
    pub fn new(config: RelayConfig) -> Self {
        Self { config }
    }

    /// Start the relay and serve until Ctrl-C
    pub async fn run(self) -> anyhow::Result<()> {
        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        match self.config.masked_api_key() {
            Some(key) => info!(key = %key, model = %self.config.model, "Gemini API key configured"),
            None => warn!("GEMINI_API_KEY not set - chat requests will return 500"),
        }
        if let Some(dir) = &self.config.static_dir {
            info!(dir = %dir.display(), "Serving static files");
        }

        info!("gemchat relay listening on {}", addr);

        let app = routes::create_router(RelayState::from_config(&self.config));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("gemchat relay stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
