// crates/gemchat-server/src/cli/serve.rs
// Relay server entry point

use crate::config::{CliOverrides, RelayConfig};
use crate::relay::RelayServer;
use anyhow::Result;
use tracing::warn;

pub async fn run_serve(overrides: CliOverrides) -> Result<()> {
    let config = RelayConfig::load(overrides);

    let validation = config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        anyhow::bail!("Invalid configuration:\n{}", validation.report());
    }

    RelayServer::new(config).run().await
}
