// crates/gemchat-server/src/cli/ask.rs
// One-shot relay exchange without starting the server

use crate::config::{CliOverrides, RelayConfig};
use crate::relay::{self, RelayState};
use anyhow::{Context, Result};
use gemchat_types::RelayRequest;
use gemchat_widget::{AttachmentFile, PendingAttachment};
use std::path::Path;

pub async fn run_ask(message: String, image: Option<&Path>) -> Result<()> {
    let config = RelayConfig::load(CliOverrides::default());
    let state = RelayState::from_config(&config);

    let image = match image {
        Some(path) => Some(load_image(path).await?),
        None => None,
    };

    let request = RelayRequest { message, image };
    let reply = relay::relay(state.gemini.as_deref(), request).await?;
    println!("{}", reply);
    Ok(())
}

async fn load_image(path: &Path) -> Result<gemchat_types::InlineData> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pending = PendingAttachment::from_file(&AttachmentFile::new(name, bytes))?;
    pending
        .inline_data()
        .context("Encoded attachment could not be read back")
}
