// crates/gemchat-server/src/cli/check.rs
// Configuration report

use crate::config::{CliOverrides, FileConfig, RelayConfig};
use anyhow::Result;

pub fn run_check() -> Result<()> {
    let config = RelayConfig::load(CliOverrides::default());

    println!("Config file:  {}", FileConfig::config_path().display());
    println!("Listen:       {}", config.bind_addr());
    println!("Model:        {}", config.model);
    println!("API base:     {}", config.api_base);
    println!(
        "API key:      {}",
        config.masked_api_key().unwrap_or_else(|| "(not set)".to_string())
    );
    println!("Timeout:      {}s", config.request_timeout.as_secs());
    if let Some(dir) = &config.static_dir {
        println!("Static dir:   {}", dir.display());
    }
    println!();

    let validation = config.validate();
    println!("{}", validation.report());

    if !validation.is_valid() {
        anyhow::bail!("configuration has errors");
    }
    Ok(())
}
