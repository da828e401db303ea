//! `photobooth config` – show config path and effective values.

use anyhow::Result;
use photobooth_core::config::{self, BoothConfig};

pub fn run_config(cfg: &BoothConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
