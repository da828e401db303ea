//! `photobooth normalize <locator>` – print the rewritten locator.

use anyhow::Result;
use photobooth_core::config::BoothConfig;
use photobooth_core::LocatorNormalizer;

pub fn run_normalize(cfg: &BoothConfig, locator: &str) -> Result<()> {
    let normalizer =
        LocatorNormalizer::with_placeholders(&cfg.backend_origin, cfg.placeholder_hosts.clone());
    println!("{}", normalizer.normalize(locator));
    Ok(())
}
