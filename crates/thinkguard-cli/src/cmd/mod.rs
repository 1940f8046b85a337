pub mod check;
pub mod config;
pub mod enforce;
pub mod model;

use anyhow::Context;
use std::path::Path;
use thinkguard_core::config::Config;
use thinkguard_core::Enforcer;

/// Load the resolved config, or defaults when none was found.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(p) => {
            Config::load(p).with_context(|| format!("failed to load config {}", p.display()))
        }
        None => Ok(Config::default()),
    }
}

pub fn load_enforcer(path: Option<&Path>) -> anyhow::Result<Enforcer> {
    let config = load_config(path)?;
    Enforcer::from_config(&config).context("config cannot be used")
}
