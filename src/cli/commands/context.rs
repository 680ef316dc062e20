//! Shared command setup: configuration, roster and request loading

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context as _;
use log::debug;
use rollcall::adapters::RosterStore;
use rollcall::config::Config;

/// Configuration and roster for one command run
#[derive(Debug)]
pub struct Context {
    /// Validated configuration with env overrides applied
    pub config: Config,
    /// Opened roster
    pub roster: RosterStore,
}

impl Context {
    /// Load the config (explicit path or default) and open the roster
    pub fn load(config_path: Option<&Path>, roster: &Path) -> anyhow::Result<Self> {
        let mut config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };
        config.apply_env_overrides()?;
        debug!(
            "threshold={} min_matches={} mask_bits={}",
            config.verification.similarity_threshold,
            config.verification.min_matches,
            config.network.mask_bits
        );

        let roster = RosterStore::open(roster)
            .with_context(|| format!("failed to open roster {}", roster.display()))?;
        Ok(Self { config, roster })
    }
}

/// Read a request body from a file, or stdin for `-`
pub fn read_request(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body).context("failed to read request from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read request {}", path.display()))
}
