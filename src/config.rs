//! Service configuration
//!
//! Loaded from `~/.config/rollcall/config.toml` (XDG standard) unless an
//! explicit path is given. Every field has a default, so an empty or
//! missing file yields a working configuration.
//!
//! ```toml
//! [verification]
//! similarity_threshold = 0.8
//! min_matches = 2
//!
//! [network]
//! mask_bits = 24
//!
//! [clock]
//! utc_offset = "+05:30"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::SystemClock;
use crate::adapters::clock::parse_offset;
use crate::core::models::{DEFAULT_KEY_PATTERN, KeyFormat, VerificationPolicy};
use crate::core::services::SubnetPolicy;
use crate::core::services::subnet::{DEFAULT_IPV6_PREFIX, DEFAULT_MASK_BITS};

/// Environment variable overriding `verification.similarity_threshold`
pub const ENV_SIMILARITY_THRESHOLD: &str = "ROLLCALL_SIMILARITY_THRESHOLD";

/// Environment variable overriding `verification.min_matches`
pub const ENV_MIN_MATCHES: &str = "ROLLCALL_MIN_MATCHES";

const DEFAULT_UTC_OFFSET: &str = "+05:30";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },

    /// An environment override could not be parsed
    #[error("invalid value for {var}: {value:?}")]
    Env {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// A value is out of range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Matching parameters
    pub verification: VerificationPolicy,
    /// Co-location parameters
    pub network: NetworkConfig,
    /// Student key format
    pub identity: IdentityConfig,
    /// Local time zone
    pub clock: ClockConfig,
}

/// `[network]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// IPv4 prefix length
    pub mask_bits: u8,
    /// IPv6 prefix length
    pub ipv6_prefix: u8,
    /// Accept loopback requesters (development only)
    pub allow_loopback: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mask_bits: DEFAULT_MASK_BITS,
            ipv6_prefix: DEFAULT_IPV6_PREFIX,
            allow_loopback: false,
        }
    }
}

/// `[identity]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Regular expression every student key must match
    pub key_pattern: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            key_pattern: DEFAULT_KEY_PATTERN.to_string(),
        }
    }
}

/// `[clock]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Fixed offset from UTC, e.g. `+05:30`
    pub utc_offset: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
        }
    }
}

/// What `status` reports about the active configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSummary {
    /// Where the config came from, if a file
    pub source: Option<String>,
    /// Cosine threshold
    pub similarity_threshold: f64,
    /// Required matches
    pub min_matches: usize,
    /// References per student
    pub reference_count: usize,
    /// Embedding dimension
    pub embedding_dimension: usize,
    /// IPv4 prefix length
    pub mask_bits: u8,
    /// Loopback escape enabled
    pub allow_loopback: bool,
    /// Key pattern
    pub key_pattern: String,
    /// UTC offset
    pub utc_offset: String,
}

impl Config {
    /// Default location of the config file
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rollcall").join("config.toml"))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the default file, or defaults when it does not exist
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Apply `ROLLCALL_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_env_overrides_from(|var| std::env::var(var).ok())
    }

    /// Apply `ROLLCALL_*` overrides from `lookup`, then re-validate
    pub fn apply_env_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_SIMILARITY_THRESHOLD) {
            self.verification.similarity_threshold =
                value.trim().parse().map_err(|_| ConfigError::Env {
                    var: ENV_SIMILARITY_THRESHOLD,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_MIN_MATCHES) {
            self.verification.min_matches = value.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_MIN_MATCHES,
                value: value.clone(),
            })?;
        }
        self.validate()
    }

    /// Reject out-of-range values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let v = &self.verification;
        if !(0.0..=1.0).contains(&v.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold must be within [0, 1], got {}",
                v.similarity_threshold
            )));
        }
        if v.embedding_dimension == 0 {
            return Err(ConfigError::Invalid("embedding_dimension must be positive".into()));
        }
        if v.reference_count == 0 {
            return Err(ConfigError::Invalid("reference_count must be positive".into()));
        }
        if v.min_matches == 0 || v.min_matches > v.reference_count {
            return Err(ConfigError::Invalid(format!(
                "min_matches must be within 1..={}, got {}",
                v.reference_count, v.min_matches
            )));
        }
        if self.network.mask_bits > 32 {
            return Err(ConfigError::Invalid(format!(
                "mask_bits must be at most 32, got {}",
                self.network.mask_bits
            )));
        }
        if self.network.ipv6_prefix > 128 {
            return Err(ConfigError::Invalid(format!(
                "ipv6_prefix must be at most 128, got {}",
                self.network.ipv6_prefix
            )));
        }
        self.key_format()?;
        self.utc_offset()?;
        Ok(())
    }

    /// Matching parameters
    #[must_use]
    pub const fn verification_policy(&self) -> VerificationPolicy {
        self.verification
    }

    /// Co-location parameters
    #[must_use]
    pub const fn subnet_policy(&self) -> SubnetPolicy {
        SubnetPolicy {
            mask_bits: self.network.mask_bits,
            ipv6_prefix: self.network.ipv6_prefix,
            allow_loopback: self.network.allow_loopback,
        }
    }

    /// Compiled key format
    pub fn key_format(&self) -> Result<KeyFormat, ConfigError> {
        KeyFormat::new(&self.identity.key_pattern)
            .map_err(|e| ConfigError::Invalid(format!("key_pattern: {e}")))
    }

    /// Parsed UTC offset
    pub fn utc_offset(&self) -> Result<FixedOffset, ConfigError> {
        parse_offset(&self.clock.utc_offset).ok_or_else(|| {
            ConfigError::Invalid(format!("utc_offset must look like +05:30, got {:?}", self.clock.utc_offset))
        })
    }

    /// Wall clock in the configured offset
    pub fn clock(&self) -> Result<SystemClock, ConfigError> {
        Ok(SystemClock::new(self.utc_offset()?))
    }

    /// Summary for status output
    #[must_use]
    pub fn summary(&self, source: Option<&Path>) -> ConfigSummary {
        ConfigSummary {
            source: source.map(|p| p.display().to_string()),
            similarity_threshold: self.verification.similarity_threshold,
            min_matches: self.verification.min_matches,
            reference_count: self.verification.reference_count,
            embedding_dimension: self.verification.embedding_dimension,
            mask_bits: self.network.mask_bits,
            allow_loopback: self.network.allow_loopback,
            key_pattern: self.identity.key_pattern.clone(),
            utc_offset: self.clock.utc_offset.clone(),
        }
    }
}
