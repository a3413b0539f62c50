//! TOML Configuration Structures for the UE stack

use layers::rlc::{RlcConfig, RlcMode, BCCH_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UeConfig {
    /// RLC layer configuration
    #[serde(default)]
    pub rlc: RlcLayerConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Bearers set up at start-up in addition to SRB0
    #[serde(default, rename = "bearer")]
    pub bearers: Vec<BearerConfig>,
}

/// RLC layer sizing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RlcLayerConfig {
    /// Messages buffered per BCCH queue
    #[serde(default = "default_bcch_queue_capacity")]
    pub bcch_queue_capacity: usize,
    /// Pool buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for RlcLayerConfig {
    fn default() -> Self {
        Self {
            bcch_queue_capacity: default_bcch_queue_capacity(),
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_bcch_queue_capacity() -> usize {
    BCCH_QUEUE_CAPACITY
}

fn default_buffer_size() -> usize {
    common::DEFAULT_BUFFER_SIZE
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// All layers log level
    #[serde(default = "default_log_level")]
    pub all_level: String,
    /// RLC layer log level, overrides `all_level` for the RLC
    pub rlc_level: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            all_level: default_log_level(),
            rlc_level: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LogConfig {
    /// Filter directive for `tracing_subscriber::EnvFilter`
    pub fn filter_directive(&self) -> String {
        match &self.rlc_level {
            Some(rlc_level) => format!("{},layers::rlc={}", self.all_level, rlc_level),
            None => self.all_level.clone(),
        }
    }
}

/// One radio bearer set up at start-up
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BearerConfig {
    /// Logical channel id
    pub lcid: u32,
    /// RLC mode
    pub mode: RlcMode,
    /// RLC parameters, entity defaults when absent
    pub rlc: Option<RlcConfig>,
}

impl UeConfig {
    /// Load configuration from TOML file
    pub fn from_toml_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
    
    /// Parse configuration from TOML text
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let config: UeConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
    
    /// Check values that would otherwise only fail at stack start-up
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.rlc.bcch_queue_capacity == 0 {
            return Err(anyhow::anyhow!("rlc.bcch_queue_capacity must be non-zero"));
        }
        if self.rlc.buffer_size == 0 {
            return Err(anyhow::anyhow!("rlc.buffer_size must be non-zero"));
        }
        for bearer in &self.bearers {
            if !common::lcid_in_range(bearer.lcid) {
                return Err(anyhow::anyhow!(
                    "Bearer lcid {} outside [0:{})",
                    bearer.lcid,
                    common::N_RADIO_BEARERS
                ));
            }
        }
        Ok(())
    }
}
