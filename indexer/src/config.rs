//! Indexer configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shadow_chain::DEFAULT_CHAIN_API_URL;
use shadow_merkle::{DEFAULT_DEPTH, MAX_DEPTH};
use shadow_types::ChainNetwork;

use crate::{CursorPolicy, IndexerError, LogFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Program whose transitions are indexed.
    #[serde(default = "default_program_id")]
    pub program_id: String,

    /// Explorer API base URL (without the network segment).
    #[serde(default = "default_chain_api_url")]
    pub chain_api_url: String,

    #[serde(default)]
    pub network: ChainNetwork,

    /// Merkle tree depth. Changing it for an existing database changes every
    /// root and proof.
    #[serde(default = "default_tree_depth")]
    pub tree_depth: u32,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// First height to process on a fresh database. Takes precedence over
    /// `backfill_margin`.
    #[serde(default)]
    pub start_height: Option<u64>,

    /// On a fresh database without `start_height`, start this many blocks
    /// behind the current head. 0 starts at the head.
    #[serde(default)]
    pub backfill_margin: u64,

    /// How far behind the head to restart when the cursor is found ahead of
    /// the chain.
    #[serde(default = "default_reorg_margin")]
    pub reorg_margin: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// `human` or `json`.
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Serve `/metrics`.
    #[serde(default)]
    pub enable_metrics: bool,
}

fn default_program_id() -> String {
    "shadow_vote_v3.aleo".to_string()
}

fn default_chain_api_url() -> String {
    DEFAULT_CHAIN_API_URL.to_string()
}

fn default_tree_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_reorg_margin() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./shadow_data")
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_rpc_port() -> u16 {
    5000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl IndexerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, IndexerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| IndexerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, IndexerError> {
        toml::from_str(s).map_err(|e| IndexerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, IndexerError> {
        toml::to_string_pretty(self).map_err(|e| IndexerError::Config(e.to_string()))
    }

    /// Reject configurations the indexer cannot run with.
    pub fn validate(&self) -> Result<(), IndexerError> {
        if self.program_id.is_empty() || !self.program_id.ends_with(".aleo") {
            return Err(IndexerError::Config(format!(
                "program_id {:?} is not an Aleo program id",
                self.program_id
            )));
        }
        if self.tree_depth == 0 || self.tree_depth > MAX_DEPTH {
            return Err(IndexerError::Config(format!(
                "tree_depth {} outside 1..={MAX_DEPTH}",
                self.tree_depth
            )));
        }
        if self.poll_interval_secs == 0 {
            return Err(IndexerError::Config("poll_interval_secs must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(IndexerError::Config("request_timeout_secs must be positive".into()));
        }
        if !(self.chain_api_url.starts_with("http://") || self.chain_api_url.starts_with("https://"))
        {
            return Err(IndexerError::Config(format!(
                "chain_api_url {:?} must be an http(s) URL",
                self.chain_api_url
            )));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn log_format(&self) -> Result<LogFormat, IndexerError> {
        self.log_format.parse()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cursor_policy(&self) -> CursorPolicy {
        CursorPolicy {
            start_height: self.start_height,
            backfill_margin: self.backfill_margin,
            reorg_margin: self.reorg_margin,
        }
    }
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            chain_api_url: default_chain_api_url(),
            network: ChainNetwork::default(),
            tree_depth: default_tree_depth(),
            poll_interval_secs: default_poll_interval_secs(),
            start_height: None,
            backfill_margin: 0,
            reorg_margin: default_reorg_margin(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: default_data_dir(),
            bind_address: default_bind_address(),
            rpc_port: default_rpc_port(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = IndexerConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = IndexerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = IndexerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.program_id, "shadow_vote_v3.aleo");
        assert_eq!(config.tree_depth, 20);
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.rpc_port, 5000);
        assert_eq!(config.network, ChainNetwork::Mainnet);
        assert_eq!(config.start_height, None);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            program_id = "other_vote.aleo"
            network = "testnet"
            tree_depth = 16
            start_height = 120000
        "#;
        let config = IndexerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.program_id, "other_vote.aleo");
        assert_eq!(config.network, ChainNetwork::Testnet);
        assert_eq!(config.tree_depth, 16);
        assert_eq!(config.cursor_policy().start_height, Some(120000));
        assert_eq!(config.reorg_margin, 10);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad = |f: fn(&mut IndexerConfig)| {
            let mut c = IndexerConfig::default();
            f(&mut c);
            matches!(c.validate(), Err(IndexerError::Config(_)))
        };
        assert!(bad(|c| c.tree_depth = 0));
        assert!(bad(|c| c.tree_depth = 33));
        assert!(bad(|c| c.program_id = "shadow_vote".into()));
        assert!(bad(|c| c.poll_interval_secs = 0));
        assert!(bad(|c| c.chain_api_url = "ftp://x".into()));
        assert!(bad(|c| c.log_format = "yaml".into()));
    }

    #[test]
    fn unknown_network_is_error() {
        assert!(IndexerConfig::from_toml_str(r#"network = "devnet""#).is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = IndexerConfig::from_toml_file("/nonexistent/shadow.toml");
        assert!(matches!(result, Err(IndexerError::Config(_))));
    }
}
