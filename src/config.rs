//! Configuration management for Turnstile.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::admission::ClientKey;

/// Configuration for the admission controller.
///
/// All values are fixed once the limiter is constructed; there is no
/// runtime reconfiguration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Time to regenerate one token, in milliseconds
    #[serde(default = "default_refill_interval_ms")]
    pub refill_interval_ms: u64,

    /// Bucket capacity: requests a client may burst before throttling engages
    #[serde(default = "default_burst")]
    pub burst: u32,

    /// Client keys that bypass throttling entirely
    #[serde(default)]
    pub trusted_keys: Vec<String>,

    /// How often the reaper sweeps for idle visitors, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Idle time after which a visitor is evicted, in seconds
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            refill_interval_ms: default_refill_interval_ms(),
            burst: default_burst(),
            trusted_keys: Vec::new(),
            sweep_interval_secs: default_sweep_interval_secs(),
            idle_threshold_secs: default_idle_threshold_secs(),
        }
    }
}

fn default_refill_interval_ms() -> u64 {
    1000
}

fn default_burst() -> u32 {
    5
}

fn default_sweep_interval_secs() -> u64 {
    60
}

fn default_idle_threshold_secs() -> u64 {
    180
}

impl LimiterConfig {
    /// Load configuration from a YAML file path.
    pub fn from_file(path: &str) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: LimiterConfig = serde_yaml::from_str(&contents)
            .map_err(|e| crate::error::TurnstileError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Time to regenerate one token.
    pub fn refill_interval(&self) -> Duration {
        Duration::from_millis(self.refill_interval_ms)
    }

    /// Reaper sweep cadence.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Idle time after which a visitor entry is evicted.
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    /// The trusted bypass set as client keys.
    pub fn trusted_set(&self) -> HashSet<ClientKey> {
        self.trusted_keys
            .iter()
            .map(|k| ClientKey::from(k.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LimiterConfig::default();

        assert_eq!(config.refill_interval(), Duration::from_secs(1));
        assert_eq!(config.burst, 5);
        assert!(config.trusted_keys.is_empty());
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.idle_threshold(), Duration::from_secs(180));
    }

    #[test]
    fn test_config_from_yaml() {
        let yaml = r#"
refill_interval_ms: 250
burst: 20
trusted_keys:
  - "127.0.0.1"
  - "10.0.0.1"
"#;
        let config: LimiterConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.refill_interval(), Duration::from_millis(250));
        assert_eq!(config.burst, 20);
        assert_eq!(config.trusted_keys.len(), 2);
        // Unspecified fields fall back to defaults
        assert_eq!(config.sweep_interval_secs, 60);
        assert_eq!(config.idle_threshold_secs, 180);
    }

    #[test]
    fn test_trusted_set_membership() {
        let config = LimiterConfig {
            trusted_keys: vec!["127.0.0.1".to_string()],
            ..Default::default()
        };

        let trusted = config.trusted_set();
        assert!(trusted.contains(&ClientKey::from("127.0.0.1")));
        assert!(!trusted.contains(&ClientKey::from("192.168.1.1")));
    }
}
