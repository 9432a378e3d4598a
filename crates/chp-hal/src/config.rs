//! Adapter configuration.

use serde::{Deserialize, Serialize};

use crate::adapter::BackendAdapter;
use crate::error::HalResult;

/// Configuration for an adapter instance.
///
/// Carries the instance name plus free-form extras that individual adapters
/// interpret themselves (initial register size, amplitude caps, …).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Name of the adapter instance.
    pub name: String,
    /// Additional configuration.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AdapterConfig {
    /// Create a new adapter configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Add extra configuration.
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an extra as an unsigned integer.
    pub fn extra_u64(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(serde_json::Value::as_u64)
    }
}

/// Trait for creating adapters from configuration.
pub trait AdapterFactory: BackendAdapter + Sized {
    /// Create an adapter from configuration.
    fn from_config(config: AdapterConfig) -> HalResult<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_config() {
        let config = AdapterConfig::new("test")
            .with_extra("initial_qubits", serde_json::json!(4))
            .with_extra("max_qubits", serde_json::json!(20));

        assert_eq!(config.name, "test");
        assert_eq!(config.extra_u64("initial_qubits"), Some(4));
        assert_eq!(config.extra_u64("max_qubits"), Some(20));
        assert_eq!(config.extra_u64("missing"), None);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = AdapterConfig::new("sv").with_extra("max_qubits", serde_json::json!(12));
        let json = serde_json::to_string(&config).unwrap();
        let back: AdapterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "sv");
        assert_eq!(back.extra_u64("max_qubits"), Some(12));
    }
}
