//! Engine configuration.

use serde::{Deserialize, Serialize};

use projgate_core::MAX_PROJECT_NAME_LEN;

/// Configuration for the [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Longest accepted project name, in characters.
    pub max_name_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_name_len: MAX_PROJECT_NAME_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_override() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_name_len": 16}"#).unwrap();
        assert_eq!(config.max_name_len, 16);
    }
}
