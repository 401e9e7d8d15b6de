//! Loader configuration options.

use serde::{Deserialize, Serialize};

/// Options recognized by the bootstrap loader.
///
/// Exactly two options exist; anything else in a configuration document is
/// rejected at deserialization time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Whether or not to allow loading incompatible module versions.
    pub allow_incompatible: bool,

    /// Whether or not to display debug messages.
    pub allow_debug_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict_and_quiet() {
        let config = BootstrapConfig::default();
        assert!(!config.allow_incompatible);
        assert!(!config.allow_debug_logs);
    }

    #[test]
    fn test_deserializes_with_partial_fields() {
        let config: BootstrapConfig =
            serde_json::from_str(r#"{"allow_incompatible": true}"#).unwrap();
        assert!(config.allow_incompatible);
        assert!(!config.allow_debug_logs);
    }

    #[test]
    fn test_rejects_unknown_options() {
        let result = serde_json::from_str::<BootstrapConfig>(r#"{"allow_retries": true}"#);
        assert!(result.is_err());
    }
}
