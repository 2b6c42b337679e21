// In: src/config.rs

//! The single source of truth for all symmap pipeline configuration.
//!
//! This module defines the unified `PipelineConfig` struct, which is designed
//! to be created once at the application boundary (e.g., from a build tool's
//! settings file) and then passed down into the orchestrator by value.
//!
//! This approach centralizes all settings and keeps the cache directory and
//! namespace orientation explicit dependencies rather than ambient global
//! state, so tests can run against isolated temporary directories.

use serde::{Deserialize, Serialize};

//==================================================================================
// I. Core Configuration Struct
//==================================================================================

/// Namespace orientation and artifact naming for one pipeline run.
///
/// `work_namespace` is the namespace the transformation stages operate
/// against: the base table is re-rooted to it at load time. `output_namespace`
/// becomes the declared source column of the persisted artifact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", default)]
pub struct PipelineConfig {
    /// Logical source namespace while stages run. Defaults to the
    /// machine-generated intermediate namespace.
    pub work_namespace: String,

    /// Declared source namespace of the serialized artifact. Defaults to the
    /// human-readable namespace.
    pub output_namespace: String,

    /// File extension of cache entries, without the leading dot.
    pub artifact_extension: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_namespace: "intermediary".to_string(),
            output_namespace: "named".to_string(),
            artifact_extension: "tiny".to_string(),
        }
    }
}

//==================================================================================
// Unit Tests
//==================================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_orientation_is_intermediary_to_named() {
        let config = PipelineConfig::default();
        assert_eq!(config.work_namespace, "intermediary");
        assert_eq!(config.output_namespace, "named");
        assert_eq!(config.artifact_extension, "tiny");
    }

    #[test]
    fn test_config_deserializes_with_partial_fields() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{ "output_namespace": "official" }"#).unwrap();
        assert_eq!(config.output_namespace, "official");
        assert_eq!(config.work_namespace, "intermediary");
    }
}
