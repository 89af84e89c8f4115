//! Engine configuration structures
//!
//! Settings that tune geometry generation and the editor. They are
//! serializable and loaded from RON configuration files; every section
//! falls back to its defaults when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CYLINDER_SEGMENTS, SPHERE_LAT_SEGMENTS, SPHERE_LON_SEGMENTS, TORUS_MAJOR_SEGMENTS,
    TORUS_MINOR_SEGMENTS,
};

/// Primitive tessellation resolution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TessellationConfig {
    /// Segments around cylinders and cones
    pub cylinder_segments: u32,
    /// Sphere latitude bands
    pub sphere_lat_segments: u32,
    /// Sphere longitude segments
    pub sphere_lon_segments: u32,
    /// Segments around the torus axis
    pub torus_major_segments: u32,
    /// Segments around the torus tube
    pub torus_minor_segments: u32,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self {
            cylinder_segments: CYLINDER_SEGMENTS,
            sphere_lat_segments: SPHERE_LAT_SEGMENTS,
            sphere_lon_segments: SPHERE_LON_SEGMENTS,
            torus_major_segments: TORUS_MAJOR_SEGMENTS,
            torus_minor_segments: TORUS_MINOR_SEGMENTS,
        }
    }
}

/// Undo history settings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo steps kept (unbounded when `None`)
    pub limit: Option<usize>,
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub tessellation: TessellationConfig,
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron(&content)
    }

    /// Parse configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration as pretty RON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EngineConfig::from_ron("(history: (limit: Some(5)))").unwrap();
        assert_eq!(config.history.limit, Some(5));
        assert_eq!(config.tessellation, TessellationConfig::default());
    }

    #[test]
    fn test_empty_config() {
        let config = EngineConfig::from_ron("()").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.history.limit.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forge.ron");
        let mut config = EngineConfig::default();
        config.tessellation.cylinder_segments = 12;
        config.save(&path).unwrap();

        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_bad_config_is_parse_error() {
        assert!(matches!(
            EngineConfig::from_ron("(tessellation: 3)"),
            Err(ConfigError::Parse(_))
        ));
    }
}
