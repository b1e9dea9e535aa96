//! World configuration
//!
//! Domain thresholds and default DoF limits, stored as RON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::DofLimits;

/// Ratios a door leaf must stay below to read as "thin and tall"
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DoorDimensionLimits {
    /// Exclusive bound on depth / height
    pub max_depth_to_height: f32,
    /// Exclusive bound on depth / width
    pub max_depth_to_width: f32,
    /// Exclusive bound on width / height
    pub max_width_to_height: f32,
}

impl Default for DoorDimensionLimits {
    fn default() -> Self {
        Self {
            max_depth_to_height: 0.2,
            max_depth_to_width: 0.5,
            max_width_to_height: 1.0,
        }
    }
}

/// Mechanism bodies created by the hinge and slider factories
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MechanismConfig {
    pub hinge_axis: [f32; 3],
    pub hinge_limits: DofLimits,
    pub slider_axis: [f32; 3],
    pub slider_limits: DofLimits,
}

impl Default for MechanismConfig {
    fn default() -> Self {
        Self {
            hinge_axis: [0.0, 0.0, 1.0],
            hinge_limits: DofLimits::default_revolute(),
            slider_axis: [1.0, 0.0, 0.0],
            slider_limits: DofLimits::default_prismatic(),
        }
    }
}

/// Velocity limits of planar base connections
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OmniDriveConfig {
    pub translation_velocity: f32,
    pub yaw_velocity: f32,
}

impl Default for OmniDriveConfig {
    fn default() -> Self {
        Self {
            translation_velocity: 1.0,
            yaw_velocity: 1.0,
        }
    }
}

/// Complete world configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwinConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub door: DoorDimensionLimits,
    #[serde(default)]
    pub mechanisms: MechanismConfig,
    #[serde(default)]
    pub omni_drive: OmniDriveConfig,
    #[serde(default = "DofLimits::default_revolute")]
    pub revolute_limits: DofLimits,
    #[serde(default = "DofLimits::default_prismatic")]
    pub prismatic_limits: DofLimits,
}

impl Default for TwinConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            door: DoorDimensionLimits::default(),
            mechanisms: MechanismConfig::default(),
            omni_drive: OmniDriveConfig::default(),
            revolute_limits: DofLimits::default_revolute(),
            prismatic_limits: DofLimits::default_prismatic(),
        }
    }
}

impl TwinConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Configuration error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
}

/// Loads, edits and saves a configuration file
#[derive(Debug)]
pub struct ConfigManager {
    config: TwinConfig,
    config_path: PathBuf,
    dirty: bool,
}

impl ConfigManager {
    /// Open a configuration file, falling back to defaults if it is missing or invalid
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let config_path = path.into();
        let config = Self::load_from_path(&config_path).unwrap_or_else(|| {
            tracing::info!("No usable config at {:?}, using defaults", config_path);
            TwinConfig::default()
        });

        Self {
            config,
            config_path,
            dirty: false,
        }
    }

    fn load_from_path(path: &Path) -> Option<TwinConfig> {
        let content = std::fs::read_to_string(path).ok()?;
        match TwinConfig::from_ron(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file: {}", e);
                None
            }
        }
    }

    /// Get a reference to the current configuration
    pub fn config(&self) -> &TwinConfig {
        &self.config
    }

    /// Get a mutable reference to the configuration (marks as dirty)
    pub fn config_mut(&mut self) -> &mut TwinConfig {
        self.dirty = true;
        &mut self.config
    }

    /// Check if the configuration has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Save the configuration to disk
    pub fn save(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }

        // Ensure config directory exists
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = self.config.to_ron()?;
        std::fs::write(&self.config_path, &content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved config to {:?}", self.config_path);
        self.dirty = false;
        Ok(())
    }

    /// Reset configuration to defaults
    pub fn reset_to_defaults(&mut self) {
        self.config = TwinConfig::default();
        self.dirty = true;
    }

    pub fn config_file_path(&self) -> &Path {
        &self.config_path
    }
}
