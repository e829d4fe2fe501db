//! Collision configuration resource.
//!
//! Holds the broad-phase cell size and the delivery mode used for collision
//! notifications. Values can be loaded from, and saved to, an INI file.
//!
//! # Configuration File Format
//!
//! ```ini
//! [collision]
//! cell_size = 64
//! delivery = queued
//! ```
//!
//! `delivery` is either `queued` or `immediate`.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::fmt;
use std::path::PathBuf;

use crate::resources::spatialgrid::{DEFAULT_CELL_SIZE, is_valid_cell_size};

const DEFAULT_CONFIG_PATH: &str = "./collision.ini";

/// How the collision detector hands notifications to the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// `publish`: listeners run on the next `dispatch`.
    #[default]
    Queued,
    /// `publish_immediate`: listeners run inside the detector's tick.
    Immediate,
}

impl DeliveryMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "queued" | "queue" => Some(Self::Queued),
            "immediate" => Some(Self::Immediate),
            _ => None,
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Immediate => write!(f, "immediate"),
        }
    }
}

/// Collision configuration resource.
///
/// Changes are pushed into the detector by the
/// [`apply_collision_config`](crate::systems::collision::apply_collision_config) system.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CollisionConfig {
    /// Edge length of a broad-phase grid cell in world units.
    pub cell_size: f32,
    pub delivery: DeliveryMode,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            delivery: DeliveryMode::default(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing or invalid values retain their current values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);

        info!(
            "Loaded collision config: cell_size={}, delivery={}",
            self.cell_size, self.delivery
        );
        Ok(())
    }

    /// Parse configuration from INI text. Same rules as [`load_from_file`](Self::load_from_file).
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [collision] section
        match config.getfloat("collision", "cell_size") {
            Ok(Some(size)) => {
                let size = size as f32;
                if is_valid_cell_size(size) {
                    self.cell_size = size;
                } else {
                    warn!("Ignoring invalid cell_size {} (keeping {})", size, self.cell_size);
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring unreadable cell_size: {}", e),
        }
        if let Some(name) = config.get("collision", "delivery") {
            match DeliveryMode::from_name(&name) {
                Some(mode) => self.delivery = mode,
                None => warn!(
                    "Unknown delivery mode '{}' (keeping {})",
                    name, self.delivery
                ),
            }
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        config.set("collision", "cell_size", Some(self.cell_size.to_string()));
        config.set("collision", "delivery", Some(self.delivery.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved collision config to {:?}", self.config_path);
        Ok(())
    }
}
