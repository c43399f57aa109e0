//! Physics tuning and runtime settings
//!
//! Loaded from a JSON file on native builds. Missing fields take their
//! defaults, so a settings file only needs the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Movement and world tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Gravity magnitude (units/s²)
    pub gravity: f32,
    pub move_speed: f32,
    /// Control acceleration is `move_speed * move_accel_factor`
    pub move_accel_factor: f32,
    pub jump_speed: f32,
    pub jump_pad_multiplier: f32,
    pub player_friction: f32,
    pub crate_friction: f32,
    pub crate_push_speed: f32,
    pub teleport_range: f32,
    /// |y| beyond this kills the player
    pub fall_limit: f32,
    /// Upper bound on a single frame's game dt
    pub max_frame_dt: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            move_accel_factor: MOVE_ACCEL_FACTOR,
            jump_speed: JUMP_SPEED,
            jump_pad_multiplier: JUMP_PAD_MULTIPLIER,
            player_friction: PLAYER_FRICTION,
            crate_friction: CRATE_FRICTION,
            crate_push_speed: CRATE_PUSH_SPEED,
            teleport_range: TELEPORT_RANGE,
            fall_limit: FALL_LIMIT,
            max_frame_dt: MAX_FRAME_DT,
        }
    }
}

impl PhysicsTuning {
    /// Horizontal acceleration while a move key is held
    pub fn move_accel(&self) -> f32 {
        self.move_speed * self.move_accel_factor
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let positive = [
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_speed", self.jump_speed),
            ("teleport_range", self.teleport_range),
            ("fall_limit", self.fall_limit),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }

        let non_negative = [
            ("move_accel_factor", self.move_accel_factor),
            ("jump_pad_multiplier", self.jump_pad_multiplier),
            ("player_friction", self.player_friction),
            ("crate_friction", self.crate_friction),
            ("crate_push_speed", self.crate_push_speed),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: format!("must be zero or more, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    /// Base seed; each level attempt is seeded with `seed + level index`
    pub seed: u64,
    /// Level the campaign starts on (0-based)
    pub start_level: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            physics: PhysicsTuning::default(),
            seed: 0x7E1E_9027,
            start_level: 0,
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.physics.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from `path`
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read settings from `path`, falling back to defaults on any error
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
