//! Construction-time parameters for the simulation
//!
//! Every knob has a default matching the reference 60 ticks-per-second
//! setup. Configs can be loaded from partial TOML files; missing keys
//! keep their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised when a configuration cannot drive the state machines
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{name} duration must be at least one tick")]
    ZeroDuration { name: &'static str },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },

    #[error("spawn offset {spawn_offset} must be smaller than removal margin {removal_margin}")]
    SpawnBeyondRemoval {
        spawn_offset: f32,
        removal_margin: f32,
    },

    #[error("speed range is empty: min {min} > max {max}")]
    InvalidSpeedRange { min: f32, max: f32 },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Durations of each light state, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTimings {
    pub red: u32,
    pub yellow: u32,
    pub green: u32,
}

impl Default for LightTimings {
    fn default() -> Self {
        Self {
            red: 180,
            yellow: 60,
            green: 240,
        }
    }
}

impl LightTimings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_ticks("red", self.red)?;
        require_ticks("yellow", self.yellow)?;
        require_ticks("green", self.green)
    }
}

/// Overtaking thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvertakeConfig {
    /// Start overtaking when a vehicle ahead is within `safety_gap * gap_multiplier`
    pub gap_multiplier: f32,
    /// Ticks after which the overtake completes normally
    pub soft_cap: u32,
    /// Ticks after which motion forces the vehicle back regardless of traffic
    pub hard_cap: u32,
    /// Speed scale applied while overtaking
    pub speed_factor: f32,
}

impl Default for OvertakeConfig {
    fn default() -> Self {
        Self {
            gap_multiplier: 1.5,
            soft_cap: 60,
            hard_cap: 120,
            speed_factor: 0.8,
        }
    }
}

/// Size of the visible area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
        }
    }
}

impl Bounds {
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }
}

/// Band around a light inside which vehicles obey Red and Yellow
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopWindow {
    /// Extent on the approach side of the light
    pub near: f32,
    /// Extent past the light
    pub far: f32,
}

impl Default for StopWindow {
    fn default() -> Self {
        Self {
            near: 50.0,
            far: 20.0,
        }
    }
}

/// Where lights sit relative to the intersection centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightPlacement {
    /// Distance before the centre on the light's approach
    pub along: f32,
    /// Sideways offset to the left of the approaching traffic
    pub lateral: f32,
}

impl Default for LightPlacement {
    fn default() -> Self {
        Self {
            along: 100.0,
            lateral: 30.0,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub lights: LightTimings,
    /// Ticks each axis holds right-of-way before the controller flips
    pub phase_duration: u32,
    /// Ticks between spawn attempts
    pub spawn_interval: u32,
    /// Minimum along-axis gap between same-heading vehicles at spawn
    pub safety_gap: f32,
    pub speed_min: f32,
    pub speed_max: f32,
    pub overtake: OvertakeConfig,
    pub bounds: Bounds,
    /// How far outside the visible area vehicles enter
    pub spawn_offset: f32,
    /// How far past any edge a vehicle travels before it is removed
    pub removal_margin: f32,
    /// Lateral distance from the centre line for lane 0 and lane 1
    pub lane_offsets: [f32; 2],
    pub stop_window: StopWindow,
    pub light_placement: LightPlacement,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            lights: LightTimings::default(),
            phase_duration: 300,
            spawn_interval: 90,
            safety_gap: 5.0,
            speed_min: 2.0,
            speed_max: 4.0,
            overtake: OvertakeConfig::default(),
            bounds: Bounds::default(),
            spawn_offset: 50.0,
            removal_margin: 100.0,
            lane_offsets: [50.0, 20.0],
            stop_window: StopWindow::default(),
            light_placement: LightPlacement::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reject values the phase and light state machines cannot progress with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lights.validate()?;
        require_ticks("phase", self.phase_duration)?;
        require_ticks("spawn interval", self.spawn_interval)?;
        require_ticks("overtake soft cap", self.overtake.soft_cap)?;
        require_ticks("overtake hard cap", self.overtake.hard_cap)?;

        require_positive("safety gap", self.safety_gap)?;
        require_positive("minimum speed", self.speed_min)?;
        require_positive("overtake gap multiplier", self.overtake.gap_multiplier)?;
        require_positive("overtake speed factor", self.overtake.speed_factor)?;
        require_positive("area width", self.bounds.width)?;
        require_positive("area height", self.bounds.height)?;

        require_non_negative("spawn offset", self.spawn_offset)?;
        require_non_negative("removal margin", self.removal_margin)?;
        require_non_negative("lane 0 offset", self.lane_offsets[0])?;
        require_non_negative("lane 1 offset", self.lane_offsets[1])?;
        require_non_negative("stop window near", self.stop_window.near)?;
        require_non_negative("stop window far", self.stop_window.far)?;

        if self.speed_min > self.speed_max {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }

        // Entry points must lie inside the removal line
        if self.spawn_offset >= self.removal_margin {
            return Err(ConfigError::SpawnBeyondRemoval {
                spawn_offset: self.spawn_offset,
                removal_margin: self.removal_margin,
            });
        }
        Ok(())
    }
}

pub(super) fn require_ticks(name: &'static str, ticks: u32) -> Result<(), ConfigError> {
    if ticks == 0 {
        return Err(ConfigError::ZeroDuration { name });
    }
    Ok(())
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    // Written so NaN fails too
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive { name, value });
    }
    Ok(())
}

#[allow(clippy::neg_cmp_op_on_partial_ord)]
fn require_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative { name, value });
    }
    Ok(())
}
