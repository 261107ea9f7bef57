//! Standalone intersection simulation module
//!
//! This module contains all the core simulation logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod config;
mod controller;
mod traffic_light;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use config::{
    Bounds, ConfigError, LightPlacement, LightTimings, OvertakeConfig, SimConfig, StopWindow,
};
pub use controller::IntersectionController;
pub use traffic_light::{TrafficLight, TrafficLightState};
#[allow(unused_imports)]
pub use types::{
    Axis, Direction, Position, SimId, VehicleColor, VehicleId, OVERTAKING_LANE, THROUGH_LANE,
    VEHICLE_LENGTH, VEHICLE_PALETTE, VEHICLE_WIDTH,
};
pub use vehicle::Vehicle;
pub use world::{SimStats, Simulation};
