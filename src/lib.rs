//! Intersection Simulation Library
//!
//! A four-way signalised intersection simulation that can run headless or
//! with a Bevy UI.

pub mod simulation;

#[cfg(feature = "ui")]
pub mod ui;
