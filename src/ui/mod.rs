//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI reads state from `Simulation` every frame and renders it in 2D.

mod components;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

pub use components::{EntityMappings, SimulationResource};

use input::handle_input;
use sync::{draw_debug_overlay, sync_lights, sync_vehicles, tick_simulation, update_stats_text};
use world::{setup_lights, setup_roads, setup_stats_panel, setup_world};

/// Simulation ticks per second of wall-clock time
const TICK_RATE_HZ: f64 = 60.0;

/// Plugin to register all UI systems
pub struct IntersectionUIPlugin;

impl Plugin for IntersectionUIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimulationResource>()
            .init_resource::<EntityMappings>()
            .insert_resource(Time::<Fixed>::from_hz(TICK_RATE_HZ))
            .insert_resource(ClearColor(Color::srgb_u8(50, 150, 50)))
            .add_systems(
                Startup,
                (
                    setup_world,
                    setup_roads.after(setup_world),
                    setup_lights.after(setup_world),
                    setup_stats_panel,
                ),
            )
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    handle_input,
                    sync_vehicles,
                    sync_lights,
                    update_stats_text,
                    draw_debug_overlay,
                ),
            );
    }
}
