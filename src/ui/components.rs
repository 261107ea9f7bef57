//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{
    Bounds, Direction, Position, Simulation, TrafficLightState, Vehicle, VehicleColor, VehicleId,
    OVERTAKING_LANE,
};

/// Resource wrapper for the simulation
#[derive(Resource, Default)]
pub struct SimulationResource(pub Simulation);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Links a Bevy entity to a simulation vehicle
#[derive(Component)]
pub struct VehicleLink(pub VehicleId);

/// One of the three lamps of a traffic light
#[derive(Component)]
pub struct LightLamp {
    pub direction: Direction,
    pub lamp: TrafficLightState,
}

/// Marker for the stats panel text
#[derive(Component)]
pub struct StatsText;

/// Resource to track Bevy entities mapped to simulation vehicles
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub vehicles: HashMap<VehicleId, Entity>,
}

/// Sideways shift used to draw the overtaking lane apart from the through lane
pub const OVERTAKING_LANE_SHIFT: f32 = 15.0;

/// Convert simulation screen coordinates (origin top-left, y down) to Bevy
/// world coordinates (origin centre, y up)
pub fn to_world(bounds: &Bounds, position: &Position) -> Vec2 {
    Vec2::new(
        position.x - bounds.width / 2.0,
        bounds.height / 2.0 - position.y,
    )
}

/// Where the vehicle should be drawn, including the overtaking lane shift
pub fn vehicle_draw_position(bounds: &Bounds, vehicle: &Vehicle) -> Vec2 {
    let mut position = vehicle.position;
    if vehicle.lane() == OVERTAKING_LANE {
        match vehicle.direction {
            Direction::North | Direction::South => position.x += OVERTAKING_LANE_SHIFT,
            Direction::East | Direction::West => position.y += OVERTAKING_LANE_SHIFT,
        }
    }
    to_world(bounds, &position)
}

/// Rotation that lays a sprite's long (x) side along the heading
pub fn heading_rotation(direction: Direction) -> Quat {
    match direction {
        Direction::East | Direction::West => Quat::IDENTITY,
        Direction::North | Direction::South => Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
    }
}

pub fn to_bevy_color(color: VehicleColor) -> Color {
    Color::srgb_u8(color.0, color.1, color.2)
}
