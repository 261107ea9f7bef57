//! Systems for syncing Bevy entities with simulation state

use bevy::prelude::*;
use std::collections::HashSet;

use super::components::{
    heading_rotation, to_bevy_color, to_world, vehicle_draw_position, EntityMappings, LightLamp,
    SimulationResource, StatsText, VehicleLink,
};
use super::world::lamp_colors;
use crate::simulation::{Direction, VehicleId};

/// System to run simulation tick
pub fn tick_simulation(mut simulation: ResMut<SimulationResource>) {
    simulation.0.update();
}

/// System to sync vehicle visuals from simulation state
pub fn sync_vehicles(
    mut commands: Commands,
    simulation: Res<SimulationResource>,
    mut mappings: ResMut<EntityMappings>,
    mut vehicle_query: Query<(Entity, &VehicleLink, &mut Transform)>,
) {
    let sim = &simulation.0;
    let bounds = sim.config().bounds;

    // Update existing vehicles and track which ones still exist
    let mut existing: HashSet<VehicleId> = HashSet::new();

    for (entity, link, mut transform) in vehicle_query.iter_mut() {
        if let Some(vehicle) = sim.vehicle(link.0) {
            existing.insert(link.0);
            let position = vehicle_draw_position(&bounds, vehicle);
            transform.translation = position.extend(1.0);
        } else {
            // Vehicle no longer exists in simulation, despawn
            commands.entity(entity).despawn();
            mappings.vehicles.remove(&link.0);
        }
    }

    for vehicle in sim.vehicles() {
        if existing.contains(&vehicle.id) {
            continue;
        }
        let (width, length) = vehicle.footprint();
        let position = vehicle_draw_position(&bounds, vehicle);
        let entity = commands
            .spawn((
                VehicleLink(vehicle.id),
                Sprite::from_color(to_bevy_color(vehicle.color), Vec2::new(length, width)),
                Transform::from_translation(position.extend(1.0))
                    .with_rotation(heading_rotation(vehicle.direction)),
            ))
            .id();
        mappings.vehicles.insert(vehicle.id, entity);
    }
}

/// System to light the lamp matching each light's state
pub fn sync_lights(
    simulation: Res<SimulationResource>,
    mut lamp_query: Query<(&LightLamp, &mut Sprite)>,
) {
    let controller = &simulation.0.controller;
    for (lamp, mut sprite) in lamp_query.iter_mut() {
        let (lit, dark) = lamp_colors(lamp.lamp);
        sprite.color = if controller.light_state(lamp.direction) == lamp.lamp {
            lit
        } else {
            dark
        };
    }
}

/// System to refresh the stats panel
pub fn update_stats_text(
    simulation: Res<SimulationResource>,
    mut text_query: Query<&mut Text, With<StatsText>>,
) {
    let lines = simulation.0.status_lines().join("\n");
    for mut text in text_query.iter_mut() {
        **text = lines.clone();
    }
}

/// Overtaking markers always; safety gap markers and rear strips in debug mode
pub fn draw_debug_overlay(simulation: Res<SimulationResource>, mut gizmos: Gizmos) {
    let sim = &simulation.0;
    let bounds = sim.config().bounds;
    let half_gap = sim.config().safety_gap / 2.0;
    let marker = Color::srgb(1.0, 1.0, 0.0);
    let debug = Color::srgba(1.0, 0.0, 0.0, 0.5);

    for vehicle in sim.vehicles() {
        let center = vehicle_draw_position(&bounds, vehicle);

        if vehicle.is_overtaking() {
            gizmos.circle_2d(center, 3.0, marker);
        }

        if !sim.debug_mode {
            continue;
        }

        let (width, length) = vehicle.footprint();
        let rear = -Vec2::from(world_heading(vehicle.direction)) * (length / 2.0 + 2.5);
        match vehicle.direction {
            Direction::North | Direction::South => {
                for dy in [-half_gap, half_gap] {
                    gizmos.line_2d(
                        center + Vec2::new(-30.0, dy),
                        center + Vec2::new(30.0, dy),
                        debug,
                    );
                }
                gizmos.rect_2d(center + rear, Vec2::new(width, 5.0), debug);
            }
            Direction::East | Direction::West => {
                for dx in [-half_gap, half_gap] {
                    gizmos.line_2d(
                        center + Vec2::new(dx, -30.0),
                        center + Vec2::new(dx, 30.0),
                        debug,
                    );
                }
                gizmos.rect_2d(center + rear, Vec2::new(5.0, width), debug);
            }
        }
    }

    // Stop-window anchors
    if sim.debug_mode {
        for light in sim.lights() {
            gizmos.circle_2d(to_world(&bounds, &light.position), 6.0, debug);
        }
    }
}

/// Heading as a unit vector in Bevy world space (y up)
fn world_heading(direction: Direction) -> (f32, f32) {
    let (ux, uy) = direction.unit();
    (ux, -uy)
}
