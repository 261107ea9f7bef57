//! World setup systems for camera, roads, lights and the stats panel

use bevy::prelude::*;

use super::components::{to_world, LightLamp, MainCamera, SimulationResource, StatsText};
use crate::simulation::{Position, TrafficLightState};

/// Total width of each road (two lanes each way)
const ROAD_WIDTH: f32 = 300.0;
const DASH_LENGTH: f32 = 50.0;
const DASH_GAP: f32 = 20.0;

const ROAD_COLOR: Color = Color::srgb(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0);
const HOUSING_COLOR: Color = Color::BLACK;

/// Lamp colours as (lit, dark)
pub fn lamp_colors(lamp: TrafficLightState) -> (Color, Color) {
    match lamp {
        TrafficLightState::Red => (Color::srgb(1.0, 0.0, 0.0), Color::srgb_u8(150, 0, 0)),
        TrafficLightState::Yellow => (Color::srgb(1.0, 1.0, 0.0), Color::srgb_u8(150, 150, 0)),
        TrafficLightState::Green => (Color::srgb(0.0, 1.0, 0.0), Color::srgb_u8(0, 150, 0)),
    }
}

/// System to spawn the 2D camera
pub fn setup_world(mut commands: Commands) {
    commands.spawn((MainCamera, Camera2d));
}

/// System to lay out the two crossing roads and their markings
pub fn setup_roads(mut commands: Commands, simulation: Res<SimulationResource>) {
    let bounds = simulation.0.config().bounds;
    let (width, height) = (bounds.width, bounds.height);

    commands.spawn((
        Sprite::from_color(ROAD_COLOR, Vec2::new(width, ROAD_WIDTH)),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
    commands.spawn((
        Sprite::from_color(ROAD_COLOR, Vec2::new(ROAD_WIDTH, height)),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    // Dashed lane separators a quarter road width either side of each centre line
    let dash = Color::WHITE;
    let mut x = DASH_LENGTH / 2.0;
    while x < width - DASH_LENGTH / 2.0 {
        for offset in [-ROAD_WIDTH / 4.0, ROAD_WIDTH / 4.0] {
            let center = Vec2::new(x + DASH_LENGTH / 2.0 - width / 2.0, offset);
            commands.spawn((
                Sprite::from_color(dash, Vec2::new(DASH_LENGTH, 2.0)),
                Transform::from_translation(center.extend(0.1)),
            ));
        }
        x += DASH_LENGTH + DASH_GAP;
    }
    let mut y = DASH_LENGTH / 2.0;
    while y < height - DASH_LENGTH / 2.0 {
        for offset in [-ROAD_WIDTH / 4.0, ROAD_WIDTH / 4.0] {
            let center = Vec2::new(offset, height / 2.0 - (y + DASH_LENGTH / 2.0));
            commands.spawn((
                Sprite::from_color(dash, Vec2::new(2.0, DASH_LENGTH)),
                Transform::from_translation(center.extend(0.1)),
            ));
        }
        y += DASH_LENGTH + DASH_GAP;
    }

    // Centre lines
    let centre = Color::srgb(1.0, 1.0, 0.0);
    commands.spawn((
        Sprite::from_color(centre, Vec2::new(width, 3.0)),
        Transform::from_xyz(0.0, 0.0, 0.2),
    ));
    commands.spawn((
        Sprite::from_color(centre, Vec2::new(3.0, height)),
        Transform::from_xyz(0.0, 0.0, 0.2),
    ));

    // Road borders
    for offset in [-ROAD_WIDTH / 2.0, ROAD_WIDTH / 2.0] {
        commands.spawn((
            Sprite::from_color(Color::WHITE, Vec2::new(width, 5.0)),
            Transform::from_xyz(0.0, offset, 0.2),
        ));
        commands.spawn((
            Sprite::from_color(Color::WHITE, Vec2::new(5.0, height)),
            Transform::from_xyz(offset, 0.0, 0.2),
        ));
    }
}

/// System to spawn a housing and three lamps per traffic light
pub fn setup_lights(mut commands: Commands, simulation: Res<SimulationResource>) {
    let sim = &simulation.0;
    let bounds = sim.config().bounds;

    for light in sim.lights() {
        let center = to_world(&bounds, &light.position);
        commands.spawn((
            Sprite::from_color(HOUSING_COLOR, Vec2::new(30.0, 60.0)),
            Transform::from_translation(center.extend(2.0)),
        ));

        // Red on top, green at the bottom, in screen space
        let lamps = [
            (TrafficLightState::Red, -20.0),
            (TrafficLightState::Yellow, 0.0),
            (TrafficLightState::Green, 20.0),
        ];
        for (lamp, dy) in lamps {
            let lamp_position = Position::new(light.position.x, light.position.y + dy);
            let (lit, dark) = lamp_colors(lamp);
            let color = if light.state() == lamp { lit } else { dark };
            commands.spawn((
                LightLamp {
                    direction: light.direction,
                    lamp,
                },
                Sprite::from_color(color, Vec2::splat(16.0)),
                Transform::from_translation(to_world(&bounds, &lamp_position).extend(2.1)),
            ));
        }
    }
}

/// System to create the stats panel overlay
pub fn setup_stats_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.8, 0.8, 0.8, 0.8)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::BLACK),
                StatsText,
            ));
        });
}
