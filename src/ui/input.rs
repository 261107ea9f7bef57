//! Input handling systems

use bevy::prelude::*;

use super::components::SimulationResource;

/// Escape quits, D toggles the debug overlay
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut exit: MessageWriter<AppExit>,
    mut simulation: ResMut<SimulationResource>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        simulation.0.toggle_debug();
    }
}
