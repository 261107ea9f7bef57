//! Two-phase signal schedule for the four approaches

use log::info;
use std::collections::HashMap;

use super::config::{require_ticks, ConfigError, LightPlacement, LightTimings};
use super::traffic_light::{TrafficLight, TrafficLightState};
use super::types::{Axis, Direction, Position};

/// Owns the four lights and flips right-of-way between the two axes
#[derive(Debug, Clone)]
pub struct IntersectionController {
    lights: HashMap<Direction, TrafficLight>,
    /// Axis that currently has right-of-way
    phase: Axis,
    phase_timer: u32,
    phase_duration: u32,
}

impl IntersectionController {
    /// Build the controller with one light per approach around `center`.
    /// Starts in the East-West phase.
    pub fn new(
        center: Position,
        placement: LightPlacement,
        timings: LightTimings,
        phase_duration: u32,
    ) -> Result<Self, ConfigError> {
        timings.validate()?;
        require_ticks("phase", phase_duration)?;
        Ok(Self::from_validated(
            center,
            placement,
            timings,
            phase_duration,
        ))
    }

    /// Caller has already validated `timings` and `phase_duration`
    pub(super) fn from_validated(
        center: Position,
        placement: LightPlacement,
        timings: LightTimings,
        phase_duration: u32,
    ) -> Self {
        let lights = Direction::ALL
            .iter()
            .map(|&direction| {
                let position = light_position(center, placement, direction);
                let light = TrafficLight::from_validated(position, direction, timings);
                (direction, light)
            })
            .collect();

        Self {
            lights,
            phase: Axis::EastWest,
            phase_timer: 0,
            phase_duration,
        }
    }

    pub fn phase(&self) -> Axis {
        self.phase
    }

    pub fn phase_timer(&self) -> u32 {
        self.phase_timer
    }

    pub fn phase_duration(&self) -> u32 {
        self.phase_duration
    }

    /// The light controlling `direction`. All four approaches always have one.
    pub fn light(&self, direction: Direction) -> &TrafficLight {
        &self.lights[&direction]
    }

    pub fn light_state(&self, direction: Direction) -> TrafficLightState {
        self.light(direction).state()
    }

    /// Lights in North, East, South, West order
    pub fn lights(&self) -> impl Iterator<Item = &TrafficLight> {
        Direction::ALL.iter().map(move |d| &self.lights[d])
    }

    /// True when any light on `axis` shows Green
    pub fn axis_has_green(&self, axis: Axis) -> bool {
        axis.directions()
            .iter()
            .any(|&d| self.light_state(d) == TrafficLightState::Green)
    }

    /// Advance the phase schedule and every light by one tick
    pub fn update_phase(&mut self) {
        self.phase_timer += 1;

        if self.phase_timer >= self.phase_duration {
            self.phase_timer = 0;

            let outgoing = self.phase;
            let incoming = outgoing.other();
            self.phase = incoming;
            info!("Phase change: {} -> {}", outgoing, incoming);

            // Outgoing axis must be Red before the incoming one turns Green
            for direction in outgoing.directions() {
                if let Some(light) = self.lights.get_mut(&direction) {
                    light.force_red();
                }
            }
            for direction in incoming.directions() {
                if let Some(light) = self.lights.get_mut(&direction) {
                    light.switch_to_green();
                }
            }
        }

        for light in self.lights.values_mut() {
            light.update();
        }
    }
}

/// Lights stand `along` units before the centre on their approach and
/// `lateral` units to the left of the approaching traffic.
fn light_position(center: Position, placement: LightPlacement, direction: Direction) -> Position {
    let (ux, uy) = direction.unit();
    // Right-hand perpendicular of the heading in screen coordinates
    let (rx, ry) = (-uy, ux);
    Position::new(
        center.x - ux * placement.along - rx * placement.lateral,
        center.y - uy * placement.along - ry * placement.lateral,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timings_and_phase_are_rejected() {
        let center = Position::new(500.0, 400.0);
        let placement = LightPlacement::default();
        let zero = LightTimings {
            red: 0,
            yellow: 0,
            green: 0,
        };
        assert!(matches!(
            IntersectionController::new(center, placement, zero, 300),
            Err(ConfigError::ZeroDuration { name: "red" })
        ));
        assert!(matches!(
            IntersectionController::new(center, placement, LightTimings::default(), 0),
            Err(ConfigError::ZeroDuration { name: "phase" })
        ));
        assert!(IntersectionController::new(center, placement, LightTimings::default(), 1).is_ok());
    }

    #[test]
    fn light_positions_match_reference_layout() {
        let center = Position::new(500.0, 400.0);
        let placement = LightPlacement::default();
        assert_eq!(
            light_position(center, placement, Direction::North),
            Position::new(470.0, 500.0)
        );
        assert_eq!(
            light_position(center, placement, Direction::South),
            Position::new(530.0, 300.0)
        );
        assert_eq!(
            light_position(center, placement, Direction::East),
            Position::new(400.0, 370.0)
        );
        assert_eq!(
            light_position(center, placement, Direction::West),
            Position::new(600.0, 430.0)
        );
    }
}
