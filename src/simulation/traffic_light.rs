//! Traffic light state machine for a single approach
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::debug;

use super::config::{ConfigError, LightTimings};
use super::types::{Axis, Direction, Position};

/// Signal shown by a light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficLightState {
    Red,
    Yellow,
    Green,
}

impl TrafficLightState {
    pub fn name(&self) -> &'static str {
        match self {
            TrafficLightState::Red => "RED",
            TrafficLightState::Yellow => "YELLOW",
            TrafficLightState::Green => "GREEN",
        }
    }

    /// Red and Yellow both hold vehicles at the stop window
    pub fn requires_stop(&self) -> bool {
        matches!(self, TrafficLightState::Red | TrafficLightState::Yellow)
    }
}

/// A light controlling one approach into the intersection
#[derive(Debug, Clone)]
pub struct TrafficLight {
    /// Where the light stands; also anchors the stop window
    pub position: Position,
    pub direction: Direction,
    state: TrafficLightState,
    /// Ticks spent in the current state
    timer: u32,
    timings: LightTimings,
    /// Only set while a timed Yellow is running out towards Red
    next_state: Option<TrafficLightState>,
}

impl TrafficLight {
    /// East-West lights start Green, North-South lights start Red.
    /// Fails when any state duration is zero.
    pub fn new(
        position: Position,
        direction: Direction,
        timings: LightTimings,
    ) -> Result<Self, ConfigError> {
        timings.validate()?;
        Ok(Self::from_validated(position, direction, timings))
    }

    pub(super) fn from_validated(
        position: Position,
        direction: Direction,
        timings: LightTimings,
    ) -> Self {
        let state = match direction.axis() {
            Axis::EastWest => TrafficLightState::Green,
            Axis::NorthSouth => TrafficLightState::Red,
        };

        Self {
            position,
            direction,
            state,
            timer: 0,
            timings,
            next_state: None,
        }
    }

    pub fn state(&self) -> TrafficLightState {
        self.state
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn timings(&self) -> LightTimings {
        self.timings
    }

    pub fn next_state(&self) -> Option<TrafficLightState> {
        self.next_state
    }

    /// For a Yellow light, the state it is heading to; `None` otherwise.
    /// A Yellow with no pending state is shown as heading to Red.
    pub fn yellow_target(&self) -> Option<TrafficLightState> {
        match self.state {
            TrafficLightState::Yellow => match self.next_state {
                Some(TrafficLightState::Green) => Some(TrafficLightState::Green),
                _ => Some(TrafficLightState::Red),
            },
            _ => None,
        }
    }

    /// Label used by the stats panel, e.g. `YELLOW (-> RED)`
    pub fn display_label(&self) -> String {
        match self.yellow_target() {
            Some(target) => format!("{} (-> {})", self.state.name(), target.name()),
            None => self.state.name().to_string(),
        }
    }

    /// Advance one tick
    pub fn update(&mut self) {
        self.timer += 1;

        match self.state {
            TrafficLightState::Green if self.timer >= self.timings.green => {
                self.next_state = Some(TrafficLightState::Red);
                self.transition(TrafficLightState::Yellow);
            }
            TrafficLightState::Yellow
                if self.next_state == Some(TrafficLightState::Red)
                    && self.timer >= self.timings.yellow =>
            {
                self.next_state = None;
                self.transition(TrafficLightState::Red);
            }
            _ => {}
        }
    }

    /// Drop straight to Red, skipping any remaining Yellow
    pub fn force_red(&mut self) {
        if self.state != TrafficLightState::Red {
            self.next_state = None;
            self.transition(TrafficLightState::Red);
        }
    }

    /// Turn Green, but only from Red so Yellow is never skipped for moving traffic
    pub fn switch_to_green(&mut self) {
        if self.state == TrafficLightState::Red {
            self.next_state = None;
            self.transition(TrafficLightState::Green);
        }
    }

    fn transition(&mut self, state: TrafficLightState) {
        debug!(
            "{} light: {:?} -> {:?} after {} ticks",
            self.direction.name(),
            self.state,
            state,
            self.timer
        );
        self.state = state;
        self.timer = 0;
    }
}
