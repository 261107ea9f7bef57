//! Vehicle movement and overtaking state
//!
//! Standalone implementation that doesn't depend on Bevy.

use log::trace;

use super::config::OvertakeConfig;
use super::types::{
    Direction, Position, VehicleColor, VehicleId, OVERTAKING_LANE, THROUGH_LANE, VEHICLE_LENGTH,
    VEHICLE_WIDTH,
};

/// A vehicle crossing the intersection on a straight heading
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: VehicleId,
    pub position: Position,
    pub direction: Direction,
    /// Base speed in units per tick
    pub speed: f32,
    pub color: VehicleColor,
    lane: u8,
    pub stopped: bool,
    overtaking: bool,
    overtaking_timer: u32,
}

impl Vehicle {
    /// Lanes other than the overtaking lane are treated as the through lane
    pub fn new(
        id: VehicleId,
        position: Position,
        direction: Direction,
        speed: f32,
        color: VehicleColor,
        lane: u8,
    ) -> Self {
        let lane = if lane == OVERTAKING_LANE {
            OVERTAKING_LANE
        } else {
            THROUGH_LANE
        };

        Self {
            id,
            position,
            direction,
            speed,
            color,
            lane,
            stopped: false,
            overtaking: false,
            overtaking_timer: 0,
        }
    }

    pub fn lane(&self) -> u8 {
        self.lane
    }

    pub fn is_overtaking(&self) -> bool {
        self.overtaking
    }

    pub fn overtaking_timer(&self) -> u32 {
        self.overtaking_timer
    }

    /// Footprint as (width, length)
    pub fn footprint(&self) -> (f32, f32) {
        (VEHICLE_WIDTH, VEHICLE_LENGTH)
    }

    /// Speed actually applied this tick
    pub fn effective_speed(&self, overtake: &OvertakeConfig) -> f32 {
        if self.overtaking {
            self.speed * overtake.speed_factor
        } else {
            self.speed
        }
    }

    /// Pull into the overtaking lane
    pub fn begin_overtaking(&mut self) {
        self.overtaking = true;
        self.lane = OVERTAKING_LANE;
        self.overtaking_timer = 0;
        trace!("Vehicle {:?} started overtaking", self.id.0);
    }

    /// Return to the through lane
    pub fn end_overtaking(&mut self) {
        self.overtaking = false;
        self.lane = THROUGH_LANE;
        self.overtaking_timer = 0;
        trace!("Vehicle {:?} back in lane {}", self.id.0, THROUGH_LANE);
    }

    /// Count one overtaking tick; ends the overtake once `cap` is exceeded.
    /// Returns true when the overtake ended.
    pub fn tick_overtaking(&mut self, cap: u32) -> bool {
        if !self.overtaking {
            return false;
        }
        self.overtaking_timer += 1;
        if self.overtaking_timer > cap {
            self.end_overtaking();
            return true;
        }
        false
    }

    /// Advance along the heading unless stopped, then apply the hard
    /// overtaking cap
    pub fn move_step(&mut self, overtake: &OvertakeConfig) {
        if self.stopped {
            return;
        }

        let speed = self.effective_speed(overtake);
        self.position.advance(self.direction, speed);

        self.tick_overtaking(overtake.hard_cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{SimId, VEHICLE_PALETTE};

    fn vehicle(direction: Direction, speed: f32) -> Vehicle {
        Vehicle::new(
            VehicleId(SimId(0)),
            Position::new(100.0, 100.0),
            direction,
            speed,
            VEHICLE_PALETTE[0],
            THROUGH_LANE,
        )
    }

    #[test]
    fn moves_along_heading() {
        let overtake = OvertakeConfig::default();
        let mut north = vehicle(Direction::North, 3.0);
        north.move_step(&overtake);
        assert_eq!(north.position, Position::new(100.0, 97.0));

        let mut west = vehicle(Direction::West, 2.0);
        west.move_step(&overtake);
        assert_eq!(west.position, Position::new(98.0, 100.0));
    }

    #[test]
    fn stopped_vehicle_stays_put() {
        let overtake = OvertakeConfig::default();
        let mut car = vehicle(Direction::East, 3.0);
        car.stopped = true;
        car.move_step(&overtake);
        assert_eq!(car.position, Position::new(100.0, 100.0));
    }

    #[test]
    fn overtaking_slows_the_vehicle() {
        let overtake = OvertakeConfig::default();
        let mut car = vehicle(Direction::East, 2.5);
        car.begin_overtaking();
        car.move_step(&overtake);
        assert!((car.position.x - 102.0).abs() < 1e-5);
        assert_eq!(car.overtaking_timer(), 1);
    }

    #[test]
    fn hard_cap_returns_vehicle_to_through_lane() {
        let overtake = OvertakeConfig::default();
        let mut car = vehicle(Direction::South, 2.0);
        car.begin_overtaking();

        for _ in 0..overtake.hard_cap {
            car.move_step(&overtake);
        }
        assert!(car.is_overtaking());
        assert_eq!(car.lane(), OVERTAKING_LANE);
        assert_eq!(car.overtaking_timer(), 120);

        car.move_step(&overtake);
        assert!(!car.is_overtaking());
        assert_eq!(car.lane(), THROUGH_LANE);
        assert_eq!(car.overtaking_timer(), 0);
    }

    #[test]
    fn unknown_lane_falls_back_to_through_lane() {
        let car = Vehicle::new(
            VehicleId(SimId(1)),
            Position::default(),
            Direction::South,
            2.0,
            VEHICLE_PALETTE[1],
            7,
        );
        assert_eq!(car.lane(), THROUGH_LANE);
    }
}
