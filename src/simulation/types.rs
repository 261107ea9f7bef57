//! Core types for the intersection simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VehicleId(pub SimId);

/// Compass heading of a vehicle, and the approach a light controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// The axis this heading runs along
    pub fn axis(&self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::NorthSouth,
            Direction::East | Direction::West => Axis::EastWest,
        }
    }

    /// Unit step in screen coordinates (y grows downwards)
    pub fn unit(&self) -> (f32, f32) {
        match self {
            Direction::North => (0.0, -1.0),
            Direction::South => (0.0, 1.0),
            Direction::East => (1.0, 0.0),
            Direction::West => (-1.0, 0.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::East => "EAST",
            Direction::South => "SOUTH",
            Direction::West => "WEST",
        }
    }
}

/// One of the two signal axes through the intersection
///
/// The controller's active phase is simply the axis that currently has
/// right-of-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    EastWest,
    NorthSouth,
}

impl Axis {
    pub fn other(&self) -> Axis {
        match self {
            Axis::EastWest => Axis::NorthSouth,
            Axis::NorthSouth => Axis::EastWest,
        }
    }

    /// The two approaches signalled together on this axis
    pub fn directions(&self) -> [Direction; 2] {
        match self {
            Axis::EastWest => [Direction::East, Direction::West],
            Axis::NorthSouth => [Direction::North, Direction::South],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::EastWest => write!(f, "EW"),
            Axis::NorthSouth => write!(f, "NS"),
        }
    }
}

/// A 2D position in screen units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Signed distance from `self` to `other` measured along `heading`.
    /// Positive when `other` lies ahead.
    pub fn forward_gap(&self, other: &Position, heading: Direction) -> f32 {
        let (ux, uy) = heading.unit();
        (other.x - self.x) * ux + (other.y - self.y) * uy
    }

    /// Absolute distance between the two points along the axis of `heading`
    pub fn axis_distance(&self, other: &Position, heading: Direction) -> f32 {
        self.forward_gap(other, heading).abs()
    }

    /// Move `distance` units along `heading`
    pub fn advance(&mut self, heading: Direction, distance: f32) {
        let (ux, uy) = heading.unit();
        self.x += ux * distance;
        self.y += uy * distance;
    }
}

/// An RGB colour used only by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleColor(pub u8, pub u8, pub u8);

/// Palette new vehicles draw their colour from
pub const VEHICLE_PALETTE: [VehicleColor; 7] = [
    VehicleColor(0, 0, 255),     // blue
    VehicleColor(255, 0, 0),     // red
    VehicleColor(0, 255, 0),     // green
    VehicleColor(128, 0, 128),   // purple
    VehicleColor(255, 165, 0),   // orange
    VehicleColor(165, 42, 42),   // brown
    VehicleColor(255, 192, 203), // pink
];

/// Width of a vehicle in world units (across its heading)
pub const VEHICLE_WIDTH: f32 = 20.0;

/// Length of a vehicle in world units (along its heading)
pub const VEHICLE_LENGTH: f32 = 40.0;

/// Lane index of the through lane
pub const THROUGH_LANE: u8 = 0;

/// Lane index of the overtaking lane
pub const OVERTAKING_LANE: u8 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_gap_follows_heading() {
        let a = Position::new(100.0, 100.0);
        let b = Position::new(106.0, 90.0);
        assert_eq!(a.forward_gap(&b, Direction::East), 6.0);
        assert_eq!(a.forward_gap(&b, Direction::West), -6.0);
        assert_eq!(a.forward_gap(&b, Direction::North), 10.0);
        assert_eq!(a.forward_gap(&b, Direction::South), -10.0);
    }

    #[test]
    fn axis_pairs_are_disjoint() {
        let ew = Axis::EastWest.directions();
        let ns = Axis::NorthSouth.directions();
        for d in ew {
            assert_eq!(d.axis(), Axis::EastWest);
            assert!(!ns.contains(&d));
        }
        assert_eq!(Axis::EastWest.other(), Axis::NorthSouth);
    }
}
