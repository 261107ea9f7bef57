//! Main simulation world that ties everything together
//!
//! This is the entry point for running the intersection simulation
//! without any Bevy dependencies.

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::Rng;
use rand::SeedableRng;

use super::config::{ConfigError, SimConfig};
use super::controller::IntersectionController;
use super::traffic_light::{TrafficLight, TrafficLightState};
use super::types::{
    Direction, Position, SimId, VehicleColor, VehicleId, OVERTAKING_LANE, THROUGH_LANE,
    VEHICLE_PALETTE,
};
use super::vehicle::Vehicle;

/// Running counters over the lifetime of a simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Vehicles admitted by the spawn gate
    pub spawned: u64,
    /// Spawn attempts dropped because the entry point was occupied
    pub rejected: u64,
    /// Vehicles removed after leaving the area
    pub exited: u64,
    /// Overtakes started
    pub overtakes: u64,
}

/// The single-intersection simulation
pub struct Simulation {
    config: SimConfig,

    /// Signal schedule and the four lights
    pub controller: IntersectionController,

    /// Live vehicles, in spawn order
    vehicles: Vec<Vehicle>,

    spawn_timer: u32,

    /// Next ID to assign
    next_id: usize,

    /// Ticks simulated so far
    pub ticks: u64,

    pub stats: SimStats,

    /// Display-only flag; never read by the simulation itself
    pub debug_mode: bool,

    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new_internal(SimConfig::default(), None)
    }
}

impl Simulation {
    fn new_internal(config: SimConfig, rng: Option<StdRng>) -> Self {
        let center = Position::new(config.bounds.center_x(), config.bounds.center_y());
        let controller = IntersectionController::from_validated(
            center,
            config.light_placement,
            config.lights,
            config.phase_duration,
        );

        Self {
            config,
            controller,
            vehicles: Vec::new(),
            spawn_timer: 0,
            next_id: 0,
            ticks: 0,
            stats: SimStats::default(),
            debug_mode: false,
            rng,
        }
    }

    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new_internal(config, None))
    }

    /// Create a new Simulation with a seeded RNG for reproducible runs
    pub fn new_with_seed(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new_internal(config, Some(StdRng::seed_from_u64(seed))))
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Read-only view of the live vehicles, in spawn order
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// Lights in North, East, South, West order
    pub fn lights(&self) -> impl Iterator<Item = &TrafficLight> {
        self.controller.lights()
    }

    pub fn toggle_debug(&mut self) {
        self.debug_mode = !self.debug_mode;
        debug!("Debug mode {}", if self.debug_mode { "on" } else { "off" });
    }

    /// Get a random value in the given range, using seeded RNG if available
    fn random_range(&mut self, range: std::ops::RangeInclusive<f32>) -> f32 {
        match &mut self.rng {
            Some(rng) => rng.random_range(range),
            None => rand::rng().random_range(range),
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<T: Copy>(&mut self, slice: &[T]) -> Option<T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng).copied(),
            None => slice.choose(&mut rand::rng()).copied(),
        }
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Off-screen point where a vehicle heading `direction` in `lane` enters
    pub fn entry_position(&self, direction: Direction, lane: u8) -> Position {
        let bounds = self.config.bounds;
        let offset = self.config.spawn_offset;
        let lateral = if lane == OVERTAKING_LANE {
            self.config.lane_offsets[1]
        } else {
            self.config.lane_offsets[0]
        };

        match direction {
            Direction::North => {
                Position::new(bounds.center_x() - lateral, bounds.height + offset)
            }
            Direction::South => Position::new(bounds.center_x() + lateral, -offset),
            Direction::East => Position::new(-offset, bounds.center_y() - lateral),
            Direction::West => {
                Position::new(bounds.width + offset, bounds.center_y() + lateral)
            }
        }
    }

    /// Attempt to spawn one random vehicle.
    /// Returns the new ID, or `None` when the entry point was occupied.
    pub fn spawn(&mut self) -> Option<VehicleId> {
        let direction = self.choose_random(&Direction::ALL)?;
        let speed = self.random_range(self.config.speed_min..=self.config.speed_max);
        let color = self.choose_random(&VEHICLE_PALETTE)?;
        let lane = self.choose_random(&[THROUGH_LANE, OVERTAKING_LANE])?;

        self.spawn_vehicle(direction, lane, speed, color)
    }

    /// Spawn a vehicle with the given parameters at its entry point,
    /// subject to the collision gate
    pub fn spawn_vehicle(
        &mut self,
        direction: Direction,
        lane: u8,
        speed: f32,
        color: VehicleColor,
    ) -> Option<VehicleId> {
        let position = self.entry_position(direction, lane);
        self.place_vehicle(position, direction, lane, speed, color)
    }

    /// Admit a vehicle at an arbitrary position, subject to the collision gate
    pub fn place_vehicle(
        &mut self,
        position: Position,
        direction: Direction,
        lane: u8,
        speed: f32,
        color: VehicleColor,
    ) -> Option<VehicleId> {
        if self.check_collision(&position, direction) {
            self.stats.rejected += 1;
            debug!(
                "Spawn rejected: {} entry at ({:.1}, {:.1}) is occupied",
                direction.name(),
                position.x,
                position.y
            );
            return None;
        }

        let id = self.next_vehicle_id();
        self.vehicles
            .push(Vehicle::new(id, position, direction, speed, color, lane));
        self.stats.spawned += 1;
        debug!(
            "Spawned vehicle {:?} heading {} in lane {} at speed {:.2}",
            id.0,
            direction.name(),
            lane,
            speed
        );
        Some(id)
    }

    /// True when a vehicle on the same heading lies closer than the safety
    /// gap to `position` along the axis of travel
    pub fn check_collision(&self, position: &Position, direction: Direction) -> bool {
        self.vehicles.iter().any(|other| {
            other.direction == direction
                && position.axis_distance(&other.position, direction) < self.config.safety_gap
        })
    }

    /// True when the vehicle is inside its light's stop window and the light
    /// shows Red or Yellow
    ///
    /// The window is measured along each vehicle's own heading for all four
    /// approaches, so East and West use the same `near`-before/`far`-past band
    /// as North and South.
    pub fn should_vehicle_stop(&self, vehicle: &Vehicle) -> bool {
        let light = self.controller.light(vehicle.direction);
        let window = self.config.stop_window;

        // Positive while the light is still ahead
        let to_light = vehicle
            .position
            .forward_gap(&light.position, vehicle.direction);
        let approaching = to_light < window.near && to_light > -window.far;

        approaching && light.state().requires_stop()
    }

    /// Start an overtake for the vehicle at `index` if a through-lane vehicle
    /// on the same heading is just ahead and its light is Green.
    /// Returns true when an overtake began.
    pub fn check_overtaking(&mut self, index: usize) -> bool {
        let Some(vehicle) = self.vehicles.get(index) else {
            return false;
        };

        if vehicle.is_overtaking() || vehicle.lane() != THROUGH_LANE {
            return false;
        }
        if self.controller.light_state(vehicle.direction) != TrafficLightState::Green {
            return false;
        }

        let trigger_gap = self.config.safety_gap * self.config.overtake.gap_multiplier;
        let blocked = self.vehicles.iter().any(|other| {
            if other.id == vehicle.id
                || other.direction != vehicle.direction
                || other.lane() != THROUGH_LANE
            {
                return false;
            }
            let gap = vehicle.position.forward_gap(&other.position, vehicle.direction);
            gap > 0.0 && gap < trigger_gap
        });

        if blocked {
            self.vehicles[index].begin_overtaking();
            self.stats.overtakes += 1;
        }
        blocked
    }

    /// Either look for an overtake, or count down the one in progress
    pub fn handle_overtaking(&mut self, index: usize) {
        let overtaking = match self.vehicles.get(index) {
            Some(vehicle) => vehicle.is_overtaking(),
            None => return,
        };

        if overtaking {
            let soft_cap = self.config.overtake.soft_cap;
            self.vehicles[index].tick_overtaking(soft_cap);
        } else {
            self.check_overtaking(index);
        }
    }

    /// True once the position is past the removal margin on any side
    pub fn is_out_of_bounds(&self, position: &Position) -> bool {
        out_of_bounds(&self.config, position)
    }

    /// Advance the whole simulation by one tick
    pub fn update(&mut self) {
        self.ticks += 1;
        self.controller.update_phase();

        self.spawn_timer += 1;
        if self.spawn_timer >= self.config.spawn_interval {
            self.spawn();
            self.spawn_timer = 0;
        }

        self.update_vehicles();
    }

    fn update_vehicles(&mut self) {
        let overtake = self.config.overtake;

        for index in 0..self.vehicles.len() {
            let stopped = self.should_vehicle_stop(&self.vehicles[index]);
            self.vehicles[index].stopped = stopped;

            if !stopped {
                self.handle_overtaking(index);
                self.vehicles[index].move_step(&overtake);
            }
        }

        let before = self.vehicles.len();
        let config = &self.config;
        self.vehicles.retain(|vehicle| {
            let gone = out_of_bounds(config, &vehicle.position);
            if gone {
                trace!("Vehicle {:?} left the area", vehicle.id.0);
            }
            !gone
        });
        self.stats.exited += (before - self.vehicles.len()) as u64;
    }

    /// Lines for the stats panel: counts followed by each light's state
    pub fn status_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Vehicles: {}", self.vehicles.len()),
            format!("Safety gap: {}px", self.config.safety_gap),
            format!(
                "Phase: {} ({}/{})",
                self.controller.phase(),
                self.controller.phase_timer(),
                self.controller.phase_duration()
            ),
        ];
        if let Some(light) = self.lights().next() {
            let timings = light.timings();
            lines.push(format!(
                "Timings: G{} Y{} R{}",
                timings.green, timings.yellow, timings.red
            ));
        }
        lines.extend([
            String::new(),
            "Light states:".to_string(),
        ]);
        for light in self.lights() {
            lines.push(format!(
                "{}: {}",
                light.direction.name(),
                light.display_label()
            ));
        }
        lines
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Intersection Simulation Summary ===");
        println!("Tick: {}", self.ticks);
        for line in self.status_lines() {
            println!("{}", line);
        }
        println!();

        println!("--- Totals ---");
        println!(
            "  spawned={}, rejected={}, exited={}, overtakes={}",
            self.stats.spawned, self.stats.rejected, self.stats.exited, self.stats.overtakes
        );

        if !self.vehicles.is_empty() {
            println!("--- Active Vehicles ---");
            for vehicle in &self.vehicles {
                println!(
                    "  Vehicle {:?}: heading={}, lane={}, speed={:.1}, position=({:.1}, {:.1}){}{}",
                    vehicle.id.0,
                    vehicle.direction.name(),
                    vehicle.lane(),
                    vehicle.speed,
                    vehicle.position.x,
                    vehicle.position.y,
                    if vehicle.stopped { ", stopped" } else { "" },
                    if vehicle.is_overtaking() {
                        ", overtaking"
                    } else {
                        ""
                    }
                );
            }
        }
    }

    /// Render a coarse text map of the intersection
    pub fn render_map(&self) -> String {
        const SCALE: f32 = 20.0;

        let bounds = self.config.bounds;
        let width = (bounds.width / SCALE).ceil() as usize + 1;
        let height = (bounds.height / SCALE).ceil() as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        let to_grid = |position: &Position| -> Option<(usize, usize)> {
            if position.x < 0.0
                || position.y < 0.0
                || position.x > bounds.width
                || position.y > bounds.height
            {
                return None;
            }
            let col = (position.x / SCALE) as usize;
            let row = (position.y / SCALE) as usize;
            Some((row.min(height - 1), col.min(width - 1)))
        };

        // Roads: the band covered by both lanes either side of each centre line
        let half_road = self.config.lane_offsets[0].max(self.config.lane_offsets[1]);
        for (row, cells) in grid.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                let x = col as f32 * SCALE;
                let y = row as f32 * SCALE;
                let on_ns = (x - bounds.center_x()).abs() <= half_road;
                let on_ew = (y - bounds.center_y()).abs() <= half_road;
                if on_ns || on_ew {
                    *cell = '.';
                }
            }
        }

        for light in self.lights() {
            if let Some((row, col)) = to_grid(&light.position) {
                grid[row][col] = match light.state() {
                    TrafficLightState::Red => 'R',
                    TrafficLightState::Yellow => 'Y',
                    TrafficLightState::Green => 'G',
                };
            }
        }

        for vehicle in &self.vehicles {
            if let Some((row, col)) = to_grid(&vehicle.position) {
                grid[row][col] = match vehicle.direction {
                    Direction::North => '^',
                    Direction::East => '>',
                    Direction::South => 'v',
                    Direction::West => '<',
                };
            }
        }

        let mut map = String::new();
        map.push_str("=== Intersection Map ===\n");
        map.push_str("Legend: R/Y/G=Light, ^>v<=Vehicle heading, .=Road\n");
        for row in &grid {
            map.extend(row.iter());
            map.push('\n');
        }
        map
    }

    /// Draw the text map to stdout
    pub fn draw_map(&self) {
        println!("{}", self.render_map());
    }
}

fn out_of_bounds(config: &SimConfig, position: &Position) -> bool {
    let margin = config.removal_margin;
    position.x < -margin
        || position.x > config.bounds.width + margin
        || position.y < -margin
        || position.y > config.bounds.height + margin
}
