//! Phase schedule tests for the intersection controller

use intersection_sim::simulation::{
    Axis, Direction, IntersectionController, LightPlacement, LightTimings, Position,
    TrafficLightState,
};

fn controller(phase_duration: u32) -> IntersectionController {
    IntersectionController::new(
        Position::new(500.0, 400.0),
        LightPlacement::default(),
        LightTimings::default(),
        phase_duration,
    )
    .unwrap()
}

#[test]
fn test_starts_in_east_west_phase() {
    let controller = controller(300);
    assert_eq!(controller.phase(), Axis::EastWest);
    assert_eq!(controller.light_state(Direction::East), TrafficLightState::Green);
    assert_eq!(controller.light_state(Direction::West), TrafficLightState::Green);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Red);
    assert_eq!(controller.light_state(Direction::South), TrafficLightState::Red);
    assert_eq!(controller.lights().count(), 4);
}

#[test]
fn test_phase_flips_after_phase_duration() {
    let mut controller = controller(300);

    for _ in 0..240 {
        controller.update_phase();
    }
    assert_eq!(controller.light_state(Direction::East), TrafficLightState::Yellow);
    assert_eq!(controller.phase(), Axis::EastWest);

    for _ in 0..59 {
        controller.update_phase();
    }
    assert_eq!(controller.phase(), Axis::EastWest);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Red);

    controller.update_phase();
    assert_eq!(controller.phase(), Axis::NorthSouth);
    assert_eq!(controller.phase_timer(), 0);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Green);
    assert_eq!(controller.light_state(Direction::South), TrafficLightState::Green);
    assert_eq!(controller.light_state(Direction::East), TrafficLightState::Red);
    assert_eq!(controller.light_state(Direction::West), TrafficLightState::Red);

    // Lights involved in the flip counted this tick from zero
    assert_eq!(controller.light(Direction::North).timer(), 1);
    assert_eq!(controller.light(Direction::East).timer(), 1);
}

#[test]
fn test_east_west_returns_to_green() {
    let mut controller = controller(300);
    for _ in 0..600 {
        controller.update_phase();
    }
    assert_eq!(controller.phase(), Axis::EastWest);
    assert_eq!(controller.light_state(Direction::East), TrafficLightState::Green);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Red);
}

#[test]
fn test_short_phase_forces_red_before_yellow() {
    let mut controller = controller(100);
    for _ in 0..100 {
        controller.update_phase();
    }
    // Green was cut short, no Yellow in between
    assert_eq!(controller.light_state(Direction::East), TrafficLightState::Red);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Green);
}

#[test]
fn test_long_phase_leaves_all_red_gap() {
    let mut controller = controller(500);
    for _ in 0..300 {
        controller.update_phase();
    }
    assert_eq!(controller.phase(), Axis::EastWest);
    for direction in Direction::ALL {
        assert_eq!(controller.light_state(direction), TrafficLightState::Red);
    }

    for _ in 0..200 {
        controller.update_phase();
    }
    assert_eq!(controller.phase(), Axis::NorthSouth);
    assert_eq!(controller.light_state(Direction::North), TrafficLightState::Green);
}

#[test]
fn test_axes_never_green_together() {
    for phase_duration in [1, 7, 60, 100, 240, 300, 301, 500, 1000] {
        let mut controller = controller(phase_duration);
        for tick in 0..3000 {
            controller.update_phase();
            assert!(
                !(controller.axis_has_green(Axis::EastWest)
                    && controller.axis_has_green(Axis::NorthSouth)),
                "both axes green at tick {} with phase duration {}",
                tick,
                phase_duration
            );
        }
    }
}

#[test]
fn test_active_axis_is_the_only_one_granted_green() {
    let mut controller = controller(300);
    for _ in 0..3000 {
        controller.update_phase();
        let inactive = controller.phase().other();
        assert!(!controller.axis_has_green(inactive));
    }
}
