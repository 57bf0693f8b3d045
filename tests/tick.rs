//! Tests that drive whole ticks of the reference two-vehicle simulation.

use led_traffic::{
    locate, Color, FixedSampler, MemoryStrip, Position, Simulation, TurnSampler, VehicleId,
    NUM_PIXELS,
};

fn reference_sim<S: TurnSampler>(sampler: S) -> Simulation<S> {
    let mut sim = Simulation::new(sampler);
    sim.add_vehicle(Position::new(0, 0).unwrap()).unwrap();
    sim.add_vehicle(Position::new(4, 0).unwrap()).unwrap();
    sim
}

/// Test that one tick draws the starting positions and then advances both vehicles.
#[test]
fn first_tick() {
    let mut sim = reference_sim(FixedSampler(false));
    let mut strip = MemoryStrip::new();

    let report = sim.step(&mut strip).unwrap();
    assert_eq!((report.moved, report.blocked), (2, 0));
    assert_eq!(strip.shows(), 1);
    assert_eq!(strip.shown().len(), NUM_PIXELS);
    assert_eq!(strip.shown()[locate(0, 0).unwrap()], Color::BLUE);
    assert_eq!(strip.shown()[locate(4, 0).unwrap()], Color::RED);

    let registry = sim.registry();
    assert_eq!(registry.position_of(VehicleId(0)).unwrap(), Position::new(0, 1).unwrap());
    assert_eq!(registry.position_of(VehicleId(1)).unwrap(), Position::new(4, 1).unwrap());

    sim.step(&mut strip).unwrap();
    let a = strip.shown()[locate(0, 1).unwrap()];
    let b = strip.shown()[locate(4, 1).unwrap()];
    assert_eq!(a, Color::BLUE);
    assert_eq!(b, Color::RED);
    assert_ne!(a, b);
}

/// Test that the strip always shows where the vehicles were before they moved.
#[test]
fn render_lags_movement() {
    let mut sim = reference_sim(FixedSampler(false));
    let mut strip = MemoryStrip::new();
    for _ in 0..25 {
        let before: Vec<_> = sim.iter_vehicles().map(|v| v.location()).collect();
        sim.step(&mut strip).unwrap();
        assert_eq!(strip.shown()[before[0]], Color::BLUE);
        assert_eq!(strip.shown()[before[1]], Color::RED);
    }
}

/// Test that the vehicles never share a pixel, whatever the turns.
#[test]
fn no_collisions() {
    let mut flip = 0u32;
    let sampler = move || {
        flip = flip.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        flip % 4 == 0
    };
    let mut sim = reference_sim(sampler);
    sim.add_vehicle(Position::new(2, 0).unwrap()).unwrap();
    sim.add_vehicle(Position::new(0, 7).unwrap()).unwrap();
    let mut strip = MemoryStrip::new();

    for _ in 0..500 {
        sim.step(&mut strip).unwrap();
        let mut locations: Vec<_> = sim.iter_vehicles().map(|v| v.location()).collect();
        locations.sort_unstable();
        locations.dedup();
        assert_eq!(locations.len(), 4);
        for vehicle in sim.iter_vehicles() {
            assert_eq!(
                sim.registry().position_of(vehicle.id()).unwrap(),
                vehicle.position()
            );
        }
    }
}

/// Test that a vehicle queued behind another waits for it to move on.
#[test]
fn follower_waits() {
    let mut sim = Simulation::new(FixedSampler(false));
    let leader = sim.add_vehicle(Position::new(0, 5).unwrap()).unwrap();
    let follower = sim.add_vehicle(Position::new(0, 4).unwrap()).unwrap();
    let mut strip = MemoryStrip::new();

    // The leader moves first, so the follower's cell has already been vacated.
    let report = sim.step(&mut strip).unwrap();
    assert_eq!(report.blocked, 0);
    assert_eq!(sim.get_vehicle(leader).unwrap().address(), 6);
    assert_eq!(sim.get_vehicle(follower).unwrap().address(), 5);

    // Added in the other order, the follower is blocked on the first tick.
    let mut sim = Simulation::new(FixedSampler(false));
    let follower = sim.add_vehicle(Position::new(0, 4).unwrap()).unwrap();
    sim.add_vehicle(Position::new(0, 5).unwrap()).unwrap();
    let report = sim.step(&mut strip).unwrap();
    assert_eq!((report.moved, report.blocked), (1, 1));
    assert_eq!(sim.get_vehicle(follower).unwrap().address(), 4);
}

/// Test that a vehicle loops the main roads forever when it never turns.
#[test]
fn main_road_loop() {
    let mut sim = Simulation::new(FixedSampler(false));
    let id = sim.add_vehicle(Position::new(0, 0).unwrap()).unwrap();
    let mut strip = MemoryStrip::new();
    for _ in 0..20 {
        sim.step(&mut strip).unwrap();
    }
    assert_eq!(sim.get_vehicle(id).unwrap().position(), Position::new(0, 0).unwrap());
}
