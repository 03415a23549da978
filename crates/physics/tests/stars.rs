use cgmath::{prelude::*, Vector3};
use physics::{FusionPhase, SimError, Simulation, SimulationConfig};

fn sim() -> Simulation {
    Simulation::new(SimulationConfig {
        photons: false,
        collisions: false,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn fusion_burns_core_then_shell() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let star = sim.add_star(1e15, 1e4, zero, zero, zero, 1e27).unwrap();
    let core_radius = sim.star(star).unwrap().core_radius();

    let mut mass = sim.body(star).unwrap().mass();
    let mut phases = Vec::new();
    for _ in 0..200 {
        phases.push(sim.fuse(star).unwrap());
        let body = sim.body(star).unwrap();
        assert!(body.mass() < mass);
        assert_eq!(body.mass(), sim.star(star).unwrap().composition().mass());
        mass = body.mass();
    }
    assert_eq!(phases[0], FusionPhase::Core);
    assert_eq!(phases[199], FusionPhase::Shell);
    let first_shell = phases.iter().position(|&p| p == FusionPhase::Shell).unwrap();
    assert!(phases[..first_shell].iter().all(|&p| p == FusionPhase::Core));
    assert!(phases[first_shell..].iter().all(|&p| p == FusionPhase::Shell));

    let star = sim.star(star).unwrap();
    let composition = star.composition();
    assert_eq!(composition.core_hydrogen, 0.0);
    assert!(composition.core_helium > 0.0);
    assert!(composition.shell_hydrogen > 0.0);
    assert!(composition.shell_helium > 0.0);
    assert!(star.core_radius() < core_radius);
}

#[test]
fn exhausted_star_stops_losing_mass() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let star = sim.add_star(1e15, 1e4, zero, zero, zero, 1e40).unwrap();
    assert_eq!(sim.fuse(star), Ok(FusionPhase::Core));
    assert_eq!(sim.fuse(star), Ok(FusionPhase::Shell));
    let mass = sim.body(star).unwrap().mass();
    assert_eq!(sim.fuse(star), Ok(FusionPhase::Exhausted));
    assert_eq!(sim.fuse(star), Ok(FusionPhase::Exhausted));
    assert_eq!(sim.body(star).unwrap().mass(), mass);

    let composition = sim.star(star).unwrap().composition();
    assert_eq!(composition.core_hydrogen, 0.0);
    assert_eq!(composition.shell_hydrogen, 0.0);
    assert!(composition.core_helium >= 0.0 && composition.shell_helium >= 0.0);
}

#[test]
fn dark_star_is_idle() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let star = sim.add_star(5.0, 1.0, zero, zero, zero, 0.0).unwrap();
    assert_eq!(sim.fuse(star), Ok(FusionPhase::Idle));
    assert_eq!(sim.body(star).unwrap().mass(), 5.0);
}

#[test]
fn fusion_needs_a_live_star() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let rock = sim.add_body(1.0, 1.0, zero, zero, zero).unwrap();
    assert_eq!(sim.fuse(rock), Err(SimError::NotAStar(rock)));

    let star = sim
        .add_star(1.0, 1.0, Vector3::new(10.0, 0.0, 0.0), zero, zero, 1.0)
        .unwrap();
    sim.remove_body(star).unwrap();
    assert_eq!(sim.fuse(star), Err(SimError::BodyNotFound(star)));
}

#[test]
fn fuse_stars_skips_plain_matter() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let a = sim.add_star(1e15, 1.0, zero, zero, zero, 1e27).unwrap();
    sim.add_body(1.0, 1.0, Vector3::new(10.0, 0.0, 0.0), zero, zero)
        .unwrap();
    let b = sim
        .add_star(1e15, 1.0, Vector3::new(-10.0, 0.0, 0.0), zero, zero, 0.0)
        .unwrap();
    assert_eq!(
        sim.fuse_stars(),
        vec![(a, FusionPhase::Core), (b, FusionPhase::Idle)]
    );
}

#[test]
fn lighter_star_pulls_less() {
    let mut sim = sim();
    let zero = Vector3::zero();
    let star = sim.add_star(1e15, 1.0, zero, zero, zero, 1e40).unwrap();
    let probe = sim
        .add_body(1.0, 1.0, Vector3::new(1e3, 0.0, 0.0), zero, zero)
        .unwrap();
    sim.advance();
    let before = sim.body(probe).unwrap().net_force().magnitude();
    sim.fuse(star).unwrap();
    sim.advance();
    let after = sim.body(probe).unwrap().net_force().magnitude();
    assert!(after < before, "{after} >= {before}");
}
