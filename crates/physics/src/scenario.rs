//! Ready-made initial conditions.

use crate::{BodyId, PhotometerId, SimError, Simulation, StarId};
use cgmath::{prelude::*, Vector3};
use rand::Rng;
use rand_distr::Distribution;

/// Handles into the [`transit_demo`] system.
#[derive(Debug, Copy, Clone)]
pub struct TransitDemo {
    pub star: StarId,
    pub planet: BodyId,
    pub photometer: PhotometerId,
}

/// A bright star, a planet drifting past it and a photometer off to the side.
pub fn transit_demo(sim: &mut Simulation) -> Result<TransitDemo, SimError> {
    let star = sim.add_star(
        1e15,
        6963.4,
        Vector3::new(1e6, 1e6, 0.0),
        Vector3::zero(),
        Vector3::zero(),
        1e30,
    )?;
    let planet = sim.add_body(
        1e9,
        6963.4,
        Vector3::new(1e6, 1.1e6, 0.0),
        Vector3::new(30.0, 0.0, 0.0),
        Vector3::zero(),
    )?;
    let photometer = sim.add_photometer(1e5, Vector3::new(1.2e6, 1e6, 0.0))?;
    Ok(TransitDemo {
        star,
        planet,
        photometer,
    })
}

/// `n` bodies scattered normally around the origin with swirling velocities.
pub fn random_cluster<R: Rng>(
    sim: &mut Simulation,
    rng: &mut R,
    n: usize,
    scale: f64,
) -> Result<Vec<BodyId>, SimError> {
    let normal = rand_distr::Normal::new(0.0f64, 1.0).expect("unit normal is valid");
    let mut r = || normal.sample(rng);
    (0..n)
        .map(|_| {
            let pos = Vector3::new(r(), r(), r());
            let swirl = Vector3::new(r(), r(), r());
            let mass = 1e9 * (0.8 * r().abs() + 0.2);
            let radius = 0.01 * scale * (0.8 * r().abs() + 0.2);
            sim.add_body(
                mass,
                radius,
                pos * scale,
                pos.cross(swirl) * 1e-3 * scale,
                Vector3::zero(),
            )
        })
        .collect()
}
