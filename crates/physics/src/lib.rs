use cgmath::{prelude::*, Vector3};
use instant::Instant;
use rayon::prelude::*;
use std::time::Duration;

mod body;
pub mod collision;
mod config;
mod error;
mod force;
mod photon;
pub mod scenario;
mod star;
pub mod trajectory;

pub use body::{Body, BodyId, BodyKind};
pub use config::{PhysicalConstants, SimulationConfig};
pub use error::{ConfigError, SimError};
pub use force::{gravity, ForceLink, ForceStatus};
pub use photon::{segment_sphere, Photometer, PhotometerId, Photon};
pub use star::{
    spiral_point, Composition, FusionPhase, Star, HELIUM_WEIGHT, HYDROGEN_WEIGHT, MASS_DEFECT,
};
pub use trajectory::{Conic, ConicKind};

pub type StarId = BodyId;

/// Physically suspect situations met so far. None of them stop the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Force evaluations between bodies at zero separation.
    pub coincident_pairs: u64,
    /// Force evaluations between overlapping bodies.
    pub near_contact_pairs: u64,
    /// Photons that could not be traced.
    pub degenerate_rays: u64,
    /// Links found pointing at a body that no longer exists.
    pub dangling_links: u64,
    pub merges: u64,
}
impl Diagnostics {
    pub fn warnings(&self) -> u64 {
        self.coincident_pairs + self.near_contact_pairs + self.degenerate_rays
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RunResult {
    pub elapsed_real: Duration,
    pub elapsed_ticks: u64,
}

/// Owns every body, star, photometer and force link.
#[derive(Debug, Clone, Default)]
pub struct Simulation {
    config: SimulationConfig,
    bodies: Vec<Option<Body>>,
    links: Vec<ForceLink>,
    photometers: Vec<Photometer>,
    tick: u64,
    diagnostics: Diagnostics,
}

impl Simulation {
    /// Fails if the constants are not usable.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
    pub fn tick(&self) -> u64 {
        self.tick
    }
    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    pub fn add_body(
        &mut self,
        mass: f64,
        radius: f64,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        accel: Vector3<f64>,
    ) -> Result<BodyId, SimError> {
        validate(mass, radius)?;
        Ok(self.insert(Body::new(mass, radius, pos, vel, accel, BodyKind::Matter)))
    }

    pub fn add_star(
        &mut self,
        mass: f64,
        radius: f64,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        accel: Vector3<f64>,
        luminosity: f64,
    ) -> Result<StarId, SimError> {
        validate(mass, radius)?;
        if !(luminosity.is_finite() && luminosity >= 0.0) {
            return Err(SimError::InvalidLuminosity(luminosity));
        }
        let star = Star::new(mass, radius, luminosity);
        Ok(self.insert(Body::new(mass, radius, pos, vel, accel, BodyKind::Star(star))))
    }

    pub fn add_photometer(
        &mut self,
        radius: f64,
        pos: Vector3<f64>,
    ) -> Result<PhotometerId, SimError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        self.photometers.push(Photometer::new(radius, pos));
        Ok(PhotometerId(self.photometers.len() - 1))
    }

    /// Links the new body both ways with every existing one and folds the
    /// fresh link forces into the accumulators.
    fn insert(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len());
        self.bodies.push(Some(body));
        let others: Vec<BodyId> = self.ids().filter(|&other| other != id).collect();
        let first_new = self.links.len();
        for other in others {
            self.links.push(ForceLink::new(id, other));
            self.links.push(ForceLink::new(other, id));
        }
        for index in first_new..self.links.len() {
            let status = self.links[index].update(&self.bodies, &self.config.constants);
            note_force(&mut self.diagnostics, &self.links[index], status);
        }
        for index in first_new..self.links.len() {
            let link = &self.links[index];
            if let Some(target) = self.bodies[link.target.0].as_mut() {
                target.net_force += link.components;
            }
        }
        id
    }

    /// Drops a body together with every link that mentions it.
    pub fn remove_body(&mut self, id: BodyId) -> Result<Body, SimError> {
        let body = self
            .bodies
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(SimError::BodyNotFound(id))?;
        // Its pull was folded into the other bodies' accelerations at the last step.
        for link in self.links.iter().filter(|link| link.source == id) {
            if let Some(target) = self.bodies[link.target.0].as_mut() {
                target.accel -= link.applied;
            }
        }
        self.links.retain(|link| !link.touches(id));
        self.accumulate_forces(false);
        log::info!("Removed body {}", id);
        Ok(body)
    }

    /// Ids of all live bodies and stars, oldest first.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_some())
            .map(|(i, _)| BodyId(i))
    }
    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &Body)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.as_ref().map(|b| (BodyId(i), b)))
    }
    pub fn body(&self, id: BodyId) -> Result<&Body, SimError> {
        self.bodies
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(SimError::BodyNotFound(id))
    }
    pub fn star(&self, id: StarId) -> Result<&Star, SimError> {
        self.body(id)?.star().ok_or(SimError::NotAStar(id))
    }
    pub fn photometer(&self, id: PhotometerId) -> Result<&Photometer, SimError> {
        self.photometers
            .get(id.0)
            .ok_or(SimError::PhotometerNotFound(id))
    }
    pub fn photometers(&self) -> &[Photometer] {
        &self.photometers
    }
    pub fn links(&self) -> &[ForceLink] {
        &self.links
    }
    pub fn len(&self) -> usize {
        self.ids().count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn total_mass(&self) -> f64 {
        self.bodies().map(|(_, b)| b.mass).sum()
    }
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.bodies().map(|(_, b)| b.momentum()).sum()
    }

    /// Advances everything by one tick.
    pub fn advance(&mut self) {
        for photometer in &mut self.photometers {
            photometer.recorded.push(0);
        }
        let record_history = self.config.record_history;
        for body in self.bodies.iter_mut().flatten() {
            body.step(record_history);
        }
        for link in &mut self.links {
            link.applied = match &self.bodies[link.target.0] {
                Some(target) => link.components / target.mass,
                None => Vector3::zero(),
            };
        }
        self.accumulate_forces(true);
        if self.config.photons {
            self.propagate_light();
        }
        if self.config.collisions {
            self.resolve_collisions();
        }
        self.tick += 1;
    }

    pub fn run(&mut self, ticks: u64) -> RunResult {
        let before = Instant::now();
        for _ in 0..ticks {
            self.advance();
        }
        RunResult {
            elapsed_real: Instant::now() - before,
            elapsed_ticks: ticks,
        }
    }

    /// Recomputes every link from current positions, then sums them into the
    /// targets in link order so the result does not depend on thread count.
    /// Only the first pass of a tick feeds the diagnostics.
    fn accumulate_forces(&mut self, count: bool) {
        let bodies = &self.bodies;
        let constants = &self.config.constants;
        let statuses: Vec<ForceStatus> = self
            .links
            .par_iter_mut()
            .map(|link| link.update(bodies, constants))
            .collect();
        for body in self.bodies.iter_mut().flatten() {
            body.net_force = Vector3::zero();
        }
        for (link, status) in self.links.iter().zip(statuses) {
            if let Some(target) = self.bodies[link.target.0].as_mut() {
                target.net_force += link.components;
            }
            if count {
                note_force(&mut self.diagnostics, link, status);
            }
        }
    }

    fn propagate_light(&mut self) {
        let constants = self.config.constants;
        let cap = self.config.max_photon_batch;
        for index in 0..self.bodies.len() {
            let Some(star) = self.bodies[index].as_mut().and_then(Body::star_mut) else {
                continue;
            };
            let mut photons = std::mem::take(&mut star.photons);

            let bodies = &self.bodies;
            let photometers = &self.photometers;
            let traces: Vec<_> = photons
                .par_iter_mut()
                .map(|p| {
                    p.propagate(BodyId(index), bodies, photometers, constants.speed_of_light)
                })
                .collect();
            for trace in traces {
                if trace.degenerate {
                    self.diagnostics.degenerate_rays += 1;
                }
                for hit in trace.photometer_hits {
                    if let Some(count) = self.photometers[hit].recorded.last_mut() {
                        *count += 1;
                    }
                }
            }
            photons.retain(|p| p.age() < constants.photon_lifetime);

            let Some(body) = self.bodies[index].as_mut() else {
                continue;
            };
            let origin = body.pos;
            if let Some(star) = body.star_mut() {
                star.photons = photons;
                star.emit(origin, &constants, cap);
            }
        }
    }

    fn resolve_collisions(&mut self) {
        let pairs = collision::detect(&self.bodies);
        if pairs.is_empty() {
            return;
        }
        for (a, b) in pairs {
            let (Some(body_a), Some(body_b)) = (&self.bodies[a.0], &self.bodies[b.0]) else {
                continue;
            };
            let keep = collision::survivor((a, body_a), (b, body_b));
            let gone = if keep == a { b } else { a };
            let Some(absorbed) = self.bodies[gone.0].take() else {
                continue;
            };
            if let Some(survivor) = self.bodies[keep.0].as_mut() {
                let masses = (survivor.mass, absorbed.mass);
                collision::absorb(survivor, &absorbed);
                collision::merge_applied(&mut self.links, keep, gone, masses);
                log::info!(
                    "Body {} absorbed {} at tick {}, merged mass {:e}",
                    keep,
                    gone,
                    self.tick,
                    survivor.mass
                );
            }
            self.links.retain(|link| !link.touches(gone));
            self.diagnostics.merges += 1;
        }
        self.accumulate_forces(false);
    }

    /// Runs one fusion step on a star and syncs its mass with its composition.
    pub fn fuse(&mut self, id: StarId) -> Result<FusionPhase, SimError> {
        let constants = self.config.constants;
        let body = self
            .bodies
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(SimError::BodyNotFound(id))?;
        let star = body.star_mut().ok_or(SimError::NotAStar(id))?;
        let before = star.composition;
        let (phase, mass) = star.fuse(&constants);
        if before.core_hydrogen > 0.0 && star.composition.core_hydrogen == 0.0 {
            log::info!("Star {} exhausted its core hydrogen", id);
        }
        if before.shell_hydrogen > 0.0 && star.composition.shell_hydrogen == 0.0 {
            log::info!("Star {} exhausted its shell hydrogen", id);
        }
        if let Some(mass) = mass {
            body.mass = mass;
        }
        Ok(phase)
    }

    /// Fusion step for every star.
    pub fn fuse_stars(&mut self) -> Vec<(StarId, FusionPhase)> {
        let stars: Vec<StarId> = self
            .bodies()
            .filter(|(_, b)| b.is_star())
            .map(|(id, _)| id)
            .collect();
        stars
            .into_iter()
            .filter_map(|id| self.fuse(id).ok().map(|phase| (id, phase)))
            .collect()
    }

    /// Conic through the body's most recent positions, if enough were recorded.
    pub fn fit_trajectory(&self, id: BodyId) -> Result<Option<Conic>, SimError> {
        Ok(Conic::fit(self.body(id)?.history()))
    }

    /// Dumps incoming and outgoing link forces per body at debug level.
    pub fn log_forces(&self) {
        if !log::log_enabled!(log::Level::Debug) {
            return;
        }
        log::debug!("Force links: {}", self.links.len());
        for (id, body) in self.bodies() {
            log::debug!("{} (mass {:e}):", id, body.mass);
            for link in self.links.iter().filter(|l| l.target == id) {
                log::debug!("\tin  from {}: {:?}", link.source, link.components);
            }
            for link in self.links.iter().filter(|l| l.source == id) {
                log::debug!("\tout to   {}: {:?}", link.target, link.components);
            }
        }
    }
}

fn validate(mass: f64, radius: f64) -> Result<(), SimError> {
    if !(mass.is_finite() && mass > 0.0) {
        return Err(SimError::InvalidMass(mass));
    }
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SimError::InvalidRadius(radius));
    }
    Ok(())
}

fn note_force(diagnostics: &mut Diagnostics, link: &ForceLink, status: ForceStatus) {
    match status {
        ForceStatus::Nominal => {}
        ForceStatus::NearContact => {
            diagnostics.near_contact_pairs += 1;
            log::debug!(
                "Bodies {} and {} overlap, gravity is low confidence",
                link.source,
                link.target
            );
        }
        ForceStatus::Coincident => {
            diagnostics.coincident_pairs += 1;
            log::warn!(
                "Bodies {} and {} coincide, force taken as zero",
                link.source,
                link.target
            );
        }
        ForceStatus::Dangling => {
            diagnostics.dangling_links += 1;
            log::error!("Link {} -> {} outlived a body", link.source, link.target);
        }
    }
}
