use crate::config::PhysicalConstants;
use crate::photon::Photon;
use cgmath::Vector3;

/// Mass of one mole of hydrogen-1.
pub const HYDROGEN_WEIGHT: f64 = 1.007825;
/// Mass of one mole of helium-4.
pub const HELIUM_WEIGHT: f64 = 4.002602;
/// Mass lost per mole of helium fused from four moles of hydrogen.
pub const MASS_DEFECT: f64 = 4.0 * HYDROGEN_WEIGHT - HELIUM_WEIGHT;
const CORE_MASS_FRACTION: f64 = 0.1;
const CORE_RADIUS_FRACTION: f64 = 0.25;
const CORE_CONTRACTION: f64 = 0.01;
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Mole counts of the two burning shells.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Composition {
    pub core_hydrogen: f64,
    pub core_helium: f64,
    pub shell_hydrogen: f64,
    pub shell_helium: f64,
}
impl Composition {
    /// A fresh star of pure hydrogen with a tenth of its mass in the core.
    pub fn primordial(mass: f64) -> Self {
        Self {
            core_hydrogen: CORE_MASS_FRACTION * mass / HYDROGEN_WEIGHT,
            core_helium: 0.0,
            shell_hydrogen: (1.0 - CORE_MASS_FRACTION) * mass / HYDROGEN_WEIGHT,
            shell_helium: 0.0,
        }
    }
    pub fn mass(&self) -> f64 {
        (self.core_hydrogen + self.shell_hydrogen) * HYDROGEN_WEIGHT
            + (self.core_helium + self.shell_helium) * HELIUM_WEIGHT
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FusionPhase {
    /// Burning core hydrogen.
    Core,
    /// Core is spent; burning shell hydrogen while the core contracts.
    Shell,
    /// No hydrogen left anywhere.
    Exhausted,
    /// Zero luminosity, nothing burns.
    Idle,
}

#[derive(Debug, Clone)]
pub struct Star {
    pub(crate) luminosity: f64,
    pub(crate) composition: Composition,
    pub(crate) core_radius: f64,
    pub(crate) photons: Vec<Photon>,
    pub(crate) batch_capped: bool,
}
impl Star {
    pub(crate) fn new(mass: f64, radius: f64, luminosity: f64) -> Self {
        Self {
            luminosity,
            composition: Composition::primordial(mass),
            core_radius: CORE_RADIUS_FRACTION * radius,
            photons: Vec::new(),
            batch_capped: false,
        }
    }
    pub fn luminosity(&self) -> f64 {
        self.luminosity
    }
    pub fn composition(&self) -> &Composition {
        &self.composition
    }
    pub fn core_radius(&self) -> f64 {
        self.core_radius
    }
    pub fn photons(&self) -> &[Photon] {
        &self.photons
    }

    /// Burns one step of hydrogen into helium and returns the new total mass,
    /// or `None` when nothing burned.
    pub(crate) fn fuse(&mut self, constants: &PhysicalConstants) -> (FusionPhase, Option<f64>) {
        let helium_rate =
            self.luminosity / constants.speed_of_light.powi(2) / MASS_DEFECT;
        if helium_rate <= 0.0 {
            return (FusionPhase::Idle, None);
        }
        let c = &mut self.composition;
        let phase = if c.core_hydrogen > 0.0 {
            let burnt = (4.0 * helium_rate).min(c.core_hydrogen);
            c.core_hydrogen -= burnt;
            c.core_helium += burnt / 4.0;
            FusionPhase::Core
        } else if c.shell_hydrogen > 0.0 {
            let burnt = (4.0 * helium_rate).min(c.shell_hydrogen);
            c.shell_hydrogen -= burnt;
            c.shell_helium += burnt / 4.0;
            self.core_radius -= self.core_radius * CORE_CONTRACTION;
            FusionPhase::Shell
        } else {
            return (FusionPhase::Exhausted, None);
        };
        (phase, Some(self.composition.mass()))
    }

    /// Photons emitted per tick after sampling, before the batch cap.
    pub fn batch_size(&self, constants: &PhysicalConstants) -> f64 {
        (constants.light_fraction * self.luminosity / constants.planck_constant).round()
    }

    /// Appends a fresh batch of photons leaving `origin`, spread over the
    /// sphere along a golden-angle spiral.
    pub(crate) fn emit(&mut self, origin: Vector3<f64>, constants: &PhysicalConstants, cap: usize) {
        let wanted = self.batch_size(constants);
        let count = if wanted > cap as f64 {
            if !self.batch_capped {
                log::warn!(
                    "Star wants {} photons per tick, capping at {}",
                    wanted,
                    cap
                );
                self.batch_capped = true;
            }
            cap
        } else {
            wanted as usize
        };
        self.photons.reserve(count);
        self.photons
            .extend((0..count).map(|i| Photon::new(origin, spiral_point(i, count))));
    }
}

/// The `i`th of `n` roughly evenly spaced unit vectors, starting at +y.
pub fn spiral_point(i: usize, n: usize) -> Vector3<f64> {
    let y = if n > 1 {
        1.0 - 2.0 * i as f64 / (n - 1) as f64
    } else {
        1.0
    };
    let ring = (1.0 - y * y).max(0.0).sqrt();
    let theta = GOLDEN_ANGLE * i as f64;
    Vector3::new(theta.cos() * ring, y, theta.sin() * ring)
}
