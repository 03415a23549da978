use crate::body::{Body, BodyId};
use crate::config::PhysicalConstants;
use cgmath::{prelude::*, Vector3};

/// Directed gravitational pull of `source` on `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceLink {
    pub(crate) source: BodyId,
    pub(crate) target: BodyId,
    pub(crate) components: Vector3<f64>,
    pub(crate) low_confidence: bool,
    /// Share of the target's current `accel` that came from this link.
    pub(crate) applied: Vector3<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ForceStatus {
    Nominal,
    /// Closer than the sum of the radii; point-mass gravity is unreliable.
    NearContact,
    /// Zero separation. The force is taken as zero.
    Coincident,
    /// An endpoint no longer exists. The force is taken as zero.
    Dangling,
}

impl ForceLink {
    pub(crate) fn new(source: BodyId, target: BodyId) -> Self {
        Self {
            source,
            target,
            components: Vector3::zero(),
            low_confidence: false,
            applied: Vector3::zero(),
        }
    }
    pub fn source(&self) -> BodyId {
        self.source
    }
    pub fn target(&self) -> BodyId {
        self.target
    }
    /// Force applied to the target.
    pub fn components(&self) -> Vector3<f64> {
        self.components
    }
    pub fn low_confidence(&self) -> bool {
        self.low_confidence
    }
    pub fn touches(&self, id: BodyId) -> bool {
        self.source == id || self.target == id
    }

    pub(crate) fn update(
        &mut self,
        bodies: &[Option<Body>],
        constants: &PhysicalConstants,
    ) -> ForceStatus {
        let endpoints = (
            bodies.get(self.source.0).and_then(Option::as_ref),
            bodies.get(self.target.0).and_then(Option::as_ref),
        );
        let (Some(source), Some(target)) = endpoints else {
            self.components = Vector3::zero();
            self.low_confidence = true;
            return ForceStatus::Dangling;
        };
        let (components, status) = gravity(constants.gravitational_constant, source, target);
        self.components = components;
        self.low_confidence = status != ForceStatus::Nominal;
        status
    }
}

/// Newtonian pull of `source` on `target`, pointing from target to source.
pub fn gravity(g: f64, source: &Body, target: &Body) -> (Vector3<f64>, ForceStatus) {
    let rel_pos = source.pos - target.pos;
    let distance2 = rel_pos.magnitude2();
    let magnitude = g * (source.mass * target.mass) / distance2;
    if distance2 == 0.0 || !magnitude.is_finite() {
        return (Vector3::zero(), ForceStatus::Coincident);
    }
    let distance = distance2.sqrt();
    let status = if distance < source.radius + target.radius {
        ForceStatus::NearContact
    } else {
        ForceStatus::Nominal
    };
    (rel_pos / distance * magnitude, status)
}
