use crate::star::Star;
use cgmath::{prelude::*, Vector3};
use std::fmt;

/// Stable handle to a body or star. Never reused once the body is gone.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) usize);
impl BodyId {
    pub fn index(self) -> usize {
        self.0
    }
}
impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum BodyKind {
    Matter,
    Star(Star),
}

#[derive(Debug, Clone)]
pub struct Body {
    pub(crate) mass: f64,
    pub(crate) radius: f64,
    pub(crate) pos: Vector3<f64>,
    pub(crate) vel: Vector3<f64>,
    pub(crate) accel: Vector3<f64>,
    pub(crate) net_force: Vector3<f64>,
    pub(crate) prev_pos: Vector3<f64>,
    pub(crate) history: Vec<Vector3<f64>>,
    pub(crate) kind: BodyKind,
}
impl Body {
    pub(crate) fn new(
        mass: f64,
        radius: f64,
        pos: Vector3<f64>,
        vel: Vector3<f64>,
        accel: Vector3<f64>,
        kind: BodyKind,
    ) -> Body {
        Body {
            mass,
            radius,
            pos,
            vel,
            accel,
            net_force: Vector3::zero(),
            prev_pos: pos,
            history: Vec::new(),
            kind,
        }
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    pub fn pos(&self) -> Vector3<f64> {
        self.pos
    }
    pub fn vel(&self) -> Vector3<f64> {
        self.vel
    }
    pub fn accel(&self) -> Vector3<f64> {
        self.accel
    }
    /// Sum of the link forces acting on this body, consumed by the next tick.
    pub fn net_force(&self) -> Vector3<f64> {
        self.net_force
    }
    /// Position at the start of the most recent tick.
    pub fn prev_pos(&self) -> Vector3<f64> {
        self.prev_pos
    }
    pub fn history(&self) -> &[Vector3<f64>] {
        &self.history
    }
    pub fn kind(&self) -> &BodyKind {
        &self.kind
    }
    pub fn star(&self) -> Option<&Star> {
        match &self.kind {
            BodyKind::Star(star) => Some(star),
            BodyKind::Matter => None,
        }
    }
    pub(crate) fn star_mut(&mut self) -> Option<&mut Star> {
        match &mut self.kind {
            BodyKind::Star(star) => Some(star),
            BodyKind::Matter => None,
        }
    }
    pub fn is_star(&self) -> bool {
        matches!(self.kind, BodyKind::Star(_))
    }
    pub fn momentum(&self) -> Vector3<f64> {
        self.vel * self.mass
    }

    /// One unit tick. Position moves with the old velocity and velocity with
    /// the old acceleration before the accumulated force is turned into the
    /// acceleration for the next tick.
    pub(crate) fn step(&mut self, record_history: bool) {
        self.prev_pos = self.pos;
        if record_history {
            self.history.push(self.pos);
        }
        self.pos += self.vel;
        self.vel += self.accel;
        self.accel = self.net_force / self.mass;
        self.net_force = Vector3::zero();
    }

    /// Distance from `point` to the segment this body swept during the last tick.
    pub(crate) fn swept_distance_to(&self, point: Vector3<f64>) -> f64 {
        let seg = self.pos - self.prev_pos;
        let len2 = seg.magnitude2();
        let t = if len2 > 0.0 {
            ((point - self.prev_pos).dot(seg) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (point - (self.prev_pos + seg * t)).magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matter(pos: [f64; 3], vel: [f64; 3]) -> Body {
        Body::new(2.0, 1.0, pos.into(), vel.into(), Vector3::zero(), BodyKind::Matter)
    }

    #[test]
    fn step_consumes_old_force() {
        let mut body = matter([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        body.net_force = Vector3::new(0.0, 4.0, 0.0);
        body.step(false);
        assert_eq!(body.pos, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(body.vel, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(body.accel, Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(body.net_force, Vector3::zero());

        body.step(true);
        assert_eq!(body.pos, Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(body.vel, Vector3::new(1.0, 2.0, 0.0));
        assert_eq!(body.accel, Vector3::zero());
        assert_eq!(body.prev_pos, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(body.history, vec![Vector3::new(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn swept_distance() {
        let mut body = matter([0.0, 0.0, 0.0], [10.0, 0.0, 0.0]);
        body.step(false);
        assert_eq!(body.swept_distance_to(Vector3::new(5.0, 3.0, 0.0)), 3.0);
        assert_eq!(body.swept_distance_to(Vector3::new(-4.0, 3.0, 0.0)), 5.0);
        assert_eq!(body.swept_distance_to(Vector3::new(13.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn stationary_body_sweeps_a_point() {
        let body = matter([1.0, 1.0, 1.0], [0.0, 0.0, 0.0]);
        assert_eq!(body.swept_distance_to(Vector3::new(1.0, 1.0, 3.0)), 2.0);
    }
}
