use crate::body::{Body, BodyId};
use cgmath::{prelude::*, Vector3};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhotometerId(pub(crate) usize);
impl PhotometerId {
    pub fn index(self) -> usize {
        self.0
    }
}
impl fmt::Display for PhotometerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stationary detector counting photon passages, one slot per tick.
#[derive(Debug, Clone)]
pub struct Photometer {
    pub(crate) pos: Vector3<f64>,
    pub(crate) radius: f64,
    pub(crate) recorded: Vec<u32>,
}
impl Photometer {
    pub(crate) fn new(radius: f64, pos: Vector3<f64>) -> Self {
        Self {
            pos,
            radius,
            recorded: Vec::new(),
        }
    }
    pub fn pos(&self) -> Vector3<f64> {
        self.pos
    }
    pub fn radius(&self) -> f64 {
        self.radius
    }
    /// Light curve so far, one entry per elapsed tick.
    pub fn recorded(&self) -> &[u32] {
        &self.recorded
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Photon {
    pos: Vector3<f64>,
    dir: Vector3<f64>,
    age: u32,
}

/// What happened to a photon during one tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Trace {
    pub photometer_hits: Vec<usize>,
    pub deflected_by: Option<usize>,
    pub degenerate: bool,
}

impl Photon {
    pub fn new(pos: Vector3<f64>, dir: Vector3<f64>) -> Self {
        Self { pos, dir, age: 0 }
    }
    pub fn pos(&self) -> Vector3<f64> {
        self.pos
    }
    /// Unit direction of travel.
    pub fn dir(&self) -> Vector3<f64> {
        self.dir
    }
    /// Ticks this photon has been propagated.
    pub fn age(&self) -> u32 {
        self.age
    }

    /// Moves the photon one tick along `dir * speed`. The first opaque body
    /// the segment enters stops it at the surface and turns it to face away
    /// from that body's centre. Photometers are transparent and count the
    /// photon if the travelled part of the segment touches them.
    pub(crate) fn propagate(
        &mut self,
        emitter: BodyId,
        bodies: &[Option<Body>],
        photometers: &[Photometer],
        speed: f64,
    ) -> Trace {
        self.age += 1;
        let mut trace = Trace::default();
        let sweep = self.dir * speed;
        if !(sweep.magnitude2() > 0.0) {
            trace.degenerate = true;
            return trace;
        }

        let mut reach = 1.0;
        let mut blocker = None;
        for (index, body) in bodies.iter().enumerate() {
            let Some(body) = body else { continue };
            if index == emitter.0 {
                continue;
            }
            if let Some(t) = entry_time(self.pos, sweep, body.pos, body.radius) {
                if t <= reach {
                    reach = t;
                    blocker = Some((index, body.pos));
                }
            }
        }

        for (index, photometer) in photometers.iter().enumerate() {
            let touched = segment_sphere(self.pos, sweep, photometer.pos, photometer.radius)
                .map_or(false, |(near, far)| {
                    (0.0..=reach).contains(&near) || (0.0..=reach).contains(&far)
                });
            if touched {
                trace.photometer_hits.push(index);
            }
        }

        match blocker {
            Some((index, center)) => {
                self.pos += sweep * reach;
                let outward = self.pos - center;
                if outward.magnitude2() > 0.0 {
                    self.dir = outward.normalize();
                }
                trace.deflected_by = Some(index);
            }
            None => self.pos += sweep,
        }
        trace
    }
}

/// Parameters `t` (ascending) where `origin + t * sweep` lies on the sphere.
/// A tangent yields the same root twice.
pub fn segment_sphere(
    origin: Vector3<f64>,
    sweep: Vector3<f64>,
    center: Vector3<f64>,
    radius: f64,
) -> Option<(f64, f64)> {
    let l = origin - center;
    let a = sweep.dot(sweep);
    if a == 0.0 {
        return None;
    }
    let b = 2.0 * sweep.dot(l);
    let c = l.dot(l) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        None
    } else if discriminant == 0.0 {
        let t = -b / (2.0 * a);
        Some((t, t))
    } else {
        let root = discriminant.sqrt();
        Some(((-b - root) / (2.0 * a), (-b + root) / (2.0 * a)))
    }
}

/// Where the segment first meets the sphere's surface within `[0, 1]`: the
/// entry point, or the exit point for a segment starting inside. A photon
/// resting on the surface and heading out is not caught again.
fn entry_time(
    origin: Vector3<f64>,
    sweep: Vector3<f64>,
    center: Vector3<f64>,
    radius: f64,
) -> Option<f64> {
    let (near, far) = segment_sphere(origin, sweep, center, radius)?;
    if (0.0..=1.0).contains(&near) {
        Some(near)
    } else if near < 0.0 && far <= 1.0 && far * sweep.magnitude() > radius * 1e-9 {
        Some(far)
    } else {
        None
    }
}
