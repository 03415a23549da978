//! Perfectly inelastic merging of bodies that touch during a tick.

use crate::body::{Body, BodyId};
use crate::force::ForceLink;
use crate::star::HYDROGEN_WEIGHT;
use cgmath::Vector3;
use std::collections::BTreeSet;

/// Unordered pairs whose last motion brought them into contact, lowest ids first.
pub fn detect(bodies: &[Option<Body>]) -> Vec<(BodyId, BodyId)> {
    let live: Vec<(usize, &Body)> = bodies
        .iter()
        .enumerate()
        .filter_map(|(i, b)| b.as_ref().map(|b| (i, b)))
        .collect();
    let mut pairs = BTreeSet::new();
    for &(i, a) in &live {
        for &(j, b) in &live {
            if i == j {
                continue;
            }
            if a.swept_distance_to(b.pos) < a.radius + b.radius {
                pairs.insert((BodyId(i.min(j)), BodyId(i.max(j))));
            }
        }
    }
    pairs.into_iter().collect()
}

/// Mass and velocity of the body formed by merging `a` and `b`.
pub fn merged_state(a: &Body, b: &Body) -> (f64, Vector3<f64>) {
    let mass = a.mass + b.mass;
    let vel = (a.vel * a.mass + b.vel * b.mass) / mass;
    (mass, vel)
}

/// Which of two bodies survives a merge: the heavier one, or the older on a tie.
pub fn survivor(a: (BodyId, &Body), b: (BodyId, &Body)) -> BodyId {
    match a.1.mass.partial_cmp(&b.1.mass) {
        Some(std::cmp::Ordering::Less) => b.0,
        Some(std::cmp::Ordering::Greater) => a.0,
        _ => a.0.min(b.0),
    }
}

/// Folds `absorbed` into `survivor`. Position stays with the survivor and
/// the radius grows to hold both volumes. A surviving star takes the extra
/// mass on as shell hydrogen.
///
/// The pending acceleration is merged like the velocity, so the pull the two
/// bodies had on each other cancels on the next step.
pub(crate) fn absorb(survivor: &mut Body, absorbed: &Body) {
    let (mass, vel) = merged_state(survivor, absorbed);
    survivor.accel = (survivor.accel * survivor.mass + absorbed.accel * absorbed.mass) / mass;
    survivor.vel = vel;
    survivor.mass = mass;
    survivor.radius = (survivor.radius.powi(3) + absorbed.radius.powi(3)).cbrt();
    if let Some(star) = survivor.star_mut() {
        star.composition.shell_hydrogen += absorbed.mass / HYDROGEN_WEIGHT;
    }
}

/// Rebases what each link put into the pending accelerations of `keep` and
/// `gone` onto the merged body, weighted like [`absorb`] weights `accel`.
pub(crate) fn merge_applied(
    links: &mut [ForceLink],
    keep: BodyId,
    gone: BodyId,
    (keep_mass, gone_mass): (f64, f64),
) {
    let total = keep_mass + gone_mass;
    let inherited: Vec<(BodyId, Vector3<f64>)> = links
        .iter()
        .filter(|link| link.target == gone && link.source != keep)
        .map(|link| (link.source, link.applied * gone_mass / total))
        .collect();
    for link in links.iter_mut().filter(|link| link.target == keep) {
        link.applied = link.applied * keep_mass / total;
        if let Some((_, extra)) = inherited.iter().find(|(source, _)| *source == link.source) {
            link.applied += *extra;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::BodyKind;
    use crate::star::Star;
    use cgmath::prelude::*;

    fn body(mass: f64, radius: f64, pos: [f64; 3], vel: [f64; 3]) -> Body {
        Body::new(
            mass,
            radius,
            pos.into(),
            vel.into(),
            Vector3::zero(),
            BodyKind::Matter,
        )
    }

    #[test]
    fn merge_conserves_mass_and_momentum() {
        let a = body(3.0, 1.0, [0.0; 3], [1.0, 2.0, 0.0]);
        let b = body(5.0, 1.0, [0.0; 3], [-1.0, 0.5, 4.0]);
        let (mass, vel) = merged_state(&a, &b);
        assert_eq!(mass, 8.0);
        assert_eq!(vel, (a.vel * a.mass + b.vel * b.mass) / (a.mass + b.mass));
        assert_eq!(merged_state(&b, &a), (mass, vel));
    }

    #[test]
    fn heavier_survives() {
        let light = body(1.0, 1.0, [0.0; 3], [0.0; 3]);
        let heavy = body(2.0, 1.0, [0.0; 3], [0.0; 3]);
        assert_eq!(survivor((BodyId(0), &light), (BodyId(1), &heavy)), BodyId(1));
        assert_eq!(survivor((BodyId(1), &heavy), (BodyId(0), &light)), BodyId(1));
        assert_eq!(survivor((BodyId(4), &light), (BodyId(2), &light)), BodyId(2));
    }

    #[test]
    fn detects_contact_along_the_swept_path() {
        let mut fast = body(1.0, 1.0, [-10.0, 0.0, 0.0], [20.0, 0.0, 0.0]);
        fast.step(false);
        let bodies = vec![
            Some(fast),
            Some(body(1.0, 1.0, [0.0, 1.5, 0.0], [0.0; 3])),
            Some(body(1.0, 1.0, [0.0, 50.0, 0.0], [0.0; 3])),
            None,
        ];
        assert_eq!(detect(&bodies), vec![(BodyId(0), BodyId(1))]);
    }

    #[test]
    fn pending_acceleration_merges_by_mass() {
        let mut a = body(3.0, 1.0, [0.0; 3], [0.0; 3]);
        let mut b = body(1.0, 1.0, [0.0; 3], [0.0; 3]);
        a.accel = Vector3::new(2.0, 1.0, 0.0);
        b.accel = Vector3::new(-6.0, 1.0, 0.0);
        absorb(&mut a, &b);
        assert_eq!(a.accel, Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn link_shares_follow_the_merge() {
        let (keep, gone, other) = (BodyId(0), BodyId(1), BodyId(2));
        let mut links = vec![
            ForceLink::new(other, keep),
            ForceLink::new(other, gone),
            ForceLink::new(keep, other),
        ];
        links[0].applied = Vector3::new(4.0, 0.0, 0.0);
        links[1].applied = Vector3::new(8.0, 0.0, 0.0);
        links[2].applied = Vector3::new(1.0, 0.0, 0.0);
        merge_applied(&mut links, keep, gone, (3.0, 1.0));
        assert_eq!(links[0].applied, Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(links[2].applied, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn star_absorbs_matter_into_its_shell() {
        let mut star = Body::new(
            100.0,
            2.0,
            Vector3::zero(),
            Vector3::zero(),
            Vector3::zero(),
            BodyKind::Star(Star::new(100.0, 2.0, 1.0)),
        );
        let rock = body(10.0, 2.0, [1.0, 0.0, 0.0], [11.0, 0.0, 0.0]);
        absorb(&mut star, &rock);
        assert_eq!(star.mass(), 110.0);
        assert_eq!(star.vel(), Vector3::new(1.0, 0.0, 0.0));
        assert!((star.radius() - 16f64.cbrt()).abs() < 1e-12);
        let composition = star.star().unwrap().composition();
        assert!((composition.mass() - 110.0).abs() < 1e-9);
        assert!(star.vel().magnitude() > 0.0);
    }
}
