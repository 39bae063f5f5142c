//! Utilities for generating examples and test cases.
//!
//! Besides a few disk layouts, this module has a brute-force stand-in for
//! the external intersection program: [`boundary_records`] produces the
//! same records (up to floating-point noise) in quadratic time.

use std::f64::consts::TAU;

use kurbo::{Point, Vec2};

use crate::{Disks, IntersectionRecord};

/// Computes the intersection records for a collection of disks.
///
/// For every ordered pair `(a, b)` of overlapping disks, the intersection
/// point to the left of the segment from `a` to `b` is reported (anchored
/// at `b`) unless it is strictly inside some third disk. Every disk that
/// overlaps no other disk gets an isolated record carrying its center.
/// Disks with coincident centers don't count as overlapping.
///
/// The records are sorted by the x coordinate of their points.
pub fn boundary_records(disks: &Disks) -> Vec<IntersectionRecord> {
    let r = disks.radius();
    let mut ret = Vec::new();
    let mut has_neighbor = vec![false; disks.len()];

    for a in disks.indices() {
        for b in disks.indices() {
            if a == b {
                continue;
            }
            let Some(p) = left_intersection(disks[a], disks[b], r) else {
                continue;
            };
            has_neighbor[a.0] = true;

            let covered = disks
                .indices()
                .filter(|&k| k != a && k != b)
                .any(|k| (p - disks[k]).hypot() < r);
            if !covered {
                ret.push(IntersectionRecord {
                    anchor: b,
                    source: a,
                    point: p,
                });
            }
        }
    }

    for idx in disks.indices() {
        if !has_neighbor[idx.0] {
            ret.push(IntersectionRecord {
                anchor: idx,
                source: idx,
                point: disks[idx],
            });
        }
    }

    ret.sort_by(|p, q| p.point.x.total_cmp(&q.point.x));
    ret
}

/// The intersection of the circles around `a` and `b` that lies to the left
/// of the segment from `a` to `b`, if the disks properly overlap.
fn left_intersection(a: Point, b: Point, r: f64) -> Option<Point> {
    let ab = b - a;
    let d = ab.hypot();
    if d == 0.0 || d >= 2.0 * r {
        return None;
    }
    let h = (r * r - d * d / 4.0).sqrt();
    let left = Vec2::new(-ab.y, ab.x) / d;
    Some(a.midpoint(b) + left * h)
}

/// Writes records in the wire format, one per line.
pub fn to_wire(records: &[IntersectionRecord]) -> String {
    let mut ret = String::new();
    for rec in records {
        ret.push_str(&rec.to_string());
        ret.push('\n');
    }
    ret
}

/// Three disks centered at `(0, 0)`, `(1, 0)` and `(0.5, 0.8)`.
///
/// With radius 0.6 the middle is covered and the boundary is a single
/// loop. With radius 0.52 the disks still overlap pairwise but leave a
/// small hole in the middle. With radius 0.5 the bottom two disks only
/// touch.
pub fn triangle(radius: f64) -> Disks {
    Disks::new([(0.0, 0.0), (1.0, 0.0), (0.5, 0.8)], radius)
}

/// `n` disks in a horizontal row, `spacing` apart.
pub fn chain(n: usize, spacing: f64, radius: f64) -> Disks {
    Disks::new((0..n).map(|i| (i as f64 * spacing, 0.0)), radius)
}

/// `n` disks evenly spaced around a circle of radius `ring_radius` centered at the origin.
///
/// If neighboring disks overlap but the ring is wide enough, the union has
/// a hole in the middle.
pub fn ring(n: usize, ring_radius: f64, radius: f64) -> Disks {
    Disks::new(
        (0..n).map(|i| {
            let theta = TAU * i as f64 / n as f64;
            Point::new(ring_radius * theta.cos(), ring_radius * theta.sin())
        }),
        radius,
    )
}

/// An `n` by `n` grid of disks, `spacing` apart.
///
/// If `spacing` is less than twice the radius but more than `√2` times it,
/// every square of four disks leaves a hole.
pub fn grid(n: usize, spacing: f64, radius: f64) -> Disks {
    Disks::new(
        (0..n).flat_map(|i| (0..n).map(move |j| (i as f64 * spacing, j as f64 * spacing))),
        radius,
    )
}

/// A copy of `disks`, moved by `offset`.
pub fn translated(disks: &Disks, offset: impl Into<Vec2>) -> Disks {
    let offset = offset.into();
    Disks::new(disks.centers().map(|c| c + offset), disks.radius())
}

/// The records of `disks`, in the wire format.
pub fn wire_records(disks: &Disks) -> String {
    to_wire(&boundary_records(disks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiskIdx;

    #[test]
    fn two_disks() {
        let disks = Disks::new([(0.0, 0.0), (0.6, 0.0)], 0.5);
        let records = boundary_records(&disks);
        assert_eq!(records.len(), 2);

        let up = records.iter().find(|r| r.source == DiskIdx(0)).unwrap();
        assert_eq!(up.anchor, DiskIdx(1));
        assert!((up.point - Point::new(0.3, 0.4)).hypot() < 1e-12);

        let down = records.iter().find(|r| r.source == DiskIdx(1)).unwrap();
        assert!((down.point - Point::new(0.3, -0.4)).hypot() < 1e-12);
    }

    #[test]
    fn tangent_disks_are_isolated() {
        let disks = chain(2, 1.0, 0.5);
        let records = boundary_records(&disks);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(IntersectionRecord::is_isolated));
    }

    #[test]
    fn covered_points_are_dropped() {
        assert_eq!(boundary_records(&triangle(0.6)).len(), 3);
        assert_eq!(boundary_records(&triangle(0.52)).len(), 6);
        assert_eq!(boundary_records(&triangle(0.5)).len(), 4);
    }

    #[test]
    fn sorted_by_x() {
        let records = boundary_records(&grid(3, 0.9, 0.5));
        assert!(records.windows(2).all(|w| w[0].point.x <= w[1].point.x));
    }

    #[test]
    fn wire_format() {
        let disks = Disks::new([(2.0, 3.0)], 0.5);
        assert_eq!(wire_records(&disks), "0 0 2 3\n");
    }
}
