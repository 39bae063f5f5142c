//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;
use kurbo::Point;

use crate::Disks;

/// Generate an arbitrary float in some range.
pub fn float_in_range(
    start: f64,
    end: f64,
    u: &mut Unstructured<'_>,
) -> Result<f64, arbitrary::Error> {
    let num: u32 = u.arbitrary()?;
    let t = num as f64 / u32::MAX as f64;
    Ok((1.0 - t) * start + t * end)
}

/// Generate an arbitrary direction vector, with a bias towards the axes
/// and the diagonals.
pub fn direction(u: &mut Unstructured<'_>) -> Result<(f64, f64), arbitrary::Error> {
    let special: bool = u.arbitrary()?;
    if special {
        let x = *u.choose(&[-1.0, -0.0, 0.0, 1.0])?;
        let y = *u.choose(&[-1.0, -0.0, 0.0, 1.0])?;
        let scale = float_in_range(1e-3, 1e3, u)?;
        Ok((x * scale, y * scale))
    } else {
        Ok((float_in_range(-1e3, 1e3, u)?, float_in_range(-1e3, 1e3, u)?))
    }
}

/// Generate a cluster of unit-ish disks.
///
/// The disks sit on a jittered square lattice whose spacing lets
/// horizontal and vertical neighbors overlap while keeping diagonal
/// neighbors apart. Every intersection point stays well away from every
/// third circle, so the boundary is unambiguous even with rounding.
/// Depending on which lattice sites are occupied, the union can have
/// several components, holes, and isolated disks.
pub fn disk_cluster(u: &mut Unstructured<'_>) -> Result<Disks, arbitrary::Error> {
    const SPACING: f64 = 0.8;
    const JITTER: f64 = 0.03;
    const RADIUS: f64 = 0.5;

    let side: usize = u.int_in_range(1..=5)?;
    let mut centers = Vec::new();
    for i in 0..side {
        for j in 0..side {
            if u.arbitrary()? {
                let x = i as f64 * SPACING + float_in_range(-JITTER, JITTER, u)?;
                let y = j as f64 * SPACING + float_in_range(-JITTER, JITTER, u)?;
                centers.push(Point::new(x, y));
            }
        }
    }

    // The lattice order is also x-sorted; shuffle a bit so that the trace
    // doesn't always start from the leftmost disk.
    if centers.len() > 1 {
        let rotate = u.choose_index(centers.len())?;
        centers.rotate_left(rotate);
    }

    let scale = float_in_range(0.1, 100.0, u)?;
    let offset = Point::new(float_in_range(-1e3, 1e3, u)?, float_in_range(-1e3, 1e3, u)?);
    Ok(Disks::new(
        centers.into_iter().map(|c| offset + c.to_vec2() * scale),
        RADIUS * scale,
    ))
}

/// Checks that can be run either by `arbtest` or by a fuzzer.
pub mod arbtests {
    use arbitrary::Unstructured;

    use crate::{
        angle::pseudo_angle,
        generators::{boundary_records, to_wire},
        trace, union_boundary, Records,
    };

    /// Pseudo-angles order well-separated directions the same way as `atan2`.
    pub fn pseudo_angle_order(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
        let (ax, ay) = super::direction(u)?;
        let (bx, by) = super::direction(u)?;
        if (ax == 0.0 && ay == 0.0) || (bx == 0.0 && by == 0.0) {
            return Ok(());
        }
        // Normalize the signs of zeros, because atan2 distinguishes them.
        let (ax, ay, bx, by) = (ax + 0.0, ay + 0.0, bx + 0.0, by + 0.0);

        let ta = ay.atan2(ax);
        let tb = by.atan2(bx);
        let pa = pseudo_angle(ay, ax);
        let pb = pseudo_angle(by, bx);
        if (ta - tb).abs() > 1e-9 {
            assert_eq!(pa < pb, ta < tb, "({ax}, {ay}) vs ({bx}, {by})");
        }
        Ok(())
    }

    /// Tracing a generated cluster consumes every record and closes every loop.
    pub fn trace_conserves_edges(u: &mut Unstructured<'_>) -> Result<(), arbitrary::Error> {
        let disks = super::disk_cluster(u)?;
        let records = boundary_records(&disks);

        let bucketed = Records::from_records(&disks, records.iter().copied()).unwrap();
        let edges = bucketed.total_edges();
        let isolated = bucketed.isolated().len();
        let boundary = trace(&disks, bucketed).unwrap();

        assert_eq!(boundary.total_edges(), edges);
        assert_eq!(boundary.isolated().len(), isolated);
        for lp in boundary.loops() {
            assert!(lp.is_closed(0.0));
            for (a, b) in lp.arcs().iter().zip(&lp.arcs()[1..]) {
                assert_eq!(a.to, b.from);
            }
        }

        let r = disks.radius();
        let max_area = disks.len() as f64 * std::f64::consts::PI * r * r;
        assert!(boundary.area() > 0.0 || disks.is_empty());
        assert!(boundary.area() <= max_area * (1.0 + 1e-9));

        // Going through the wire format changes nothing.
        let reparsed = union_boundary(disks.centers(), r, &to_wire(&records)).unwrap();
        assert_eq!(reparsed, boundary);
        Ok(())
    }
}
