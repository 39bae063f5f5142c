//! Trig-free ordering of directions around a disk center.
//!
//! The trace engine only ever needs to compare directions, never to measure
//! them, so instead of `atan2` it uses a [`PseudoAngle`]: a quadrant number
//! together with a "diamond angle" key that is monotone in the true angle
//! within the quadrant. Comparing two pseudo-angles lexicographically gives
//! the same answer as comparing the corresponding `atan2` values on
//! `(-π, π]`.

use kurbo::Vec2;

use crate::num::CheapOrderedFloat;

/// A surrogate for the polar angle of a direction vector.
///
/// The quadrants, in increasing order, cover the angle ranges
/// `(-π, -π/2]`, `(-π/2, 0)`, `[0, π/2)` and `[π/2, π]`. The zero vector
/// gets the pseudo-angle of the positive x axis, agreeing with
/// `atan2(0, 0) == 0`. Negative zero is treated like positive zero.
///
/// After [`PseudoAngle::shifted`] the quadrant can go up to 7; shifted
/// pseudo-angles are only meaningful when compared against other angles
/// shifted relative to the same reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PseudoAngle {
    quadrant: u8,
    key: CheapOrderedFloat,
}

impl PseudoAngle {
    /// The pseudo-angle of the direction `(dx, dy)`.
    ///
    /// Note that (like `atan2`) the `y` component comes first.
    pub fn new(dy: f64, dx: f64) -> Self {
        if dx == 0.0 && dy == 0.0 {
            return PseudoAngle::from_parts(2, 0.0);
        }

        let l1 = dx.abs() + dy.abs();
        if dy < 0.0 {
            if dx <= 0.0 {
                PseudoAngle::from_parts(0, dx / l1)
            } else {
                PseudoAngle::from_parts(1, dy / l1)
            }
        } else if dx > 0.0 {
            PseudoAngle::from_parts(2, dy / l1)
        } else {
            PseudoAngle::from_parts(3, -dx / l1)
        }
    }

    /// The pseudo-angle of the direction `v`.
    pub fn of(v: Vec2) -> Self {
        PseudoAngle::new(v.y, v.x)
    }

    fn from_parts(quadrant: u8, key: f64) -> Self {
        PseudoAngle {
            quadrant,
            key: key.into(),
        }
    }

    /// Which quadrant (`0..4`, or `4..8` once shifted) this angle lies in.
    pub fn quadrant(&self) -> u8 {
        self.quadrant
    }

    /// The within-quadrant ordering key, in `[-1, 1]`.
    pub fn key(&self) -> f64 {
        self.key.into_inner()
    }

    /// Re-expresses this angle relative to `reference`.
    ///
    /// Angles strictly smaller than `reference` are pushed one full turn
    /// up, so that they compare greater than every angle at or after
    /// `reference`. Minimizing `candidate.shifted(reference)` therefore
    /// finds the first candidate reached when turning counterclockwise from
    /// `reference`, wrapping past `π` if necessary.
    pub fn shifted(self, reference: PseudoAngle) -> Self {
        if self < reference {
            PseudoAngle {
                quadrant: self.quadrant + 4,
                key: self.key,
            }
        } else {
            self
        }
    }
}

/// Computes the pseudo-angle of the direction `(dx, dy)`.
pub fn pseudo_angle(dy: f64, dx: f64) -> PseudoAngle {
    PseudoAngle::new(dy, dx)
}

/// Returns `v` re-expressed relative to `u`; see [`PseudoAngle::shifted`].
pub fn shift(u: PseudoAngle, v: PseudoAngle) -> PseudoAngle {
    v.shifted(u)
}

/// Finds the position of the candidate that comes first when turning
/// counterclockwise from `reference`.
///
/// If several candidates are tied, the first one wins. Returns `None` if
/// there are no candidates.
pub fn next_after(
    reference: PseudoAngle,
    candidates: impl IntoIterator<Item = PseudoAngle>,
) -> Option<usize> {
    candidates
        .into_iter()
        .enumerate()
        .min_by_key(|(_, angle)| angle.shifted(reference))
        .map(|(idx, _)| idx)
}
