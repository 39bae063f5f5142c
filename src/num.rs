//! Ordering for floats.

use std::hash::Hash;

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one doesn't guard against NaNs on construction; it just treats them as
/// equal to everything. Every value we wrap comes from a pseudo-angle key,
/// which is finite by construction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl Hash for CheapOrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        // Equal values must hash equally, so fold -0.0 into 0.0.
        (self.0 + 0.0).to_bits().hash(state)
    }
}

impl CheapOrderedFloat {
    /// Retrieve the inner `f64`.
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}

#[cfg(test)]
mod tests {
    use super::CheapOrderedFloat;

    #[test]
    fn zeros_are_equal() {
        assert_eq!(
            CheapOrderedFloat::from(0.0).cmp(&CheapOrderedFloat::from(-0.0)),
            std::cmp::Ordering::Equal
        );
    }

    #[test]
    fn sorts_like_f64() {
        let mut xs: Vec<_> = [3.0, -1.0, 0.5, -7.25]
            .into_iter()
            .map(CheapOrderedFloat::from)
            .collect();
        xs.sort();
        let xs: Vec<_> = xs.into_iter().map(CheapOrderedFloat::into_inner).collect();
        assert_eq!(xs, vec![-7.25, -1.0, 0.5, 3.0]);
    }
}
