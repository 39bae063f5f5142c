use kurbo::Point;

use crate::num::CheapOrderedFloat;

/// An index identifying a disk.
///
/// Disk indices are only meaningful relative to the [`Disks`] they came
/// from: intersection records refer to disks by their position in the
/// center list that was handed to the intersection program.
#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DiskIdx(pub usize);

/// A vector indexed by [`DiskIdx`].
#[derive(Clone, PartialEq)]
pub struct DiskVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(DiskVec, DiskIdx, "d");

/// A collection of disks sharing one radius.
///
/// Disks are indexed by [`DiskIdx`] and their centers can be retrieved by
/// indexing (i.e. with square brackets).
#[derive(Clone, Debug, PartialEq)]
pub struct Disks {
    centers: DiskVec<Point>,
    radius: f64,
}

impl Disks {
    /// Creates a collection of disks with the given centers, all of radius `radius`.
    pub fn new(centers: impl IntoIterator<Item = impl Into<Point>>, radius: f64) -> Self {
        Disks {
            centers: DiskVec::from_vec(centers.into_iter().map(Into::into).collect()),
            radius,
        }
    }

    /// The number of disks.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Are there no disks at all?
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// The radius shared by all disks.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Iterates over all disk indices.
    pub fn indices(&self) -> impl Iterator<Item = DiskIdx> {
        self.centers.indices()
    }

    /// Iterates over all centers, in index order.
    pub fn centers(&self) -> impl Iterator<Item = Point> + '_ {
        self.centers.values().copied()
    }

    /// Returns the center of `idx`, or `None` if there's no such disk.
    pub fn get(&self, idx: DiskIdx) -> Option<Point> {
        self.centers.get(idx).copied()
    }

    /// Are the centers in non-decreasing x order?
    ///
    /// The external intersection program requires its input in this order.
    pub fn is_sorted_by_x(&self) -> bool {
        self.centers
            .values()
            .zip(self.centers.values().skip(1))
            .all(|(p, q)| p.x <= q.x)
    }

    /// Reorders the disks by increasing center x coordinate.
    ///
    /// Returns, for every disk in the new order, the index it had before
    /// sorting. The sort is stable.
    pub fn sort_by_x(&mut self) -> Vec<DiskIdx> {
        let mut order: Vec<_> = self.centers.indices().collect();
        order.sort_by_key(|&idx| CheapOrderedFloat::from(self.centers[idx].x));
        let sorted = order.iter().map(|&idx| self.centers[idx]).collect();
        self.centers = DiskVec::from_vec(sorted);
        order
    }

    /// The axis-aligned bounding box of the union of all disks.
    pub fn bounding_box(&self) -> kurbo::Rect {
        let r = self.radius;
        self.centers
            .values()
            .map(|c| kurbo::Rect::new(c.x - r, c.y - r, c.x + r, c.y + r))
            .reduce(|a, b| a.union(b))
            .unwrap_or(kurbo::Rect::ZERO)
    }
}

impl std::ops::Index<DiskIdx> for Disks {
    type Output = Point;

    fn index(&self, index: DiskIdx) -> &Point {
        &self.centers[index]
    }
}
