//! The traced boundary of a union of disks, and ways of consuming it.

use std::f64::consts::{PI, TAU};

use kurbo::{BezPath, Circle, Point, Shape as _, Vec2};

use crate::DiskIdx;

/// A counterclockwise circular arc on the boundary of one disk.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BoundaryArc {
    /// The disk whose circle this arc lies on.
    pub disk: DiskIdx,
    /// The center of that disk.
    pub center: Point,
    /// Where the arc starts.
    pub from: Point,
    /// Where the arc ends.
    pub to: Point,
}

impl BoundaryArc {
    /// The polar angle of the starting point, as seen from the center.
    pub fn start_angle(&self) -> f64 {
        (self.from - self.center).atan2()
    }

    /// The polar angle of the ending point, as seen from the center.
    pub fn end_angle(&self) -> f64 {
        (self.to - self.center).atan2()
    }

    /// How far the arc turns, in `[0, 2π)`.
    ///
    /// Arcs always turn counterclockwise (in the direction of increasing
    /// `atan2`), so this can exceed `π`.
    pub fn sweep_angle(&self) -> f64 {
        (self.end_angle() - self.start_angle()).rem_euclid(TAU)
    }

    /// The signed area enclosed between this arc and the origin.
    ///
    /// This is the triangle (origin, from, to) plus the circular segment
    /// between the chord and the arc.
    fn signed_area(&self, radius: f64) -> f64 {
        let theta = self.sweep_angle();
        let chord = self.from.to_vec2().cross(self.to.to_vec2()) / 2.0;
        chord + radius * radius / 2.0 * (theta - theta.sin())
    }

    fn to_kurbo(self, radius: f64) -> kurbo::Arc {
        kurbo::Arc {
            center: self.center,
            radii: Vec2::new(radius, radius),
            start_angle: self.start_angle(),
            sweep_angle: self.sweep_angle(),
            x_rotation: 0.0,
        }
    }
}

/// One closed curve of the boundary.
///
/// The curve starts at [`BoundaryLoop::origin`] and follows its arcs in
/// order; each arc starts where the previous one ended, and the last arc
/// ends back at the origin.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BoundaryLoop {
    pub(crate) start_disk: DiskIdx,
    pub(crate) origin: Point,
    pub(crate) radius: f64,
    pub(crate) arcs: Vec<BoundaryArc>,
}

impl BoundaryLoop {
    /// The disk whose bucket this loop was started from.
    pub fn start_disk(&self) -> DiskIdx {
        self.start_disk
    }

    /// The first vertex of this loop.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The arcs making up this loop, in walking order.
    pub fn arcs(&self) -> &[BoundaryArc] {
        &self.arcs
    }

    /// The number of arcs, which is also the number of intersection records this loop consumed.
    pub fn edge_count(&self) -> usize {
        self.arcs.len()
    }

    /// The disks visited by this loop, in walking order (possibly with repeats).
    pub fn disks(&self) -> impl Iterator<Item = DiskIdx> + '_ {
        self.arcs.iter().map(|a| a.disk)
    }

    /// The vertices of this loop: the origin, followed by the end of every arc but the last.
    pub fn vertices(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.origin).chain(
            self.arcs
                .iter()
                .take(self.arcs.len().saturating_sub(1))
                .map(|a| a.to),
        )
    }

    /// Does the last arc end (within `tolerance`) where the loop started?
    pub fn is_closed(&self, tolerance: f64) -> bool {
        self.arcs
            .last()
            .is_some_and(|a| (a.to - self.origin).hypot() <= tolerance)
    }

    /// The signed area enclosed by this loop.
    ///
    /// With the y axis pointing up, outer boundaries have positive area and
    /// the boundaries of holes have negative area.
    pub fn signed_area(&self) -> f64 {
        self.arcs.iter().map(|a| a.signed_area(self.radius)).sum()
    }

    /// Is this loop the boundary of a hole?
    pub fn is_hole(&self) -> bool {
        self.signed_area() < 0.0
    }
}

/// A disk whose whole circle is a boundary component.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct IsolatedMarker {
    /// The isolated disk.
    pub disk: DiskIdx,
    /// Its center.
    pub center: Point,
}

/// The complete boundary of a union of disks.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Boundary {
    pub(crate) radius: f64,
    pub(crate) loops: Vec<BoundaryLoop>,
    pub(crate) isolated: Vec<IsolatedMarker>,
}

impl Boundary {
    /// The radius shared by all disks.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// All the closed loops, in the order they were traced.
    pub fn loops(&self) -> &[BoundaryLoop] {
        &self.loops
    }

    /// All the disks with no neighbors.
    pub fn isolated(&self) -> &[IsolatedMarker] {
        &self.isolated
    }

    /// The total number of arcs over all loops.
    pub fn total_edges(&self) -> usize {
        self.loops.iter().map(BoundaryLoop::edge_count).sum()
    }

    /// The area of the union.
    pub fn area(&self) -> f64 {
        let circles = self.isolated.len() as f64 * PI * self.radius * self.radius;
        circles + self.loops.iter().map(BoundaryLoop::signed_area).sum::<f64>()
    }

    /// Walks the whole boundary, reporting it to `visitor`.
    ///
    /// Isolated disks come first, then the loops in trace order.
    pub fn visit<V: BoundaryVisitor + ?Sized>(&self, visitor: &mut V) {
        for marker in &self.isolated {
            visitor.isolated(marker, self.radius);
        }
        for lp in &self.loops {
            visitor.begin_loop(lp.origin);
            for arc in &lp.arcs {
                visitor.arc(arc, self.radius);
            }
            visitor.end_loop();
        }
    }

    /// Converts the boundary to a compound kurbo path.
    ///
    /// Arcs are approximated by cubic Béziers to within `tolerance`. Fill
    /// the result with the non-zero rule.
    pub fn to_bezpath(&self, tolerance: f64) -> BezPath {
        let mut sink = BezPathSink::new(tolerance);
        self.visit(&mut sink);
        sink.into_path()
    }
}

/// Something that consumes a traced boundary, for example by rendering it.
///
/// Calls arrive in the order `isolated*`, then for every loop
/// `begin_loop`, one or more `arc`, `end_loop`.
pub trait BoundaryVisitor {
    /// A disk whose full circle is part of the boundary.
    fn isolated(&mut self, marker: &IsolatedMarker, radius: f64);

    /// A new loop starts at `origin`.
    fn begin_loop(&mut self, origin: Point);

    /// The current loop continues along `arc`.
    fn arc(&mut self, arc: &BoundaryArc, radius: f64);

    /// The current loop is finished; its last arc ended at its origin.
    fn end_loop(&mut self);
}

/// A [`BoundaryVisitor`] that builds a kurbo [`BezPath`].
#[derive(Clone, Debug)]
pub struct BezPathSink {
    path: BezPath,
    tolerance: f64,
}

impl BezPathSink {
    /// Creates a sink that approximates arcs to within `tolerance`.
    pub fn new(tolerance: f64) -> Self {
        BezPathSink {
            path: BezPath::new(),
            tolerance,
        }
    }

    /// Returns the accumulated path.
    pub fn into_path(self) -> BezPath {
        self.path
    }
}

impl BoundaryVisitor for BezPathSink {
    fn isolated(&mut self, marker: &IsolatedMarker, radius: f64) {
        let circle = Circle::new(marker.center, radius);
        self.path.extend(circle.path_elements(self.tolerance));
    }

    fn begin_loop(&mut self, origin: Point) {
        self.path.move_to(origin);
    }

    fn arc(&mut self, arc: &BoundaryArc, radius: f64) {
        self.path
            .extend(arc.to_kurbo(radius).append_iter(self.tolerance));
    }

    fn end_loop(&mut self) {
        self.path.close_path();
    }
}
