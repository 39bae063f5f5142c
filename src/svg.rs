//! SVG output.

use kurbo::{Point, Rect};
use svg::{
    node::element::{path::Data, Path},
    Document,
};

use crate::{Boundary, BoundaryArc, BoundaryVisitor, IsolatedMarker};

/// A [`BoundaryVisitor`] that produces SVG path data.
///
/// Arcs become elliptical-arc commands (with equal radii), so the output is
/// exact rather than flattened. Coordinates are written as they are; SVG's
/// y axis points down, so the picture comes out mirrored unless the
/// consumer flips it (as [`document`] does).
#[derive(Clone, Debug)]
pub struct PathDataSink {
    data: Data,
}

impl Default for PathDataSink {
    fn default() -> Self {
        PathDataSink::new()
    }
}

impl PathDataSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        PathDataSink { data: Data::new() }
    }

    /// Returns the accumulated path data.
    pub fn into_data(self) -> Data {
        self.data
    }

    fn update(&mut self, f: impl FnOnce(Data) -> Data) {
        let data = std::mem::replace(&mut self.data, Data::new());
        self.data = f(data);
    }
}

fn arc_to(data: Data, r: f64, large: bool, to: Point) -> Data {
    let large = if large { 1.0 } else { 0.0 };
    data.elliptical_arc_to((r, r, 0.0, large, 1.0, to.x, to.y))
}

impl BoundaryVisitor for PathDataSink {
    fn isolated(&mut self, marker: &IsolatedMarker, radius: f64) {
        // A single arc command can't draw a full circle, so use two halves.
        let c = marker.center;
        self.update(|data| {
            let data = data.move_to((c.x + radius, c.y));
            let data = arc_to(data, radius, false, Point::new(c.x - radius, c.y));
            arc_to(data, radius, false, Point::new(c.x + radius, c.y)).close()
        });
    }

    fn begin_loop(&mut self, origin: Point) {
        self.update(|data| data.move_to((origin.x, origin.y)));
    }

    fn arc(&mut self, arc: &BoundaryArc, radius: f64) {
        let large = arc.sweep_angle() > std::f64::consts::PI;
        let to = arc.to;
        self.update(|data| arc_to(data, radius, large, to));
    }

    fn end_loop(&mut self) {
        self.update(Data::close);
    }
}

/// The path data for a whole boundary.
pub fn path_data(boundary: &Boundary) -> Data {
    let mut sink = PathDataSink::new();
    boundary.visit(&mut sink);
    sink.into_data()
}

/// The bounding box of every disk touching the boundary.
fn bounding_box(boundary: &Boundary) -> Option<Rect> {
    let r = boundary.radius();
    boundary
        .loops()
        .iter()
        .flat_map(|lp| lp.arcs().iter().map(|a| a.center))
        .chain(boundary.isolated().iter().map(|m| m.center))
        .map(|c| Rect::new(c.x - r, c.y - r, c.x + r, c.y + r))
        .reduce(|a, b| a.union(b))
}

/// Renders a boundary as a filled SVG document.
///
/// The picture is drawn with the y axis pointing up, and the view box has
/// a little padding around the union.
pub fn document(boundary: &Boundary) -> Document {
    let bbox = bounding_box(boundary).unwrap_or(Rect::ZERO);
    let pad = (bbox.width().max(bbox.height()) * 0.05).max(boundary.radius() * 0.1);
    let bbox = bbox.inflate(pad, pad);

    let path = Path::new()
        .set("fill", "black")
        .set("fill-rule", "nonzero")
        .set("stroke", "none")
        .set("transform", "scale(1,-1)")
        .set("d", path_data(boundary));

    Document::new()
        .set(
            "viewBox",
            (bbox.x0, -bbox.y1, bbox.width(), bbox.height()),
        )
        .add(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::union_boundary;

    #[test]
    fn two_disks() {
        let boundary = union_boundary(
            [(0.0, 0.0), (0.6, 0.0)],
            0.5,
            "0 1 0.3 0.4\n1 0 0.3 -0.4\n",
        )
        .unwrap();
        let d = document(&boundary).to_string();
        assert!(d.contains("d=\"M0.3,-0.4"), "{d}");
        // Both arcs are more than half a circle.
        assert_eq!(d.matches("A0.5,0.5,0,1,1").count(), 2, "{d}");
        assert!(d.contains("z\"") || d.contains("Z\""), "{d}");
    }

    #[test]
    fn isolated_circle() {
        let boundary = union_boundary([(1.0, 2.0)], 0.5, "0 0 1 2\n").unwrap();
        let doc = document(&boundary).to_string();
        assert!(doc.contains("d=\"M1.5,2"), "{doc}");
        assert_eq!(doc.matches("A0.5,0.5,0,0,1").count(), 2, "{doc}");
        assert!(doc.contains("fill-rule=\"nonzero\""), "{doc}");
        assert!(doc.contains("viewBox"), "{doc}");
    }
}
