//! The boundary trace engine.
//!
//! The engine walks the bucketed intersection records one boundary loop at
//! a time. Standing on disk `i`, having arrived at point `o`, it takes the
//! record in `i`'s bucket whose point comes first when turning
//! counterclockwise around `i`'s center from `o`; the arc of `i` between
//! the two points is part of the boundary, and the record says which disk
//! the walk continues on. Every record is consumed exactly once, and the
//! walk never needs anything but pseudo-angle comparisons.

use kurbo::Point;

use crate::{
    angle::{next_after, PseudoAngle},
    records::Exit,
    Boundary, BoundaryArc, BoundaryLoop, DiskIdx, DiskVec, Disks, Error, IsolatedMarker, Records,
    UnterminatedLoop,
};

/// Traces all boundary loops described by `records`.
///
/// Either every record is consumed and the complete boundary is
/// returned, or an error is returned and nothing is.
pub fn trace(disks: &Disks, records: Records) -> Result<Boundary, Error> {
    Tracer::new(disks, records)?.run()
}

/// The state of one trace run.
///
/// The tracer owns the record buckets for the duration of the run, and
/// removes records from them as they're consumed.
#[derive(Debug)]
pub struct Tracer<'a> {
    disks: &'a Disks,
    buckets: DiskVec<Vec<Exit>>,
    isolated: Vec<DiskIdx>,
    remaining: usize,
}

/// What the walk does next, when standing on some disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// Leave along the record at this position in the current bucket.
    Take(usize),
    /// Close the loop back to its origin.
    Close,
}

impl<'a> Tracer<'a> {
    /// Prepares to trace `records`, whose disk indices refer to `disks`.
    ///
    /// Fails if `records` was ingested for a different number of disks,
    /// since its indices can't be trusted then.
    pub fn new(disks: &'a Disks, records: Records) -> Result<Self, Error> {
        if records.disk_count() != disks.len() {
            return Err(Error::DiskCountMismatch {
                records: records.disk_count(),
                disks: disks.len(),
            });
        }

        let Records {
            buckets,
            isolated,
            total_edges,
        } = records;
        Ok(Tracer {
            disks,
            buckets,
            isolated,
            remaining: total_edges,
        })
    }

    /// How many records haven't been consumed yet.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Checks that the bucket sizes add up to the number of unconsumed records.
    pub fn check_invariants(&self) -> bool {
        self.buckets.values().map(Vec::len).sum::<usize>() == self.remaining
    }

    /// Traces every loop.
    pub fn run(mut self) -> Result<Boundary, Error> {
        let mut loops = Vec::new();
        while let Some(lp) = self.next_loop()? {
            loops.push(lp);
        }

        let isolated = self
            .isolated
            .iter()
            .map(|&disk| IsolatedMarker {
                disk,
                center: self.disks[disk],
            })
            .collect();
        Ok(Boundary {
            radius: self.disks.radius(),
            loops,
            isolated,
        })
    }

    /// Traces a single loop, or returns `None` if every record has been consumed.
    pub fn next_loop(&mut self) -> Result<Option<BoundaryLoop>, Error> {
        // Only `Records` ingestion and this walk touch the buckets, and both
        // keep the count in step, so a violation is a bug here rather than
        // bad input.
        debug_assert!(self.check_invariants());
        if self.remaining == 0 {
            return Ok(None);
        }

        let start = self.first_nonempty_bucket();
        let opening = self.buckets[start].remove(0);
        self.remaining -= 1;

        let mut lp = BoundaryLoop {
            start_disk: start,
            origin: opening.point,
            radius: self.disks.radius(),
            arcs: Vec::new(),
        };
        let mut disk = opening.next;
        let mut arrival = opening.point;

        loop {
            #[cfg(feature = "slow-asserts")]
            assert!(self.check_invariants());

            let closing = (disk == start).then_some(lp.origin);
            match self.choose(disk, arrival, closing) {
                Some(Step::Close) => {
                    lp.arcs.push(self.arc(disk, arrival, lp.origin));
                    break;
                }
                Some(Step::Take(idx)) => {
                    let exit = self.buckets[disk].remove(idx);
                    self.remaining -= 1;
                    tracing::trace!(from = disk.0, to = exit.next.0, "boundary step");
                    lp.arcs.push(self.arc(disk, arrival, exit.point));
                    disk = exit.next;
                    arrival = exit.point;
                }
                None => {
                    tracing::warn!(
                        start = start.0,
                        stuck_at = disk.0,
                        arcs = lp.arcs.len(),
                        "boundary loop has no way out"
                    );
                    return Err(UnterminatedLoop {
                        start,
                        stuck_at: disk,
                        partial: lp,
                    }
                    .into());
                }
            }
        }

        tracing::debug!(start = start.0, arcs = lp.arcs.len(), "traced boundary loop");
        Ok(Some(lp))
    }

    fn first_nonempty_bucket(&self) -> DiskIdx {
        // The invariant guarantees that some bucket is non-empty whenever
        // `remaining` is positive.
        self.buckets
            .iter()
            .find(|(_, bucket)| !bucket.is_empty())
            .map(|(idx, _)| idx)
            .unwrap_or(DiskIdx(0))
    }

    /// Decides where to leave `disk`, having arrived at `arrival`.
    ///
    /// `closing` is the origin of the current loop if `disk` is the disk the
    /// loop started from; it competes with the bucket's records, and wins
    /// ties.
    fn choose(&self, disk: DiskIdx, arrival: Point, closing: Option<Point>) -> Option<Step> {
        let center = self.disks[disk];
        let angle = |p: Point| PseudoAngle::of(p - center);

        let steps = closing
            .map(|p| (Step::Close, p))
            .into_iter()
            .chain(
                self.buckets[disk]
                    .iter()
                    .enumerate()
                    .map(|(idx, exit)| (Step::Take(idx), exit.point)),
            );
        let idx = next_after(angle(arrival), steps.clone().map(|(_, p)| angle(p)))?;
        steps.map(|(s, _)| s).nth(idx)
    }

    fn arc(&self, disk: DiskIdx, from: Point, to: Point) -> BoundaryArc {
        BoundaryArc {
            disk,
            center: self.disks[disk],
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use crate::generators::{self, boundary_records};

    use super::*;

    fn trace_layout(disks: &Disks) -> Boundary {
        let records = Records::from_records(disks, boundary_records(disks)).unwrap();
        let total = records.total_edges();
        let boundary = trace(disks, records).unwrap();
        assert_eq!(boundary.total_edges(), total);
        for lp in boundary.loops() {
            assert!(lp.is_closed(0.0));
        }
        boundary
    }

    #[test]
    fn triangle_with_overlap() {
        let disks = generators::triangle(0.6);
        let records = boundary_records(&disks);
        assert_eq!(records.len(), 3);

        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 1);
        assert!(boundary.isolated().is_empty());
        assert_eq!(boundary.loops()[0].edge_count(), 3);
        assert!(!boundary.loops()[0].is_hole());
    }

    #[test]
    fn triangle_with_hole() {
        let disks = generators::triangle(0.52);
        assert_eq!(boundary_records(&disks).len(), 6);

        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 2);
        assert!(boundary.isolated().is_empty());

        let holes: Vec<_> = boundary.loops().iter().map(|lp| lp.is_hole()).collect();
        assert_eq!(holes.iter().filter(|&&h| h).count(), 1);
        for lp in boundary.loops() {
            assert_eq!(lp.edge_count(), 3);
        }
    }

    #[test]
    fn triangle_with_touching_disks() {
        // The bottom two disks are tangent, so the union is a bent chain.
        let disks = generators::triangle(0.5);
        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 1);
        assert_eq!(boundary.loops()[0].edge_count(), 4);
        assert!(boundary.isolated().is_empty());
    }

    #[test]
    fn single_disk() {
        let disks = Disks::new([(3.0, 4.0)], 0.5);
        let records = Records::from_records(&disks, boundary_records(&disks)).unwrap();
        assert_eq!(records.total_edges(), 0);

        let boundary = trace(&disks, records).unwrap();
        assert!(boundary.loops().is_empty());
        assert_eq!(
            boundary.isolated(),
            &[IsolatedMarker {
                disk: DiskIdx(0),
                center: Point::new(3.0, 4.0)
            }]
        );
    }

    #[test]
    fn isolated_disk_next_to_a_cluster() {
        let mut centers: Vec<_> = generators::chain(3, 0.7, 0.5).centers().collect();
        centers.push(Point::new(10.0, 10.0));
        let disks = Disks::new(centers, 0.5);

        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 1);
        assert_eq!(boundary.isolated().len(), 1);
        assert_eq!(boundary.isolated()[0].disk, DiskIdx(3));
        assert!(boundary.loops()[0].disks().all(|d| d != DiskIdx(3)));
    }

    #[test]
    fn two_clusters() {
        let left = generators::triangle(0.6);
        let right = generators::translated(&generators::ring(6, 1.0, 0.6), (20.0, 0.0));
        let disks = Disks::new(left.centers().chain(right.centers()), 0.6);

        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 3);
        for lp in boundary.loops() {
            let in_left = lp.disks().all(|d| d.0 < 3);
            let in_right = lp.disks().all(|d| d.0 >= 3);
            assert!(in_left || in_right, "{lp:?} crosses clusters");
        }
    }

    #[test]
    fn ring_has_one_hole() {
        let disks = generators::ring(8, 1.045, 0.5);
        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 2);

        let (holes, outers): (Vec<_>, Vec<_>) = boundary.loops().iter().partition(|lp| lp.is_hole());
        assert_eq!(holes.len(), 1);
        assert_eq!(outers.len(), 1);
        assert_eq!(holes[0].edge_count(), 8);
        assert_eq!(outers[0].edge_count(), 8);
        assert!(outers[0].signed_area() > -holes[0].signed_area());
    }

    #[test]
    fn chain_start_disk_has_two_arcs() {
        // The middle disk of a horizontal chain has a top arc and a bottom arc
        // on the same loop. Put it first, so that the trace starts from it.
        let disks = Disks::new([(0.7, 0.0), (0.0, 0.0), (1.4, 0.0)], 0.5);
        let boundary = trace_layout(&disks);
        assert_eq!(boundary.loops().len(), 1);
        assert_eq!(boundary.loops()[0].edge_count(), 4);
        assert_eq!(boundary.loops()[0].start_disk(), DiskIdx(0));
        assert_eq!(
            boundary.loops()[0].disks().filter(|&d| d == DiskIdx(0)).count(),
            2
        );
        assert!(boundary.area() > 0.0);
    }

    #[test]
    fn area_matches_reference() {
        // Two disks 0.6 apart with radius 0.5.
        let disks = Disks::new([(0.0, 0.0), (0.6, 0.0)], 0.5);
        let boundary = trace_layout(&disks);
        let lens = 2.0 * 0.25 * (0.6f64).acos() - 0.3 * 0.8;
        let expected = 2.0 * std::f64::consts::PI * 0.25 - lens;
        assert!((boundary.area() - expected).abs() < 1e-12);
    }

    #[test]
    fn empty() {
        let disks = Disks::new(Vec::<Point>::new(), 0.5);
        let boundary = trace(&disks, Records::default()).unwrap();
        assert!(boundary.loops().is_empty());
        assert!(boundary.isolated().is_empty());
    }

    #[test]
    fn inconsistent_records() {
        // Disk 1 receives the walk but has nowhere to send it.
        let disks = Disks::new([(0.0, 0.0), (0.6, 0.0)], 0.5);
        let records = Records::parse(&disks, "1 0 0.3 -0.4\n").unwrap();
        let err = trace(&disks, records).unwrap_err();
        assert_matches!(err, Error::UnterminatedLoop(ul) => {
            assert_eq!(ul.start, DiskIdx(0));
            assert_eq!(ul.stuck_at, DiskIdx(1));
            assert_eq!(ul.partial.edge_count(), 0);
            assert_eq!(ul.partial.origin(), Point::new(0.3, -0.4));
        });
    }

    #[test]
    fn records_for_other_disks() {
        let three = generators::triangle(0.6);
        let records = Records::from_records(&three, boundary_records(&three)).unwrap();
        let two = Disks::new([(0.0, 0.0), (1.0, 0.0)], 0.6);
        assert_matches!(
            trace(&two, records),
            Err(Error::DiskCountMismatch {
                records: 3,
                disks: 2
            })
        );
        assert_matches!(
            Tracer::new(&Disks::new([(0.0, 0.0)], 0.5), Records::default()),
            Err(Error::DiskCountMismatch { .. })
        );
    }

    #[test]
    fn next_loop_is_incremental() {
        let disks = generators::triangle(0.52);
        let records = Records::from_records(&disks, boundary_records(&disks)).unwrap();
        let mut tracer = Tracer::new(&disks, records).unwrap();
        assert_eq!(tracer.remaining(), 6);

        let first = tracer.next_loop().unwrap().unwrap();
        assert_eq!(tracer.remaining(), 6 - first.edge_count());
        assert!(tracer.check_invariants());
        let second = tracer.next_loop().unwrap().unwrap();
        assert_eq!(first.edge_count() + second.edge_count(), 6);
        assert_eq!(tracer.next_loop(), Ok(None));
    }

    #[test]
    fn random_clusters() {
        arbtest::arbtest(crate::arbitrary::arbtests::trace_conserves_edges);
    }
}
