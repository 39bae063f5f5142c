//! Ingestion of intersection records.
//!
//! The external intersection program reports, one per line, the points
//! where the boundary of the union passes from one disk's circle to
//! another's. Each line reads `i j x y`: the point `(x, y)` is where the
//! boundary arc on disk `j` ends and the arc on disk `i` begins (it's the
//! intersection point of the two circles lying to the left of the segment
//! from center `i` to center `j`). A line with `i == j` says that disk `i`
//! has no neighbors at all; its coordinates are placeholders.

use kurbo::Point;

use crate::{DiskIdx, DiskVec, Disks, Error};

/// One intersection record.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct IntersectionRecord {
    /// The disk whose boundary arc ends at `point`. Records are bucketed by this disk.
    pub anchor: DiskIdx,
    /// The disk whose boundary arc starts at `point`.
    pub source: DiskIdx,
    /// The intersection point.
    pub point: Point,
}

impl IntersectionRecord {
    /// Does this record mark an isolated disk?
    pub fn is_isolated(&self) -> bool {
        self.anchor == self.source
    }

    /// Parses one line of the wire format.
    ///
    /// A line needs exactly four fields, so blank lines are malformed.
    /// `line_no` is only used for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, Error> {
        let malformed = || Error::MalformedRecord {
            line: line_no,
            content: line.to_owned(),
        };

        let mut fields = line.split_whitespace();
        let i: usize = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let j: usize = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let x: f64 = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        let y: f64 = fields
            .next()
            .and_then(|f| f.parse().ok())
            .ok_or_else(malformed)?;
        if fields.next().is_some() {
            return Err(malformed());
        }

        Ok(IntersectionRecord {
            anchor: DiskIdx(j),
            source: DiskIdx(i),
            point: Point::new(x, y),
        })
    }
}

/// Writes the record in the wire format, `source anchor x y`.
impl std::fmt::Display for IntersectionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.source.0, self.anchor.0, self.point.x, self.point.y
        )
    }
}

/// A bucket entry: the walk leaves the bucket's disk at `point` and continues on `next`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Exit {
    pub next: DiskIdx,
    pub point: Point,
}

/// Intersection records, bucketed by anchor disk and ready to be traced.
#[derive(Clone, Debug, Default)]
pub struct Records {
    pub(crate) buckets: DiskVec<Vec<Exit>>,
    pub(crate) isolated: Vec<DiskIdx>,
    pub(crate) total_edges: usize,
}

impl Records {
    /// Buckets the given records.
    ///
    /// Fails if any record refers to a disk that doesn't exist, or if a
    /// record between two different disks has a non-finite coordinate. No
    /// geometric validation is done.
    pub fn from_records(
        disks: &Disks,
        records: impl IntoIterator<Item = IntersectionRecord>,
    ) -> Result<Self, Error> {
        let mut ret = Records::empty(disks);
        for (idx, rec) in records.into_iter().enumerate() {
            ret.push(disks, rec, idx + 1)?;
        }
        ret.log_summary(disks);
        Ok(ret)
    }

    /// Parses and buckets records in the wire format.
    ///
    /// Nothing is returned unless every line is valid. A final newline is
    /// allowed, but blank lines are not.
    pub fn parse(disks: &Disks, text: &str) -> Result<Self, Error> {
        let mut ret = Records::empty(disks);
        for (idx, line) in text.lines().enumerate() {
            let rec = IntersectionRecord::parse_line(line, idx + 1)?;
            ret.push(disks, rec, idx + 1)?;
        }
        ret.log_summary(disks);
        Ok(ret)
    }

    fn empty(disks: &Disks) -> Self {
        Records {
            buckets: DiskVec::with_size(disks.len()),
            isolated: Vec::new(),
            total_edges: 0,
        }
    }

    fn push(&mut self, disks: &Disks, rec: IntersectionRecord, line: usize) -> Result<(), Error> {
        for idx in [rec.source, rec.anchor] {
            if idx.0 >= disks.len() {
                return Err(Error::OutOfRangeIndex {
                    line,
                    index: idx.0,
                    disk_count: disks.len(),
                });
            }
        }

        if rec.is_isolated() {
            self.isolated.push(rec.anchor);
        } else {
            if !rec.point.is_finite() {
                return Err(Error::NonFinite { line });
            }
            self.buckets[rec.anchor].push(Exit {
                next: rec.source,
                point: rec.point,
            });
            self.total_edges += 1;
        }
        Ok(())
    }

    fn log_summary(&self, disks: &Disks) {
        tracing::debug!(
            disks = disks.len(),
            edges = self.total_edges,
            isolated = self.isolated.len(),
            "ingested intersection records"
        );
    }

    /// The number of records between two different disks.
    pub fn total_edges(&self) -> usize {
        self.total_edges
    }

    /// The disks that were reported as having no neighbors.
    pub fn isolated(&self) -> &[DiskIdx] {
        &self.isolated
    }

    /// The number of disks these records were checked against.
    pub fn disk_count(&self) -> usize {
        self.buckets.len()
    }

    /// How many records are anchored at `disk`.
    pub fn bucket_len(&self, disk: DiskIdx) -> usize {
        self.buckets.get(disk).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn two_disks() -> Disks {
        Disks::new([(0.0, 0.0), (0.6, 0.0)], 0.5)
    }

    #[test]
    fn parse_line_field_order() {
        let rec = IntersectionRecord::parse_line("0 1 0.3 0.4", 1).unwrap();
        assert_eq!(rec.source, DiskIdx(0));
        assert_eq!(rec.anchor, DiskIdx(1));
        assert_eq!(rec.point, Point::new(0.3, 0.4));
        assert_eq!(rec.to_string(), "0 1 0.3 0.4");

        assert_eq!(
            IntersectionRecord::parse_line("\t2\t2  1e3 -5", 1),
            Ok(IntersectionRecord {
                anchor: DiskIdx(2),
                source: DiskIdx(2),
                point: Point::new(1000.0, -5.0),
            })
        );
    }

    #[test]
    fn malformed_lines() {
        for line in [
            "",
            "   ",
            "0 1 0.3",
            "0 1 0.3 0.4 0.5",
            "-1 0 0 0",
            "a 1 0 0",
            "0 2 abc 3.0",
        ] {
            assert_matches!(
                IntersectionRecord::parse_line(line, 7),
                Err(Error::MalformedRecord { line: 7, .. }),
                "{line}"
            );
        }
    }

    #[test]
    fn buckets_by_anchor() {
        let records = Records::parse(&two_disks(), "0 1 0.3 0.4\n1 0 0.3 -0.4\n").unwrap();
        assert_eq!(records.disk_count(), 2);
        assert_eq!(records.total_edges(), 2);
        assert!(records.isolated().is_empty());
        assert_eq!(
            records.buckets[DiskIdx(1)],
            vec![Exit {
                next: DiskIdx(0),
                point: Point::new(0.3, 0.4)
            }]
        );
        assert_eq!(
            records.buckets[DiskIdx(0)],
            vec![Exit {
                next: DiskIdx(1),
                point: Point::new(0.3, -0.4)
            }]
        );
    }

    #[test]
    fn isolated_records_are_set_aside() {
        let disks = Disks::new([(0.0, 0.0)], 0.5);
        let records = Records::parse(&disks, "0 0 0 0\n").unwrap();
        assert_eq!(records.isolated(), &[DiskIdx(0)]);
        assert_eq!(records.total_edges(), 0);
        assert_eq!(records.bucket_len(DiskIdx(0)), 0);

        // Placeholder coordinates don't need to be finite.
        let records = Records::parse(&disks, "0 0 nan inf\n").unwrap();
        assert_eq!(records.isolated(), &[DiskIdx(0)]);
    }

    #[test]
    fn malformed_record_rejects_everything() {
        assert_matches!(
            Records::parse(&two_disks(), "0 1 0.3 0.4\n0 2 abc 3.0\n"),
            Err(Error::MalformedRecord { line: 2, content }) if content == "0 2 abc 3.0"
        );
    }

    #[test]
    fn blank_line_rejects_everything() {
        assert_matches!(
            Records::parse(&two_disks(), "0 1 0.3 0.4\n\n1 0 0.3 -0.4\n"),
            Err(Error::MalformedRecord { line: 2, content }) if content.is_empty()
        );
        assert_matches!(
            Records::parse(&two_disks(), "0 1 0.3 0.4\n \t\n"),
            Err(Error::MalformedRecord { line: 2, .. })
        );
    }

    #[test]
    fn out_of_range() {
        assert_matches!(
            Records::parse(&two_disks(), "0 2 0.3 0.4\n"),
            Err(Error::OutOfRangeIndex {
                line: 1,
                index: 2,
                disk_count: 2
            })
        );
        assert_matches!(
            Records::from_records(
                &two_disks(),
                [IntersectionRecord {
                    anchor: DiskIdx(0),
                    source: DiskIdx(5),
                    point: Point::ZERO,
                }]
            ),
            Err(Error::OutOfRangeIndex { index: 5, .. })
        );
    }

    #[test]
    fn non_finite() {
        assert_matches!(
            Records::parse(&two_disks(), "0 1 0.3 0.4\n1 0 inf 0\n"),
            Err(Error::NonFinite { line: 2 })
        );
    }

    #[test]
    fn empty_input() {
        let records = Records::parse(&Disks::new(Vec::<Point>::new(), 1.0), "").unwrap();
        assert_eq!(records.total_edges(), 0);
        assert!(records.isolated().is_empty());
    }
}
