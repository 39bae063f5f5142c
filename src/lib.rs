#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

#[macro_use]
mod typed_vec;

pub mod angle;
#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
pub mod boundary;
mod disks;
pub mod num;
pub mod process;
pub mod records;
#[cfg(feature = "svg")]
pub mod svg;
pub mod trace;

#[cfg(any(test, feature = "generators"))]
pub mod generators;

pub use boundary::{Boundary, BoundaryArc, BoundaryLoop, BoundaryVisitor, IsolatedMarker};
pub use disks::{DiskIdx, DiskVec, Disks};
pub use records::{IntersectionRecord, Records};
pub use trace::trace;

/// A loop that couldn't be closed.
///
/// This means that the intersection records don't describe the boundary
/// of a planar arrangement of equal circles.
#[derive(Clone, Debug, PartialEq)]
pub struct UnterminatedLoop {
    /// The disk the loop was started from.
    pub start: DiskIdx,
    /// The disk whose bucket was empty when the walk needed to leave it.
    pub stuck_at: DiskIdx,
    /// The arcs traced before getting stuck.
    pub partial: BoundaryLoop,
}

#[derive(Clone, Debug, PartialEq)]
/// The intersection records were faulty.
pub enum Error {
    /// A record didn't have the form `i j x y`.
    MalformedRecord {
        /// The (1-based) line number of the record.
        line: usize,
        /// The text of the offending line.
        content: String,
    },
    /// A record referred to a disk that doesn't exist.
    OutOfRangeIndex {
        /// The (1-based) line number of the record.
        line: usize,
        /// The offending index.
        index: usize,
        /// How many disks there are.
        disk_count: usize,
    },
    /// A record between two different disks had an infinite or NaN coordinate.
    NonFinite {
        /// The (1-based) line number of the record.
        line: usize,
    },
    /// The records don't close up into loops.
    UnterminatedLoop(Box<UnterminatedLoop>),
    /// The records were checked against a different number of disks than
    /// the ones they're being traced with.
    DiskCountMismatch {
        /// How many disks the records were checked against.
        records: usize,
        /// How many disks there are now.
        disks: usize,
    },
}

impl From<UnterminatedLoop> for Error {
    fn from(ul: UnterminatedLoop) -> Self {
        Error::UnterminatedLoop(Box::new(ul))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MalformedRecord { line, content } => {
                write!(f, "line {line}: malformed intersection record {content:?}")
            }
            Error::OutOfRangeIndex {
                line,
                index,
                disk_count,
            } => write!(
                f,
                "line {line}: disk index {index} out of range (there are {disk_count} disks)"
            ),
            Error::NonFinite { line } => write!(f, "line {line}: non-finite intersection point"),
            Error::UnterminatedLoop(ul) => write!(
                f,
                "boundary loop starting at disk {} got stuck at disk {} after {} arcs",
                ul.start.0,
                ul.stuck_at.0,
                ul.partial.edge_count()
            ),
            Error::DiskCountMismatch { records, disks } => write!(
                f,
                "records were read for {records} disks but there are {disks} disks"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Traces the boundary of a union of disks from intersection records in the wire format.
///
/// `centers` must be in the same order as the one given to the program
/// that produced `records`.
pub fn union_boundary(
    centers: impl IntoIterator<Item = impl Into<kurbo::Point>>,
    radius: f64,
    records: &str,
) -> Result<Boundary, Error> {
    let disks = Disks::new(centers, radius);
    let records = Records::parse(&disks, records)?;
    trace(&disks, records)
}
