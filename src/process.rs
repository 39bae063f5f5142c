//! Running the external intersection program.
//!
//! The intersection records are usually computed by a separate sweep-line
//! program. It reads one center per line (`x y`, sorted by increasing `x`)
//! on its standard input, and writes intersection records in the wire
//! format to its standard output. The radius is baked into the program.

use std::{
    ffi::OsString,
    io::{BufWriter, Write as _},
    process::{Command, Stdio},
};

use crate::{Disks, Error, Records};

/// A failure to get intersection records out of the external program.
#[derive(Debug)]
pub enum ProcessError {
    /// Spawning the program, or talking to it, failed.
    Io(std::io::Error),
    /// The program exited unsuccessfully.
    Status(std::process::ExitStatus),
    /// The centers weren't sorted by `x`.
    UnsortedCenters,
    /// The program's output wasn't a valid set of records.
    Records(Error),
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::Io(e) => write!(f, "failed to run the intersection program: {e}"),
            ProcessError::Status(status) => {
                write!(f, "the intersection program failed ({status})")
            }
            ProcessError::UnsortedCenters => {
                write!(f, "disk centers must be sorted by x coordinate")
            }
            ProcessError::Records(e) => write!(f, "bad output from the intersection program: {e}"),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Io(e) => Some(e),
            ProcessError::Records(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::Io(e)
    }
}

impl From<Error> for ProcessError {
    fn from(e: Error) -> Self {
        ProcessError::Records(e)
    }
}

/// A configured invocation of the external intersection program.
#[derive(Clone, Debug)]
pub struct ExternalIntersector {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalIntersector {
    /// Prepares to run `program` with no arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        ExternalIntersector {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Adds a command line argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Runs the program on `disks` and ingests its output.
    ///
    /// Blocks until the program exits. The disks must be sorted by x
    /// coordinate (see [`Disks::sort_by_x`]).
    pub fn run(&self, disks: &Disks) -> Result<Records, ProcessError> {
        if !disks.is_sorted_by_x() {
            return Err(ProcessError::UnsortedCenters);
        }

        let span = tracing::debug_span!(
            "intersector",
            program = %self.program.to_string_lossy(),
            disks = disks.len()
        );
        let _guard = span.enter();

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;

        // Feed the centers from another thread, so that a program that
        // starts writing before it has read everything can't deadlock us.
        let stdin = child.stdin.take();
        let centers: Vec<_> = disks.centers().collect();
        let writer = std::thread::spawn(move || -> std::io::Result<()> {
            let Some(stdin) = stdin else {
                return Ok(());
            };
            let mut w = BufWriter::new(stdin);
            for c in centers {
                writeln!(w, "{} {}", c.x, c.y)?;
            }
            w.flush()
        });

        let output = child.wait_with_output()?;
        let written = writer
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("writer thread panicked")));

        if !output.status.success() {
            return Err(ProcessError::Status(output.status));
        }
        written?;

        let text = String::from_utf8(output.stdout)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        tracing::debug!(bytes = text.len(), "intersection program finished");
        Ok(Records::parse(disks, &text)?)
    }
}
