use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser};
use tracing_subscriber::EnvFilter;

use diskunion::{
    generators, process::ExternalIntersector, records::Records, trace, Disks,
};

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Layout {
    Triangle,
    Chain,
    Ring,
    Grid,
}

#[derive(Parser)]
struct Cli {
    /// Where to write the SVG output.
    #[arg(long)]
    output: PathBuf,

    #[arg(long, default_value_t = 0.5)]
    radius: f64,

    #[command(flatten)]
    input: Input,

    /// Read intersection records from this file instead of computing them.
    #[arg(long, conflicts_with = "program")]
    records: Option<PathBuf>,

    /// Compute intersection records by running this program.
    #[arg(long)]
    program: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct Input {
    /// A file of disk centers, one `x y` pair per line.
    centers: Option<PathBuf>,

    #[arg(long)]
    layout: Option<Layout>,
}

fn read_centers(path: &PathBuf) -> anyhow::Result<Vec<(f64, f64)>> {
    let text = std::fs::read_to_string(path)?;
    let mut ret = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            continue;
        };
        let x: f64 = x.parse().with_context(|| format!("line {}", idx + 1))?;
        let y: f64 = y.parse().with_context(|| format!("line {}", idx + 1))?;
        ret.push((x, y));
    }
    Ok(ret)
}

fn get_disks(input: &Input, radius: f64) -> anyhow::Result<Disks> {
    match (&input.centers, &input.layout) {
        (Some(path), None) => Ok(Disks::new(read_centers(path)?, radius)),
        (None, Some(layout)) => Ok(match layout {
            Layout::Triangle => generators::triangle(radius),
            Layout::Chain => generators::chain(10, radius * 1.5, radius),
            Layout::Ring => generators::ring(12, radius * 4.0, radius),
            Layout::Grid => generators::grid(8, radius * 1.6, radius),
        }),
        _ => anyhow::bail!("give either a centers file or a layout"),
    }
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();
    let mut disks = get_disks(&args.input, args.radius)?;

    let records = if let Some(path) = &args.records {
        Records::parse(&disks, &std::fs::read_to_string(path)?)?
    } else if let Some(program) = &args.program {
        disks.sort_by_x();
        ExternalIntersector::new(program).run(&disks)?
    } else {
        Records::from_records(&disks, generators::boundary_records(&disks))?
    };

    let boundary = trace(&disks, records)?;
    let holes = boundary.loops().iter().filter(|lp| lp.is_hole()).count();
    tracing::info!(
        loops = boundary.loops().len(),
        holes,
        isolated = boundary.isolated().len(),
        area = boundary.area(),
        "traced union"
    );

    svg::save(&args.output, &diskunion::svg::document(&boundary))?;
    Ok(())
}
