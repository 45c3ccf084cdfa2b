mod collect;
mod ext;
mod format;
mod report;
mod table;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::format::{Grid, Layout};

/// Compiles per-function benchmark timings into a spreadsheet, one row per
/// target and one column per function.
#[derive(Parser, Debug)]
struct Args {
  /// Directory holding one benchmark output file per target.
  #[arg(long, default_value = "output")]
  input_dir: PathBuf,
  /// Spreadsheet whose sheets are copied into the report.
  #[arg(long, default_value = "function_domains.xls")]
  template: PathBuf,
  /// Where to write the report. Overwritten if it exists.
  #[arg(short, long, default_value = "math-measurements.ods")]
  output: PathBuf,
  /// How timings are lined up with the function header row.
  #[arg(long, value_enum, default_value_t)]
  layout: Layout,
  /// Also print the measurements as a text table.
  #[arg(long)]
  print: bool,
}

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() -> Result<()> {
  init_logging();

  let args = Args::parse();

  let table = collect::collect(&args.input_dir).with_context(|| format!("collect {:?}", args.input_dir))?;
  info!(targets = table.len(), input_dir = ?args.input_dir, "collected measurements");

  let grid = Grid::new(&table, args.layout);

  if args.print {
    println!("{}", format::format(&grid).context("format")?);
  }

  report::report(&grid, &args.template, &args.output).context("report")?;

  Ok(())
}
