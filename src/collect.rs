use std::{
  fs::{self, File},
  io::{BufRead, BufReader},
  path::Path,
};

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::{
  ext::StrExt,
  table::{Measurements, TargetTable},
};

/// Number of whitespace separated fields in a measurement line.
const RECORD_FIELDS: usize = 11;
/// Field holding the function name, followed by `FUNCTION_SUFFIX_LEN` marker characters.
const FUNCTION_FIELD: usize = 3;
/// Field holding the measured time.
const TIMING_FIELD: usize = 6;
/// Length of the marker trailing every function name field.
pub const FUNCTION_SUFFIX_LEN: usize = 3;

/// Strips the trailing marker off a function name field.
pub fn function_name(field: &str) -> &str {
  field.drop_last_chars(FUNCTION_SUFFIX_LEN)
}

/// Returns the target of an output file: the part of the name after the last
/// `-`, up to the first `.`.
pub fn target_name(file_name: &str) -> &str {
  let tail = file_name.rsplit('-').next().unwrap_or(file_name);

  tail.split('.').next().unwrap_or(tail)
}

/// Parses the measurement lines of a single output file. Lines that don't have
/// exactly `RECORD_FIELDS` fields are skipped.
pub fn parse_measurements<R: BufRead>(reader: R) -> Result<Measurements> {
  let mut measurements = Measurements::new();

  for (number, line) in reader.lines().enumerate() {
    let line = line.with_context(|| format!("read line {}", number + 1))?;
    let fields = line.split_whitespace().collect::<Vec<_>>();

    if fields.len() != RECORD_FIELDS {
      trace!(line = number + 1, fields = fields.len(), "skipping line");
      continue;
    }

    measurements.insert(
      function_name(fields[FUNCTION_FIELD]).to_string(),
      fields[TIMING_FIELD].to_string(),
    );
  }

  Ok(measurements)
}

/// Reads every output file in `dir`, in sorted file name order.
pub fn collect<P: AsRef<Path>>(dir: P) -> Result<TargetTable> {
  let dir = dir.as_ref();

  let mut entries = fs::read_dir(dir)
    .with_context(|| format!("read dir {dir:?}"))?
    .map(|entry| Ok(entry?.path()))
    .collect::<Result<Vec<_>>>()
    .context("list dir")?;
  entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

  let mut table = TargetTable::new();

  for path in entries {
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .with_context(|| format!("file name {path:?}"))?;
    let target = target_name(file_name).to_string();

    let file = File::open(&path).with_context(|| format!("open {path:?}"))?;
    let measurements = parse_measurements(BufReader::new(file)).with_context(|| format!("parse {path:?}"))?;

    debug!(%target, functions = measurements.len(), "collected target");
    table.insert(target, measurements);
  }

  Ok(table)
}
