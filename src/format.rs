use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use indexmap::IndexSet;

use crate::table::{TargetTable, Timing};

const COLUMN_WIDTH: usize = 14;
const COLUMN_PADDING: &str = "  ";

/// How measurement cells are lined up with the function header row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Layout {
  /// The first target's functions make up the header, and every target's
  /// values are written in the order they appear in its own file.
  #[default]
  Positional,
  /// The header holds every function seen in any target, and values are
  /// placed under their own function's column.
  Union,
}

/// One row of the measurements sheet.
#[derive(Debug, PartialEq)]
pub struct Row {
  pub target: String,
  pub cells: Vec<Option<Timing>>,
}

/// The measurements sheet, without its top left corner.
#[derive(Debug, Default, PartialEq)]
pub struct Grid {
  pub header: Vec<String>,
  pub rows: Vec<Row>,
}

impl Grid {
  pub fn new(table: &TargetTable, layout: Layout) -> Self {
    match layout {
      Layout::Positional => Self::positional(table),
      Layout::Union => Self::union(table),
    }
  }

  fn positional(table: &TargetTable) -> Self {
    let header: Vec<String> = table
      .values()
      .next()
      .map(|first| first.keys().cloned().collect())
      .unwrap_or_default();

    let rows = table
      .iter()
      .map(|(target, measurements)| Row {
        target: target.clone(),
        cells: measurements.values().cloned().map(Some).collect(),
      })
      .collect();

    Self { header, rows }
  }

  fn union(table: &TargetTable) -> Self {
    let header = table
      .values()
      .flat_map(|measurements| measurements.keys())
      .collect::<IndexSet<_>>();

    let rows = table
      .iter()
      .map(|(target, measurements)| Row {
        target: target.clone(),
        cells: header.iter().map(|function| measurements.get(*function).cloned()).collect(),
      })
      .collect();

    Self {
      header: header.into_iter().cloned().collect(),
      rows,
    }
  }

  /// Number of columns needed for the measurement cells, which may exceed the
  /// header in the positional layout.
  pub fn width(&self) -> usize {
    self
      .rows
      .iter()
      .map(|row| row.cells.len())
      .chain([self.header.len()])
      .max()
      .unwrap_or_default()
  }
}

fn format_row<'a, I: IntoIterator<Item = &'a str>>(first: &'a str, cols: I) -> String {
  [first]
    .into_iter()
    .chain(cols)
    .enumerate()
    .map(|(i, col)| {
      if i == 0 {
        format!("{col:<COLUMN_WIDTH$}")
      } else {
        format!("{col:>COLUMN_WIDTH$}")
      }
    })
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING)
    .trim_end()
    .to_string()
}

/// Renders the grid as a plain text table.
pub fn format(grid: &Grid) -> Result<String> {
  let mut table = String::new();

  let header = format_row("target", grid.header.iter().map(String::as_str));
  writeln!(table, "{header}")?;
  writeln!(table, "{}", "=".repeat(header.len()))?;

  for row in &grid.rows {
    let cells = row.cells.iter().map(|cell| cell.as_deref().unwrap_or("-"));
    writeln!(table, "{}", format_row(&row.target, cells))?;
  }

  Ok(table)
}
