use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Reader};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::{debug, info};

use crate::{ext::WorksheetExt, format::Grid};

pub const MEASUREMENTS_SHEET: &str = "measurements";

/// Copies every sheet of the template at `template` into a new workbook, then
/// appends the measurements sheet and saves the result to `output`. The
/// template itself is never written to.
pub fn report<P: AsRef<Path>, Q: AsRef<Path>>(grid: &Grid, template: P, output: Q) -> Result<()> {
  let template = template.as_ref();
  let output = output.as_ref();

  if template == output {
    anyhow::bail!("output {output:?} would overwrite the template");
  }

  let mut workbook = Workbook::new();

  for sheet in copy_template(template).with_context(|| format!("copy template {template:?}"))? {
    workbook.push_worksheet(sheet);
  }

  workbook.push_worksheet(measurements_sheet(grid).context("measurements sheet")?);
  workbook.save(output).with_context(|| format!("save {output:?}"))?;

  info!(?output, targets = grid.rows.len(), "report written");

  Ok(())
}

/// Reads every sheet of the template, keeping sheet names, order, cell values
/// and formulas. Date cells get a date number format; other cell styles,
/// column widths and merged ranges are not carried over.
fn copy_template(template: &Path) -> Result<Vec<Worksheet>> {
  let mut source = open_workbook_auto(template).context("open")?;
  let mut sheets = Vec::new();

  for name in source.sheet_names() {
    if name == MEASUREMENTS_SHEET {
      anyhow::bail!("template already has a {MEASUREMENTS_SHEET:?} sheet");
    }

    let range = source.worksheet_range(&name).with_context(|| format!("read sheet {name:?}"))?;
    let (row_offset, col_offset) = range.start().unwrap_or_default();

    let mut sheet = Worksheet::new();
    sheet.set_name(&name).with_context(|| format!("sheet name {name:?}"))?;

    for (row, col, data) in range.cells() {
      let row = row_offset + u32::try_from(row).context("row")?;
      let col = u16::try_from(col_offset as usize + col).context("col")?;

      sheet.write_data(row, col, data)?;
    }

    let formulas = source
      .worksheet_formula(&name)
      .with_context(|| format!("read formulas of {name:?}"))?;
    let (row_offset, col_offset) = formulas.start().unwrap_or_default();

    for (row, col, formula) in formulas.cells() {
      if formula.is_empty() {
        continue;
      }

      let row = row_offset + u32::try_from(row).context("row")?;
      let col = col_offset + u32::try_from(col).context("col")?;

      sheet.write_copied_formula(row, u16::try_from(col).context("col")?, formula, range.get_value((row, col)))?;
    }

    let (height, width) = range.get_size();
    debug!(sheet = %name, height, width, "copied sheet");
    sheets.push(sheet);
  }

  Ok(sheets)
}

/// Builds the measurements sheet: bold function names along row 0, bold
/// target names down column 0, timings in between. Row 0 and column 0 stay
/// frozen while scrolling.
fn measurements_sheet(grid: &Grid) -> Result<Worksheet> {
  let bold = Format::new().set_bold();

  let mut sheet = Worksheet::new();
  sheet.set_name(MEASUREMENTS_SHEET).context("set name")?;
  sheet.set_active(true);
  sheet.set_freeze_panes(1, 1).context("freeze panes")?;

  for (col, function) in grid.header.iter().enumerate() {
    sheet.write_text(0, col + 1, function, Some(&bold))?;
  }

  for (index, row) in grid.rows.iter().enumerate() {
    let row_num = u32::try_from(index + 1).context("row")?;

    sheet.write_text(row_num, 0, &row.target, Some(&bold))?;

    for (col, cell) in row.cells.iter().enumerate() {
      if let Some(timing) = cell {
        sheet.write_text(row_num, col + 1, timing, None)?;
      }
    }
  }

  Ok(sheet)
}
