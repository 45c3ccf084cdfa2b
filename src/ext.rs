use anyhow::{Context, Result};
use calamine::{Data, ExcelDateTime};
use rust_xlsxwriter::{Format, Formula, Worksheet};

/// Number format for a date cell copied as its serial number, so it still
/// reads as a date.
fn date_format(dt: &ExcelDateTime) -> Format {
  let num_format = if dt.is_duration() {
    "[h]:mm:ss"
  } else if dt.as_f64().fract() == 0.0 {
    "yyyy-mm-dd"
  } else {
    "yyyy-mm-dd hh:mm:ss"
  };

  Format::new().set_num_format(num_format)
}

#[extend::ext(name = StrExt)]
pub impl str {
  /// Drops the last `n` characters. Strings shorter than `n` become empty.
  fn drop_last_chars(&self, n: usize) -> &str {
    if n == 0 {
      return self;
    }

    match self.char_indices().rev().nth(n - 1) {
      Some((end, _)) => &self[..end],
      None => "",
    }
  }
}

#[extend::ext(name = WorksheetExt)]
pub impl Worksheet {
  /// Writes a cell read from another workbook. Empty cells are left untouched.
  fn write_data(&mut self, row: u32, col: u16, data: &Data) -> Result<()> {
    match data {
      Data::Empty => return Ok(()),
      Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => self.write_string(row, col, s),
      Data::Float(f) => self.write_number(row, col, *f),
      Data::Int(i) => self.write_number(row, col, *i as f64),
      Data::Bool(b) => self.write_boolean(row, col, *b),
      Data::DateTime(dt) => self.write_number_with_format(row, col, dt.as_f64(), &date_format(dt)),
      Data::Error(e) => self.write_string(row, col, e.to_string()),
    }
    .with_context(|| format!("write cell ({row}, {col})"))?;

    Ok(())
  }

  /// Writes a formula read from another workbook, keeping its cached value as
  /// the result shown until the sheet is recalculated.
  fn write_copied_formula(&mut self, row: u32, col: u16, formula: &str, cached: Option<&Data>) -> Result<()> {
    let mut formula = Formula::new(formula);
    if let Some(cached) = cached.filter(|data| !matches!(data, Data::Empty)) {
      formula = formula.set_result(cached.to_string());
    }

    self
      .write_formula(row, col, formula)
      .with_context(|| format!("write formula ({row}, {col})"))?;

    Ok(())
  }

  /// Writes `text` at `(row, col)`, with `format` if one is given.
  fn write_text(&mut self, row: u32, col: usize, text: &str, format: Option<&Format>) -> Result<()> {
    let col = u16::try_from(col).with_context(|| format!("column {col} out of range"))?;

    match format {
      Some(format) => self.write_string_with_format(row, col, text, format),
      None => self.write_string(row, col, text),
    }
    .with_context(|| format!("write cell ({row}, {col})"))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::StrExt;

  #[test]
  fn drops_fixed_suffix() {
    assert_eq!("sinf.so".drop_last_chars(3), "sinf");
    assert_eq!("cos()".drop_last_chars(3), "co");
  }

  #[test]
  fn short_strings_become_empty() {
    assert_eq!("abc".drop_last_chars(3), "");
    assert_eq!("ab".drop_last_chars(3), "");
    assert_eq!("".drop_last_chars(3), "");
  }

  #[test]
  fn counts_characters_not_bytes() {
    assert_eq!("λογ_()".drop_last_chars(3), "λογ");
  }

  #[test]
  fn zero_keeps_everything() {
    assert_eq!("exp".drop_last_chars(0), "exp");
  }
}
