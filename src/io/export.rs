//! Export segment series to CSV.
//!
//! Wide layout, one row per category and one column per year, so the file
//! opens cleanly in a spreadsheet.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::Series;
use crate::error::AppError;

/// Write `series` as `name,<year>,<year>,...` rows.
pub fn write_series_csv(path: &Path, series: &[Series], years: &[i32]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series(&mut file, series, years)
        .map_err(|e| AppError::usage(format!("Failed to write export CSV: {e}")))
}

fn write_series<W: Write>(out: &mut W, series: &[Series], years: &[i32]) -> std::io::Result<()> {
    let mut header = String::from("name");
    for y in years {
        header.push_str(&format!(",{y}"));
    }
    writeln!(out, "{header}")?;

    for s in series {
        let mut line = csv_field(&s.name);
        for &y in years {
            line.push_str(&format!(",{:.4}", s.value_at(y)));
        }
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearPoint;

    #[test]
    fn wide_layout_with_quoted_names() {
        let series = vec![
            Series::new("Seating", vec![YearPoint { year: 2024, value: 12.5 }]),
            Series::new("Lavatory, Galley", vec![YearPoint { year: 2025, value: 3.0 }]),
        ];
        let mut buf = Vec::new();
        write_series(&mut buf, &series, &[2024, 2025]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "name,2024,2025\nSeating,12.5000,0.0000\n\"Lavatory, Galley\",0.0000,3.0000\n"
        );
    }
}
