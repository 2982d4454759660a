//! Export a baseline/distorted comparison to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Curve, format_tenor};
use crate::error::AppError;

/// Write `tenor_years,tenor,base,distorted,distortion` rows to `out`.
pub fn write_comparison<W: Write>(out: &mut W, base: &Curve, distorted: &Curve) -> Result<(), AppError> {
    if !base.same_tenors(distorted) {
        return Err(AppError::new(2, "Cannot export curves with different tenors."));
    }

    writeln!(out, "tenor_years,tenor,base,distorted,distortion")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for (b, d) in base.points().iter().zip(distorted.points()) {
        writeln!(
            out,
            "{:.10},{},{:.10},{:.10},{:.10}",
            b.tenor,
            format_tenor(b.tenor),
            b.rate,
            d.rate,
            d.rate - b.rate,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write a comparison CSV file.
pub fn write_comparison_csv(path: &Path, base: &Curve, distorted: &Curve) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_comparison(&mut file, base, distorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_one_row_per_tenor() {
        let base = Curve::from_pairs(&[(0.25, 0.03), (2.0, 0.034)]).unwrap();
        let dist = Curve::from_pairs(&[(0.25, 0.0335), (2.0, 0.034)]).unwrap();
        let mut buf = Vec::new();
        write_comparison(&mut buf, &base, &dist).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "tenor_years,tenor,base,distorted,distortion");
        assert!(lines[1].starts_with("0.2500000000,3M,0.0300000000,0.0335000000,0.0035000000"));
        assert!(lines[2].ends_with(",0.0000000000"));
    }

    #[test]
    fn refuses_mismatched_tenors() {
        let base = Curve::from_pairs(&[(1.0, 0.03)]).unwrap();
        let other = Curve::from_pairs(&[(2.0, 0.03)]).unwrap();
        assert!(write_comparison(&mut Vec::new(), &base, &other).is_err());
    }
}
