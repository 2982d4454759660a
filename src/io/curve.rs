//! Read/write curve JSON files.
//!
//! Curve JSON is the portable representation of a curve:
//! - the points themselves
//! - optional run metadata (as-of date, pivot, the parameters that produced it)
//!
//! The schema is defined by `domain::CurveFile`.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{Curve, CurveFile, DistortionParameters, Reversal};
use crate::error::AppError;
use crate::io::ingest::read_curve_csv;

const TOOL: &str = "pivot";

/// Write a curve JSON file.
pub fn write_curve_json(
    path: &Path,
    curve: &Curve,
    pivot: Option<f64>,
    params: Option<&DistortionParameters>,
    asof_date: Option<NaiveDate>,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let doc = CurveFile {
        tool: TOOL.to_string(),
        asof_date,
        pivot,
        params: params.copied(),
        points: curve.clone(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write curve JSON: {e}")))?;

    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<CurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: CurveFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Failed to parse curve JSON '{}': {e}", path.display())))?;
    Ok(curve)
}

/// Load a curve from either a `.json` curve file or a CSV file.
pub fn load_curve(path: &Path) -> Result<Curve, AppError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(read_curve_json(path)?.points)
    } else {
        read_curve_csv(path)
    }
}

/// Write reversal results (recovered parameters + diagnostics) as JSON.
pub fn write_reversal_json(path: &Path, reversal: &Reversal) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create params JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, reversal)
        .map_err(|e| AppError::new(2, format!("Failed to write params JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("pivot-curves-{}-{name}", std::process::id()))
    }

    #[test]
    fn curve_json_round_trips_metadata() {
        let path = temp_path("curve.json");
        let curve = Curve::from_pairs(&[(1.0, 0.02), (5.0, 0.03)]).unwrap();
        let params = DistortionParameters::new(0.001, 0.002).with_long_cap(0.0015);
        let asof = NaiveDate::from_ymd_opt(2025, 6, 30);

        write_curve_json(&path, &curve, Some(5.0), Some(&params), asof).unwrap();
        let back = read_curve_json(&path).unwrap();
        assert_eq!(back.tool, "pivot");
        assert_eq!(back.points, curve);
        assert_eq!(back.pivot, Some(5.0));
        assert_eq!(back.params, Some(params));
        assert_eq!(back.asof_date, asof);

        assert_eq!(load_curve(&path).unwrap(), curve);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_curve_reads_csv_by_default() {
        let path = temp_path("curve.csv");
        std::fs::write(&path, "tenor,rate\n6M,0.031\n2Y,0.034\n").unwrap();
        let curve = load_curve(&path).unwrap();
        assert_eq!(curve.len(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn invalid_json_curve_is_rejected() {
        let path = temp_path("bad.json");
        std::fs::write(
            &path,
            r#"{"tool":"pivot","points":[{"tenor":2.0,"rate":0.03},{"tenor":1.0,"rate":0.02}]}"#,
        )
        .unwrap();
        let err = load_curve(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        std::fs::remove_file(&path).ok();
    }
}
