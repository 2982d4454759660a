//! CSV curve ingest.
//!
//! Expected schema: a header row with a tenor column (`tenor` or `maturity`)
//! and a rate column (`rate` or `yield`); other columns are ignored. Tenors
//! may be labels (`3M`, `7Y`) or plain years.
//!
//! Unlike a bond list, a curve is small and every point matters, so any bad
//! row fails the whole file with its line number. Rows are sorted by tenor
//! before the curve is built; duplicate tenors are still rejected.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Curve, CurvePoint, parse_tenor};
use crate::error::AppError;

const TENOR_COLUMNS: [&str; 2] = ["tenor", "maturity"];
const RATE_COLUMNS: [&str; 2] = ["rate", "yield"];

/// Read a curve from a CSV file.
pub fn read_curve_csv(path: &Path) -> Result<Curve, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_curve_csv(file)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))
}

/// Parse a curve from any CSV reader.
pub fn parse_curve_csv<R: Read>(input: R) -> Result<Curve, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let tenor_idx = find_column(&header_map, &TENOR_COLUMNS)?;
    let rate_idx = find_column(&header_map, &RATE_COLUMNS)?;

    let mut points = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("line {line}: CSV parse error: {e}")))?;
        if record.iter().all(str::is_empty) {
            continue;
        }

        let tenor_raw = get_required(&record, tenor_idx, "tenor")
            .map_err(|e| AppError::new(2, format!("line {line}: {e}")))?;
        let rate_raw = get_required(&record, rate_idx, "rate")
            .map_err(|e| AppError::new(2, format!("line {line}: {e}")))?;

        let tenor = parse_tenor(tenor_raw).map_err(|e| AppError::new(2, format!("line {line}: {e}")))?;
        let rate = rate_raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::new(2, format!("line {line}: invalid rate '{rate_raw}'")))?;

        points.push(CurvePoint::new(tenor, rate));
    }

    if points.is_empty() {
        return Err(AppError::new(3, "CSV contains no curve points."));
    }

    points.sort_by(|a, b| a.tenor.total_cmp(&b.tenor));
    Ok(Curve::new(points)?)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports may prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| {
            AppError::new(
                2,
                format!("Missing required column: one of `{}`", names.join("`, `")),
            )
        })
}

fn get_required<'a>(record: &'a StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}
