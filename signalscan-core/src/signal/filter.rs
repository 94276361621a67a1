//! Confirmatory filters shared by the detectors.
//!
//! Filters run only after a crossing was found, on the current row.

use crate::error::ScanError;
use crate::frame::IndicatorFrame;

/// Close at `row` is at or above the named line (year line, half-year line).
pub fn close_at_or_above(
    frame: &IndicatorFrame,
    row: usize,
    line: &str,
) -> Result<bool, ScanError> {
    let close = frame
        .point(row)
        .map(|p| p.close)
        .ok_or_else(|| ScanError::InvalidInput(format!("row {row} out of range")))?;
    Ok(close >= frame.value(line, row)?)
}

/// The named column reached zero or above somewhere in the `window - 1`
/// rows ending just before `current`, the current row excluded.
///
/// With `window = 30` this inspects rows `current-29 ..= current-1`.
/// A range without a single defined value is `InvalidInput`.
pub fn held_non_negative(
    frame: &IndicatorFrame,
    column: &str,
    current: usize,
    window: usize,
) -> Result<bool, ScanError> {
    let end = current;
    let start = (current + 1).saturating_sub(window);
    frame
        .trailing_max(column, start..end)
        .map(|max| max >= 0.0)
        .ok_or_else(|| {
            ScanError::InvalidInput(format!(
                "no defined {column} value in rows {start}..{end}"
            ))
        })
}
