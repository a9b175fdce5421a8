//! Interpretation of raw CSV cells.

/// Markers treated as a missing value, compared case-insensitively.
const MISSING_MARKERS: [&str; 7] = ["", "na", "n/a", "nan", "null", "none", "#n/a"];

/// Outcome of reading one numeric cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Cell {
    Missing,
    Number(f64),
    Invalid,
}

pub(crate) fn is_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

/// Parse a numeric cell.
///
/// Boolean spellings map to `1.0` and `0.0`; non-finite numbers are missing.
pub(crate) fn parse_number(raw: &str) -> Cell {
    if is_missing(raw) {
        return Cell::Missing;
    }
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return Cell::Number(1.0);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Cell::Number(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Number(value),
        Ok(_) => Cell::Missing,
        Err(_) => Cell::Invalid,
    }
}

/// Return the cell as text unless it is a missing marker.
pub(crate) fn parse_text(raw: &str) -> Option<String> {
    (!is_missing(raw)).then(|| raw.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", Cell::Missing)]
    #[case("NA", Cell::Missing)]
    #[case(" NaN ", Cell::Missing)]
    #[case("null", Cell::Missing)]
    #[case("inf", Cell::Missing)]
    #[case("0.75", Cell::Number(0.75))]
    #[case("-3", Cell::Number(-3.0))]
    #[case("True", Cell::Number(1.0))]
    #[case("false", Cell::Number(0.0))]
    #[case("high", Cell::Invalid)]
    fn numeric_cells(#[case] raw: &str, #[case] expected: Cell) {
        assert_eq!(parse_number(raw), expected);
    }

    #[rstest]
    #[case("  Arabic ", Some("Arabic"))]
    #[case("N/A", None)]
    #[case("", None)]
    fn text_cells(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(parse_text(raw).as_deref(), expected);
    }
}
