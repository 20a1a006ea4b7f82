//! Sample ingest: turning user text into a validated `SampleSet`.
//!
//! Both input paths (manual form fields and uploaded files) end up here:
//! - manual entry supplies two comma-separated lists directly
//! - uploads are first reduced to text by a `SampleReader`, then the first two
//!   non-blank lines are taken as the x and y lists

use crate::domain::SampleSet;
use crate::error::AppError;
use crate::io::reader::reader_for_content_type;

/// Parse a comma-separated list of numbers.
///
/// Whitespace around tokens is ignored; an empty token (e.g. `1,,2`) is an error.
pub fn parse_number_list(text: &str) -> Result<Vec<f64>, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::invalid("Expected a comma-separated list of numbers, got nothing."));
    }

    text.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| AppError::invalid(format!("Could not parse '{token}' as a number.")))
        })
        .collect()
}

/// Build samples from the manual-entry form fields.
pub fn parse_manual(x_values: &str, y_values: &str) -> Result<SampleSet, AppError> {
    let xs = parse_number_list(x_values)?;
    let ys = parse_number_list(y_values)?;
    SampleSet::new(xs, ys)
}

/// Take the first two non-blank lines of `content` as x and y lists.
pub fn parse_two_lines(content: &str) -> Result<SampleSet, AppError> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let (Some(x_line), Some(y_line)) = (lines.next(), lines.next()) else {
        return Err(AppError::invalid(
            "The file must contain two non-empty lines: x-values, then y-values.",
        ));
    };

    let xs = parse_number_list(x_line)?;
    let ys = parse_number_list(y_line)?;
    SampleSet::new(xs, ys)
}

/// Decode an uploaded file according to its declared content type.
pub fn read_samples(content_type: &str, bytes: &[u8]) -> Result<SampleSet, AppError> {
    let reader = reader_for_content_type(content_type)?;
    let content = reader.read(bytes)?;
    parse_two_lines(&content)
}
