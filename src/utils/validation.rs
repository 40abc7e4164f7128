//! Input validation and argument list construction
//!
//! Turns command line range expressions into bisection argument lists and
//! checks the basic preconditions of a search before any probe runs.

use crate::error::{BisectError, UtilsError};

/// Upper bound on generated argument lists.
pub const MAX_ARGUMENTS: usize = 10_000_000;

/// Parse `start..end[:step]` into the values of a half-open range.
///
/// Follows the semantics of a stepped range: `end` is excluded and the step
/// may be negative. Without an explicit step the range counts up when
/// `start <= end` and down otherwise.
///
/// # Examples
/// ```
/// use toolbelt::utils::validation::parse_range;
///
/// assert_eq!(parse_range("0..4").unwrap(), vec![0, 1, 2, 3]);
/// assert_eq!(parse_range("1500..100:-500").unwrap(), vec![1500, 1000, 500]);
/// assert_eq!(parse_range("3..0").unwrap(), vec![3, 2, 1]);
/// ```
pub fn parse_range(expression: &str) -> crate::Result<Vec<i64>> {
    let invalid = |reason: &str| UtilsError::Parse {
        input: expression.to_string(),
        reason: reason.to_string(),
    };

    let (bounds, step) = match expression.split_once(':') {
        Some((bounds, step)) => (bounds, Some(step)),
        None => (expression, None),
    };
    let (start, end) = bounds
        .split_once("..")
        .ok_or_else(|| invalid("expected START..END[:STEP]"))?;

    let start: i64 = start
        .trim()
        .parse()
        .map_err(|_| invalid("START is not an integer"))?;
    let end: i64 = end
        .trim()
        .parse()
        .map_err(|_| invalid("END is not an integer"))?;
    let step: i64 = match step {
        Some(step) => step
            .trim()
            .parse()
            .map_err(|_| invalid("STEP is not an integer"))?,
        None if start <= end => 1,
        None => -1,
    };

    if step == 0 {
        return Err(invalid("STEP must not be zero").into());
    }

    let count = if (step > 0 && start < end) || (step < 0 && start > end) {
        let distance = (end as i128 - start as i128).abs();
        let step_size = (step as i128).abs();
        ((distance + step_size - 1) / step_size) as u128
    } else {
        0
    };

    if count > MAX_ARGUMENTS as u128 {
        return Err(UtilsError::Validation {
            message: format!(
                "Range '{}' yields {} values (maximum {})",
                expression, count, MAX_ARGUMENTS
            ),
        }
        .into());
    }

    Ok((0..count as i64).map(|i| start + i * step).collect())
}

/// A bisection needs both extremities to be distinct positions. Checked
/// before a search is handed to a worker thread.
pub fn validate_argument_count(count: usize) -> crate::Result<()> {
    if count < 2 {
        return Err(BisectError::TooFewArguments { len: count }.into());
    }
    Ok(())
}

/// Tuple separators must be a single visible character.
pub fn validate_separator(separator: char) -> crate::Result<()> {
    if separator.is_whitespace() || separator.is_control() {
        return Err(UtilsError::Validation {
            message: format!("Separator {:?} must be a visible character", separator),
        }
        .into());
    }
    Ok(())
}
