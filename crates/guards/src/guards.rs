//! Boolean, option, membership, and numeric guards.

use core::cmp::Ordering;
use core::fmt::{Debug, Display};

use crate::error::{described, fail, subject, ContractError, GuardResult};

/// Maximum number of allowed choices rendered into an `ensure_in` failure.
const CHOICE_PREVIEW_LIMIT: usize = 20;

/// Fail with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> GuardResult<()> {
    if condition {
        Ok(())
    } else {
        fail(ContractError::new(message))
    }
}

pub fn ensure_true(condition: bool, description: &str) -> GuardResult<()> {
    ensure_bool(condition, true, description)
}

pub fn ensure_false(condition: bool, description: &str) -> GuardResult<()> {
    ensure_bool(condition, false, description)
}

fn ensure_bool(condition: bool, expected: bool, description: &str) -> GuardResult<()> {
    if condition == expected {
        return Ok(());
    }
    let message = if description.is_empty() {
        format!("Condition must be {expected}")
    } else {
        format!("Assertion failed: {description}")
    };
    fail(ContractError::new(message).with("Received", condition))
}

/// Unwrap `candidate`, failing when it is `None`.
pub fn ensure_some<T>(candidate: Option<T>, description: &str) -> GuardResult<T> {
    match candidate {
        Some(value) => Ok(value),
        None => fail(
            ContractError::new(format!("{} cannot be None", subject(description)))
                .with("Description", described(description))
                .with("Received", "None"),
        ),
    }
}

/// Require `candidate` to be one of `choices`.
pub fn ensure_in<T>(candidate: &T, choices: &[T], description: &str) -> GuardResult<()>
where
    T: PartialEq + Debug,
{
    if choices.contains(candidate) {
        return Ok(());
    }

    let mut preview = choices
        .iter()
        .take(CHOICE_PREVIEW_LIMIT)
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    if choices.len() > CHOICE_PREVIEW_LIMIT {
        preview.push_str(", ...");
    }
    if preview.is_empty() {
        preview.push_str("(empty)");
    }

    fail(
        ContractError::new(format!(
            "{} must be one of the allowed choices",
            subject(description)
        ))
        .with("Description", described(description))
        .with("Received", format!("{candidate:?}"))
        .with("Allowed_sample", preview),
    )
}

/// Require `candidate > 0` (or `>= 0` with `allow_zero`).
///
/// Values that do not compare against zero at all (a NaN float) are rejected
/// as non-numbers.
pub fn ensure_positive<N>(candidate: N, description: &str, allow_zero: bool) -> GuardResult<N>
where
    N: PartialOrd + Default + Display + Copy,
{
    let subject = subject(description);
    let zero = N::default();

    let message = match candidate.partial_cmp(&zero) {
        Some(Ordering::Greater) => return Ok(candidate),
        Some(Ordering::Equal) if allow_zero => return Ok(candidate),
        Some(Ordering::Equal) => format!("{subject} must be positive (greater than zero)"),
        Some(Ordering::Less) => format!("{subject} must be positive"),
        None => format!("{subject} must be a number"),
    };

    fail(
        ContractError::new(message)
            .with("Description", described(description))
            .with("Received", candidate),
    )
}
