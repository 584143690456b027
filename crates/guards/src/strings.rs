//! String guards. Lengths are counted in `char`s.

use crate::error::{described, fail, subject, ContractError, GuardResult};

/// Longest rendering of a rejected value kept in the failure context.
const VALUE_PREVIEW_LIMIT: usize = 100;

/// Require a non-empty string that is not only whitespace.
pub fn ensure_str_is_valued<'a>(candidate: &'a str, description: &str) -> GuardResult<&'a str> {
    if candidate.trim().is_empty() {
        return fail(
            ContractError::new(format!("{} cannot be an empty string", subject(description)))
                .with("Description", described(description))
                .with("Received", "Empty String"),
        );
    }
    Ok(candidate)
}

pub fn ensure_str_exact_length<'a>(
    candidate: &'a str,
    exact_length: usize,
    description: &str,
) -> GuardResult<&'a str> {
    let actual = candidate.chars().count();
    if actual != exact_length {
        return fail(
            length_error(
                format!(
                    "{} must have an exact length of {exact_length}",
                    subject(description)
                ),
                candidate,
                actual,
                description,
            )
            .with("Expected_length", exact_length),
        );
    }
    Ok(candidate)
}

pub fn ensure_str_min_length<'a>(
    candidate: &'a str,
    min_length: usize,
    description: &str,
) -> GuardResult<&'a str> {
    check_bounds(candidate, Some(min_length), None, description)
}

pub fn ensure_str_max_length<'a>(
    candidate: &'a str,
    max_length: usize,
    description: &str,
) -> GuardResult<&'a str> {
    check_bounds(candidate, None, Some(max_length), description)
}

pub fn ensure_str_length_between<'a>(
    candidate: &'a str,
    min_length: usize,
    max_length: usize,
    description: &str,
) -> GuardResult<&'a str> {
    check_bounds(candidate, Some(min_length), Some(max_length), description)
}

fn check_bounds<'a>(
    candidate: &'a str,
    min_length: Option<usize>,
    max_length: Option<usize>,
    description: &str,
) -> GuardResult<&'a str> {
    let actual = candidate.chars().count();

    if let Some(min) = min_length.filter(|min| actual < *min) {
        return fail(
            length_error(
                format!("{} must have a minimum length of {min}", subject(description)),
                candidate,
                actual,
                description,
            )
            .with("Min_length", min),
        );
    }

    if let Some(max) = max_length.filter(|max| actual > *max) {
        return fail(
            length_error(
                format!("{} must have a maximum length of {max}", subject(description)),
                candidate,
                actual,
                description,
            )
            .with("Max_length", max),
        );
    }

    Ok(candidate)
}

fn length_error(message: String, candidate: &str, actual: usize, description: &str) -> ContractError {
    let preview: String = format!("{candidate:?}").chars().take(VALUE_PREVIEW_LIMIT).collect();
    ContractError::new(message)
        .with("Description", described(description))
        .with("Actual_length", actual)
        .with("Value", preview)
}
