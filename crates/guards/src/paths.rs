//! Filesystem path guards.

use std::path::Path;

use crate::error::{described, fail, subject, ContractError, GuardResult};

/// Require a path that is not empty or only whitespace.
///
/// Accepts anything path-like (`&str`, `String`, `PathBuf`, `OsStr`) and
/// hands the borrowed [`Path`] back. Nothing is checked on disk.
pub fn ensure_usable_path<'a, P>(candidate: &'a P, description: &str) -> GuardResult<&'a Path>
where
    P: AsRef<Path> + ?Sized,
{
    let path = candidate.as_ref();
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return fail(
            ContractError::new(format!("{} cannot be an empty path", subject(description)))
                .with("Description", described(description))
                .with("Received", "Empty Path"),
        );
    }
    Ok(path)
}
