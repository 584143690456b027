//! `deferid-guards` — precondition helpers for arguments and values.
//!
//! Every guard returns `Ok` when its contract holds and a [`ContractError`]
//! otherwise. Guards never panic.

pub mod error;
pub mod guards;
pub mod paths;
pub mod strings;

pub use error::{ContractError, GuardResult};
pub use guards::{ensure, ensure_false, ensure_in, ensure_positive, ensure_some, ensure_true};
pub use paths::ensure_usable_path;
pub use strings::{
    ensure_str_exact_length, ensure_str_is_valued, ensure_str_length_between,
    ensure_str_max_length, ensure_str_min_length,
};
