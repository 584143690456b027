//! Identity error model.

use deferid_guards::ContractError;
use thiserror::Error;

/// Result type used across the identity core.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Failures of the resolution protocol.
///
/// All of them are caller errors surfaced synchronously at the call site; the
/// core never retries or swallows them. `kind` is the entity kind
/// ([`crate::Identified::KIND`]) the failing call was made on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The candidate id failed the id type's guard or the entity's own hook.
    #[error("{kind} ID value rejected: {source}")]
    InvalidIdentityValue {
        kind: &'static str,
        #[source]
        source: ContractError,
    },

    /// `resolve` was called on an entity that already has its canonical id.
    #[error("{kind} already has ID '{existing}' - cannot reassign")]
    AlreadyResolved { kind: &'static str, existing: String },

    /// The canonical id was read before it was assigned.
    #[error("{kind} ID is not yet assigned")]
    UnresolvedIdentity { kind: &'static str },
}

impl IdentityError {
    pub fn invalid_value(kind: &'static str, source: ContractError) -> Self {
        Self::InvalidIdentityValue { kind, source }
    }

    pub fn already_resolved(kind: &'static str, existing: impl Into<String>) -> Self {
        Self::AlreadyResolved {
            kind,
            existing: existing.into(),
        }
    }

    pub fn unresolved(kind: &'static str) -> Self {
        Self::UnresolvedIdentity { kind }
    }

    pub fn is_invalid_value(&self) -> bool {
        matches!(self, IdentityError::InvalidIdentityValue { .. })
    }

    pub fn is_already_resolved(&self) -> bool {
        matches!(self, IdentityError::AlreadyResolved { .. })
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, IdentityError::UnresolvedIdentity { .. })
    }

    /// Entity kind the error was raised for.
    pub fn kind(&self) -> &'static str {
        match self {
            IdentityError::InvalidIdentityValue { kind, .. }
            | IdentityError::AlreadyResolved { kind, .. }
            | IdentityError::UnresolvedIdentity { kind } => kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_name_the_entity_kind() {
        assert_eq!(
            IdentityError::unresolved("Trade").to_string(),
            "Trade ID is not yet assigned"
        );
        assert_eq!(
            IdentityError::already_resolved("Trade", "TR-001").to_string(),
            "Trade already has ID 'TR-001' - cannot reassign"
        );
    }

    #[test]
    fn invalid_value_keeps_the_guard_failure_as_source() {
        let err = IdentityError::invalid_value(
            "Person",
            ContractError::new("ID must start with 'PER-'"),
        );
        assert_eq!(err.kind(), "Person");
        assert!(err.is_invalid_value());
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("ID must start with 'PER-'")
        );
    }
}
