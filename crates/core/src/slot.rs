//! Per-entity identity state: surrogate key plus the one-shot canonical id.

use std::sync::OnceLock;

use deferid_guards::GuardResult;
use serde::{Deserialize, Serialize};

use crate::canonical::CanonicalId;
use crate::error::{IdentityError, IdentityResult};
use crate::surrogate::{KeyAllocator, SurrogateKey};

/// Whether the canonical id has been assigned yet.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionState {
    Unresolved,
    Resolved,
}

/// Identity state owned by exactly one entity.
///
/// The canonical id lives in a `OnceLock`: the unresolved/resolved tag and the
/// value are written by a single compare-and-set, so concurrent `resolve`
/// calls have exactly one winner and a reader that sees the slot resolved also
/// sees the complete value. The slot is deliberately not `Clone`; a copy would
/// share the surrogate key and compare equal to the original.
pub struct IdentitySlot<T> {
    kind: &'static str,
    surrogate: SurrogateKey,
    canonical: OnceLock<T>,
}

impl<T> IdentitySlot<T> {
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn surrogate(&self) -> SurrogateKey {
        self.surrogate
    }
}

impl<T: CanonicalId> IdentitySlot<T> {
    pub(crate) fn new(kind: &'static str, surrogate: SurrogateKey) -> Self {
        Self {
            kind,
            surrogate,
            canonical: OnceLock::new(),
        }
    }

    /// New unresolved slot stamped with the allocator's next key.
    pub fn allocate<A>(kind: &'static str, allocator: &A) -> Self
    where
        A: KeyAllocator + ?Sized,
    {
        Self::new(kind, allocator.next_key())
    }

    pub fn state(&self) -> ResolutionState {
        if self.is_resolved() {
            ResolutionState::Resolved
        } else {
            ResolutionState::Unresolved
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.canonical.get().is_some()
    }

    /// The canonical id, if assigned.
    pub fn get(&self) -> Option<&T> {
        self.canonical.get()
    }

    pub fn canonical_id(&self) -> IdentityResult<&T> {
        self.canonical
            .get()
            .ok_or_else(|| IdentityError::unresolved(self.kind))
    }

    /// Resolve using only the id type's own guard.
    pub fn resolve(&self, value: T) -> IdentityResult<()> {
        self.resolve_with(value, |_| Ok(()))
    }

    /// Assign the canonical id once.
    ///
    /// Order of checks: already resolved, then `T::validate`, then `extra`,
    /// then the atomic transition. Validation runs outside the transition; a
    /// concurrent winner between validation and the write still turns this
    /// call into `AlreadyResolved`.
    pub fn resolve_with<F>(&self, value: T, extra: F) -> IdentityResult<()>
    where
        F: FnOnce(&T) -> GuardResult<()>,
    {
        if let Some(existing) = self.canonical.get() {
            return Err(IdentityError::already_resolved(self.kind, existing.to_string()));
        }

        value
            .validate()
            .and_then(|()| extra(&value))
            .map_err(|source| IdentityError::invalid_value(self.kind, source))?;

        self.canonical.set(value).map_err(|_rejected| {
            let existing = self
                .canonical
                .get()
                .map(ToString::to_string)
                .unwrap_or_default();
            IdentityError::already_resolved(self.kind, existing)
        })
    }

    /// Point-in-time view of the slot for reporting.
    pub fn snapshot(&self) -> IdentitySnapshot<T> {
        let canonical_id = self.canonical.get().cloned();
        IdentitySnapshot {
            kind: self.kind.to_string(),
            surrogate: self.surrogate,
            state: if canonical_id.is_some() {
                ResolutionState::Resolved
            } else {
                ResolutionState::Unresolved
            },
            canonical_id,
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for IdentitySlot<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentitySlot")
            .field("kind", &self.kind)
            .field("surrogate", &self.surrogate)
            .field("canonical_id", &self.canonical.get())
            .finish()
    }
}

/// Serializable view of an entity's identity at one instant.
///
/// `state` and `canonical_id` are taken from the same read, so a snapshot
/// never reports `resolved` without an id. Snapshots are write-only: a
/// surrogate key cannot be rebuilt from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentitySnapshot<T> {
    pub kind: String,
    pub surrogate: SurrogateKey,
    pub state: ResolutionState,
    pub canonical_id: Option<T>,
}
