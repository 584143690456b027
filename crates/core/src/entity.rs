//! Entity base: identity that can be resolved after construction.

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use std::any::Any;
use std::sync::Arc;

use deferid_guards::GuardResult;

use crate::canonical::CanonicalId;
use crate::equivalence::{Equivalence, MigrationRegistry};
use crate::error::IdentityResult;
use crate::slot::{IdentitySlot, IdentitySnapshot, ResolutionState};
use crate::surrogate::{KeyAllocator, SurrogateKey, SurrogateKeyAllocator};

/// Implemented by payload types that can be wrapped in an [`IdentityEntity`].
///
/// A payload generic over its id type implements this once for every `T`,
/// which is how a single domain type can carry string ids in a legacy system
/// and integer or UUID ids in its replacement.
pub trait Identified<T: CanonicalId> {
    /// Name used in error messages and `Debug` output.
    const KIND: &'static str;

    /// Domain-specific validation, run after `T`'s own guard.
    fn validate_id(&self, _id: &T) -> GuardResult<()> {
        Ok(())
    }
}

/// A payload plus its deferred identity.
///
/// `==` and `Hash` use the surrogate key only: an entity equals itself and
/// nothing else, before and after resolution, whatever its payload holds.
/// `Ord` is creation order (also surrogate-only), so ordered collections stay
/// valid across resolution too. Use [`same_identity_as`](Self::same_identity_as)
/// to ask whether two entities represent the same external record and
/// [`cmp_by_identity`](Self::cmp_by_identity) for a report-friendly order.
pub struct IdentityEntity<P, T> {
    slot: IdentitySlot<T>,
    migrations: Option<Arc<MigrationRegistry>>,
    payload: P,
}

impl<P, T> IdentityEntity<P, T>
where
    P: Identified<T>,
    T: CanonicalId,
{
    /// Unresolved entity stamped from the process-wide allocator.
    pub fn new(payload: P) -> Self {
        Self::with_allocator(payload, SurrogateKeyAllocator::global())
    }

    pub fn with_allocator<A>(payload: P, allocator: &A) -> Self
    where
        A: KeyAllocator + ?Sized,
    {
        Self {
            slot: IdentitySlot::allocate(P::KIND, allocator),
            migrations: None,
            payload,
        }
    }

    pub fn builder(payload: P) -> IdentityEntityBuilder<'static, P, T> {
        IdentityEntityBuilder {
            payload,
            allocator: SurrogateKeyAllocator::global(),
            migrations: None,
            _id: PhantomData,
        }
    }

    /// Assign the canonical id. Succeeds at most once per entity.
    ///
    /// # Errors
    ///
    /// `AlreadyResolved` if an id is already set (even an identical one),
    /// `InvalidIdentityValue` if `T`'s guard or [`Identified::validate_id`]
    /// rejects `value`.
    pub fn resolve(&self, value: T) -> IdentityResult<()> {
        self.slot
            .resolve_with(value, |id| self.payload.validate_id(id))
    }

    /// The canonical id, or `UnresolvedIdentity`.
    pub fn id(&self) -> IdentityResult<&T> {
        self.slot.canonical_id()
    }

    pub fn try_id(&self) -> Option<&T> {
        self.slot.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.is_resolved()
    }

    pub fn state(&self) -> ResolutionState {
        self.slot.state()
    }

    pub fn surrogate(&self) -> SurrogateKey {
        self.slot.surrogate()
    }

    pub fn kind(&self) -> &'static str {
        P::KIND
    }

    pub fn migrations(&self) -> Option<&MigrationRegistry> {
        self.migrations.as_deref()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Payload fields play no part in equality or hashing, so mutating them
    /// is always safe, including for entities stored in collections.
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    pub fn into_payload(self) -> P {
        self.payload
    }

    /// True iff both entities are resolved and their ids are equal, or are
    /// declared equivalent by a registered migration.
    ///
    /// Registries attached to either entity are consulted, and a relation in
    /// any of them that holds is enough, so the answer does not depend on
    /// which side is asked. Unresolved entities have no identity to compare
    /// and always yield false.
    pub fn same_identity_as<Q, U>(&self, other: &IdentityEntity<Q, U>) -> bool
    where
        U: CanonicalId,
    {
        let (Some(left), Some(right)) = (self.slot.get(), other.slot.get()) else {
            return false;
        };

        let plainly_equal = (right as &dyn Any)
            .downcast_ref::<T>()
            .is_some_and(|right| right == left);
        if plainly_equal {
            return true;
        }

        [self.migrations(), other.migrations.as_deref()]
            .into_iter()
            .flatten()
            .any(|registry| registry.equivalent(left, right) == Some(true))
    }

    /// Like [`same_identity_as`](Self::same_identity_as) with an explicit
    /// relation in place of equality and the registries.
    pub fn same_identity_under<Q, U, E>(&self, other: &IdentityEntity<Q, U>, relation: &E) -> bool
    where
        U: CanonicalId,
        E: Equivalence<T, U> + ?Sized,
    {
        match (self.slot.get(), other.slot.get()) {
            (Some(left), Some(right)) => relation.equivalent(left, right),
            _ => false,
        }
    }

    /// Deterministic order for reporting: unresolved entities first in
    /// creation order, then resolved ones by canonical id. Entities sharing a
    /// canonical id fall back to creation order, so only an entity compares
    /// `Equal` to itself.
    ///
    /// The result changes when an entity is resolved; do not use it to key an
    /// ordered collection that outlives resolution.
    pub fn cmp_by_identity<Q>(&self, other: &IdentityEntity<Q, T>) -> Ordering {
        let by_surrogate = self.slot.surrogate().cmp(&other.slot.surrogate());
        match (self.slot.get(), other.slot.get()) {
            (None, None) => by_surrogate,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(left), Some(right)) => left.cmp(right).then(by_surrogate),
        }
    }

    pub fn snapshot(&self) -> IdentitySnapshot<T> {
        self.slot.snapshot()
    }
}

/// Sort in [`IdentityEntity::cmp_by_identity`] order.
pub fn sort_by_identity<P, T>(entities: &mut [IdentityEntity<P, T>])
where
    P: Identified<T>,
    T: CanonicalId,
{
    entities.sort_by(|a, b| a.cmp_by_identity(b));
}

/// Construction options for [`IdentityEntity`].
pub struct IdentityEntityBuilder<'a, P, T> {
    payload: P,
    allocator: &'a dyn KeyAllocator,
    migrations: Option<Arc<MigrationRegistry>>,
    _id: PhantomData<fn() -> T>,
}

impl<'a, P, T> IdentityEntityBuilder<'a, P, T>
where
    P: Identified<T>,
    T: CanonicalId,
{
    /// Stamp the surrogate key from `allocator` instead of the global one.
    pub fn allocator<'b>(self, allocator: &'b dyn KeyAllocator) -> IdentityEntityBuilder<'b, P, T> {
        IdentityEntityBuilder {
            payload: self.payload,
            allocator,
            migrations: self.migrations,
            _id: PhantomData,
        }
    }

    pub fn migrations(mut self, registry: Arc<MigrationRegistry>) -> Self {
        self.migrations = Some(registry);
        self
    }

    pub fn build(self) -> IdentityEntity<P, T> {
        IdentityEntity {
            slot: IdentitySlot::allocate(P::KIND, self.allocator),
            migrations: self.migrations,
            payload: self.payload,
        }
    }
}

impl<P, T> PartialEq for IdentityEntity<P, T> {
    fn eq(&self, other: &Self) -> bool {
        self.slot.surrogate() == other.slot.surrogate()
    }
}

impl<P, T> Eq for IdentityEntity<P, T> {}

impl<P, T> Hash for IdentityEntity<P, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.slot.surrogate().hash(state);
    }
}

impl<P, T> PartialOrd for IdentityEntity<P, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P, T> Ord for IdentityEntity<P, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.slot.surrogate().cmp(&other.slot.surrogate())
    }
}

impl<P, T> Deref for IdentityEntity<P, T> {
    type Target = P;

    fn deref(&self) -> &P {
        &self.payload
    }
}

impl<P, T> DerefMut for IdentityEntity<P, T> {
    fn deref_mut(&mut self) -> &mut P {
        &mut self.payload
    }
}

impl<P, T> core::fmt::Debug for IdentityEntity<P, T>
where
    P: Identified<T> + core::fmt::Debug,
    T: CanonicalId,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct(P::KIND)
            .field("surrogate", &self.surrogate())
            .field("id", &self.try_id())
            .field("payload", &self.payload)
            .finish()
    }
}
