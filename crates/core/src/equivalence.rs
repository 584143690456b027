//! Equivalence relations between canonical ids, including across id types.
//!
//! A migration typically issues a new id (an integer, a UUID) for a record
//! that already carried a legacy one (a string). [`MigrationRegistry`] holds
//! the rules that say when two such ids name the same record, keyed by the
//! pair of id types, so adding a migration never touches the entity code.

use core::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Decides whether two ids denote the same real-world record.
pub trait Equivalence<A: ?Sized, B: ?Sized = A>: Send + Sync {
    fn equivalent(&self, left: &A, right: &B) -> bool;
}

impl<A: ?Sized, B: ?Sized, F> Equivalence<A, B> for F
where
    F: Fn(&A, &B) -> bool + Send + Sync,
{
    fn equivalent(&self, left: &A, right: &B) -> bool {
        self(left, right)
    }
}

/// The default relation: `==`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PlainEquality;

impl<T: PartialEq + ?Sized> Equivalence<T, T> for PlainEquality {
    fn equivalent(&self, left: &T, right: &T) -> bool {
        left == right
    }
}

type ErasedRelation = Arc<dyn Fn(&dyn Any, &dyn Any) -> bool + Send + Sync>;

/// Registered migration relations, looked up by `(left type, right type)`.
///
/// A relation registered for `(A, B)` also answers `(B, A)` queries with the
/// arguments swapped.
#[derive(Clone, Default)]
pub struct MigrationRegistry {
    relations: HashMap<(TypeId, TypeId), ErasedRelation>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `relation` for ids of type `A` against ids of type `B`,
    /// replacing any earlier relation for the same ordered pair.
    pub fn register<A, B, E>(&mut self, relation: E) -> &mut Self
    where
        A: Any,
        B: Any,
        E: Equivalence<A, B> + 'static,
    {
        let erased: ErasedRelation = Arc::new(move |left: &dyn Any, right: &dyn Any| {
            match (left.downcast_ref::<A>(), right.downcast_ref::<B>()) {
                (Some(left), Some(right)) => relation.equivalent(left, right),
                _ => false,
            }
        });
        self.relations
            .insert((TypeId::of::<A>(), TypeId::of::<B>()), erased);
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with<A, B, E>(mut self, relation: E) -> Self
    where
        A: Any,
        B: Any,
        E: Equivalence<A, B> + 'static,
    {
        self.register::<A, B, E>(relation);
        self
    }

    /// True if a relation exists between `A` and `B` in either direction.
    pub fn participates<A: Any, B: Any>(&self) -> bool {
        self.relations.contains_key(&(TypeId::of::<A>(), TypeId::of::<B>()))
            || self.relations.contains_key(&(TypeId::of::<B>(), TypeId::of::<A>()))
    }

    /// Apply the registered relation, or `None` when `A` and `B` take part in
    /// no registered migration.
    pub fn equivalent<A: Any, B: Any>(&self, left: &A, right: &B) -> Option<bool> {
        if let Some(relation) = self.relations.get(&(TypeId::of::<A>(), TypeId::of::<B>())) {
            return Some(relation(left as &dyn Any, right as &dyn Any));
        }
        self.relations
            .get(&(TypeId::of::<B>(), TypeId::of::<A>()))
            .map(|relation| relation(right as &dyn Any, left as &dyn Any))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl core::fmt::Debug for MigrationRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MigrationRegistry")
            .field("relations", &self.relations.len())
            .finish()
    }
}
