//! Surrogate keys and the allocator that stamps them.

use core::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Internal, never-reused key anchoring an entity's equality and hash.
///
/// A key pairs the id of the allocator that issued it with that allocator's
/// sequence number. Allocator ids are unique across the process, so keys from
/// different allocators never collide. Keys order by allocator, then by
/// sequence; within one allocator that is the creation order of the entities.
///
/// Keys are minted only by [`SurrogateKeyAllocator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SurrogateKey {
    allocator: u64,
    seq: u64,
}

impl SurrogateKey {
    /// Id of the allocator that issued this key.
    pub const fn allocator(self) -> u64 {
        self.allocator
    }

    /// Position of this key in its allocator's sequence.
    pub const fn seq(self) -> u64 {
        self.seq
    }
}

impl core::fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sk-{}.{}", self.allocator, self.seq)
    }
}

/// Source of surrogate keys.
///
/// Entity construction takes the allocator as a capability so tests can hand
/// in their own instance, or a double that replays keys drawn from one,
/// instead of sharing the process-wide allocator. An implementation must hand
/// out each key at most once.
pub trait KeyAllocator: Send + Sync {
    fn next_key(&self) -> SurrogateKey;
}

/// Lock-free monotonic counter with a process-unique allocator id.
#[derive(Debug)]
pub struct SurrogateKeyAllocator {
    id: u64,
    next: AtomicU64,
}

/// Id 0 belongs to the global allocator.
static NEXT_ALLOCATOR_ID: AtomicU64 = AtomicU64::new(1);

static GLOBAL: SurrogateKeyAllocator = SurrogateKeyAllocator {
    id: 0,
    next: AtomicU64::new(1),
};

impl SurrogateKeyAllocator {
    /// A fresh allocator whose first key has sequence number 1.
    ///
    /// # Panics
    ///
    /// Panics if the process has created `u64::MAX` allocators.
    pub fn new() -> Self {
        Self::first_seq(1)
    }

    #[cfg(test)]
    pub(crate) fn starting_at(first: u64) -> Self {
        Self::first_seq(first)
    }

    fn first_seq(first: u64) -> Self {
        let id = match NEXT_ALLOCATOR_ID.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| {
            n.checked_add(1)
        }) {
            Ok(id) => id,
            Err(_) => panic!("allocator id space exhausted"),
        };
        Self {
            id,
            next: AtomicU64::new(first),
        }
    }

    /// The process-wide allocator used by [`crate::IdentityEntity::new`].
    pub fn global() -> &'static SurrogateKeyAllocator {
        &GLOBAL
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Default for SurrogateKeyAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyAllocator for SurrogateKeyAllocator {
    /// Returns a key strictly greater than every key this allocator has
    /// returned before.
    ///
    /// # Panics
    ///
    /// Panics once the 64-bit sequence is exhausted. Handing out a reused
    /// key would break every equality already established, so this is fatal.
    fn next_key(&self) -> SurrogateKey {
        match self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_add(1))
        {
            Ok(seq) => SurrogateKey {
                allocator: self.id,
                seq,
            },
            Err(_) => panic!("surrogate key space exhausted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[test]
    fn keys_start_at_one_and_increase() {
        let alloc = SurrogateKeyAllocator::new();
        assert_eq!(alloc.next_key().seq(), 1);
        assert_eq!(alloc.next_key().seq(), 2);
        assert_eq!(alloc.next_key().seq(), 3);
    }

    #[test]
    fn keys_carry_their_allocator() {
        let alloc = SurrogateKeyAllocator::starting_at(1_000);
        let key = alloc.next_key();
        assert_eq!(key.seq(), 1_000);
        assert_eq!(key.allocator(), alloc.id());
    }

    #[test]
    fn allocators_have_distinct_ids() {
        let a = SurrogateKeyAllocator::new();
        let b = SurrogateKeyAllocator::default();
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id(), SurrogateKeyAllocator::global().id());
        assert_ne!(b.id(), SurrogateKeyAllocator::global().id());
    }

    #[test]
    fn same_sequence_from_different_allocators_never_collides() {
        let a = SurrogateKeyAllocator::new();
        let b = SurrogateKeyAllocator::new();
        let (ka, kb) = (a.next_key(), b.next_key());
        assert_eq!(ka.seq(), kb.seq());
        assert_ne!(ka, kb);
        assert_eq!(ka.cmp(&kb), a.id().cmp(&b.id()));
    }

    #[test]
    fn display_names_allocator_and_sequence() {
        let alloc = SurrogateKeyAllocator::starting_at(7);
        let key = alloc.next_key();
        assert_eq!(key.to_string(), format!("sk-{}.7", alloc.id()));
    }

    #[test]
    fn serializes_both_parts() {
        let alloc = SurrogateKeyAllocator::starting_at(42);
        let json = serde_json::to_value(alloc.next_key()).unwrap();
        assert_eq!(json, serde_json::json!({ "allocator": alloc.id(), "seq": 42 }));
    }

    #[test]
    fn global_allocator_never_repeats() {
        let a = SurrogateKeyAllocator::global().next_key();
        let b = SurrogateKeyAllocator::global().next_key();
        assert_eq!(a.allocator(), 0);
        assert!(b > a);
    }

    #[test]
    #[should_panic(expected = "surrogate key space exhausted")]
    fn exhaustion_is_fatal() {
        let alloc = SurrogateKeyAllocator::starting_at(u64::MAX - 1);
        assert_eq!(alloc.next_key().seq(), u64::MAX - 1);
        alloc.next_key();
    }

    #[test]
    fn concurrent_allocation_yields_unique_increasing_keys_per_thread() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 1_000;

        let alloc = SurrogateKeyAllocator::new();
        let all = Mutex::new(Vec::with_capacity(THREADS * PER_THREAD));

        std::thread::scope(|s| {
            for _ in 0..THREADS {
                s.spawn(|| {
                    let keys: Vec<_> = (0..PER_THREAD).map(|_| alloc.next_key()).collect();
                    assert!(keys.windows(2).all(|w| w[0] < w[1]));
                    all.lock().unwrap().extend(keys);
                });
            }
        });

        let all = all.into_inner().unwrap();
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), THREADS * PER_THREAD);
        assert_eq!(unique.iter().max().unwrap().seq(), (THREADS * PER_THREAD) as u64);
    }
}
