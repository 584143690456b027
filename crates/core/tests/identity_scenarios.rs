use std::collections::HashSet;
use std::sync::{Arc, Barrier};

use deferid_core::{
    IdentityEntity, IdentityError, Identified, MigrationRegistry, ResolutionState,
    SurrogateKeyAllocator,
};

#[derive(Debug)]
struct Trade {
    symbol: String,
    quantity: u32,
}

impl Identified<String> for Trade {
    const KIND: &'static str = "Trade";
}

#[derive(Debug)]
struct Customer {
    name: String,
}

impl<T: deferid_core::CanonicalId> Identified<T> for Customer {
    const KIND: &'static str = "Customer";
}

#[derive(Debug)]
struct Account {
    number: u64,
}

impl Identified<u64> for Account {
    const KIND: &'static str = "Account";
}

fn legacy_registry() -> Arc<MigrationRegistry> {
    Arc::new(
        MigrationRegistry::new().with::<String, u64, _>(|legacy: &String, current: &u64| {
            legacy
                .strip_prefix("LEG-")
                .and_then(|n| n.parse::<u64>().ok())
                == Some(*current)
        }),
    )
}

#[test]
fn trade_lifecycle() {
    let trade = IdentityEntity::<Trade, String>::new(Trade {
        symbol: "B".to_string(),
        quantity: 100,
    });
    assert_eq!(trade.symbol, "B");
    assert_eq!(trade.quantity, 100);
    assert!(!trade.is_resolved());
    assert_eq!(trade.state(), ResolutionState::Unresolved);

    trade.resolve("TR-001".to_string()).unwrap();
    assert_eq!(trade.id().unwrap(), "TR-001");

    let err = trade.resolve("TR-001".to_string()).unwrap_err();
    assert_eq!(
        err,
        IdentityError::AlreadyResolved {
            kind: "Trade",
            existing: "TR-001".to_string(),
        }
    );
}

#[test]
fn unresolved_read_fails() {
    let trade = IdentityEntity::<Trade, String>::new(Trade {
        symbol: "GOLD".to_string(),
        quantity: 1,
    });
    assert!(!trade.is_resolved());
    assert_eq!(
        trade.id().unwrap_err(),
        IdentityError::UnresolvedIdentity { kind: "Trade" }
    );
    assert_eq!(trade.id().unwrap_err().to_string(), "Trade ID is not yet assigned");
}

#[test]
fn migrated_records_share_identity_but_not_equality() {
    let registry = legacy_registry();
    let alloc = SurrogateKeyAllocator::new();

    let legacy = IdentityEntity::<Customer, String>::builder(Customer {
        name: "Alice".to_string(),
    })
    .allocator(&alloc)
    .migrations(Arc::clone(&registry))
    .build();
    let current = IdentityEntity::<Account, u64>::builder(Account { number: 7 })
        .allocator(&alloc)
        .migrations(Arc::clone(&registry))
        .build();

    legacy.resolve("LEG-42".to_string()).unwrap();
    current.resolve(42).unwrap();

    assert!(legacy.same_identity_as(&current));
    assert!(current.same_identity_as(&legacy));
    assert_eq!(legacy.name, "Alice");
    assert_eq!(current.number, 7);

    let twin = IdentityEntity::<Account, u64>::with_allocator(Account { number: 8 }, &alloc);
    twin.resolve(42).unwrap();
    assert_ne!(current, twin);
    assert!(current.same_identity_as(&twin));
    assert!(twin.same_identity_as(&legacy));
}

#[test]
fn migration_relation_rejects_mismatches() {
    let legacy = IdentityEntity::<Customer, String>::builder(Customer {
        name: "Bob".to_string(),
    })
    .migrations(legacy_registry())
    .build();
    let current = IdentityEntity::<Account, u64>::new(Account { number: 1 });

    legacy.resolve("LEG-41".to_string()).unwrap();
    current.resolve(42).unwrap();
    assert!(!legacy.same_identity_as(&current));
}

#[test]
fn set_membership_survives_resolution() {
    let trade = IdentityEntity::<Trade, String>::new(Trade {
        symbol: "B".to_string(),
        quantity: 100,
    });
    let other = IdentityEntity::<Trade, String>::new(Trade {
        symbol: "C".to_string(),
        quantity: 5,
    });

    let mut set = HashSet::new();
    set.insert(&trade);
    set.insert(&other);

    trade.resolve("X".to_string()).unwrap();

    assert!(set.contains(&trade));
    assert_eq!(set.len(), 2);
}

#[test]
fn concurrent_resolution_race() {
    const RACERS: usize = 32;

    let trade = Arc::new(IdentityEntity::<Trade, String>::new(Trade {
        symbol: "B".to_string(),
        quantity: 100,
    }));
    let barrier = Arc::new(Barrier::new(RACERS));

    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let trade = Arc::clone(&trade);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                let value = format!("TR-{i:03}");
                barrier.wait();
                let result = trade.resolve(value.clone());
                (value, result)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let winners: Vec<&String> = results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(v, _)| v)
        .collect();
    assert_eq!(winners.len(), 1);

    let losers = results
        .iter()
        .filter(|(_, r)| matches!(r, Err(e) if e.is_already_resolved()))
        .count();
    assert_eq!(losers, RACERS - 1);

    assert_eq!(trade.id().unwrap(), winners[0]);
}

#[test]
fn readers_never_see_a_torn_id() {
    let trade = Arc::new(IdentityEntity::<Trade, String>::new(Trade {
        symbol: "B".to_string(),
        quantity: 100,
    }));
    let expected = "TR-".to_string() + &"9".repeat(256);

    std::thread::scope(|s| {
        for _ in 0..4 {
            let trade = &trade;
            let expected = &expected;
            s.spawn(move || {
                loop {
                    if trade.is_resolved() {
                        assert_eq!(trade.id().unwrap(), expected);
                        break;
                    }
                    std::hint::spin_loop();
                }
            });
        }
        trade.resolve(expected.clone()).unwrap();
    });
}

#[test]
fn global_and_injected_allocators_share_no_keys() {
    let injected = SurrogateKeyAllocator::new();
    let also_injected = SurrogateKeyAllocator::default();

    let mut book = HashSet::new();
    for _ in 0..4 {
        book.insert(IdentityEntity::<Trade, String>::new(Trade {
            symbol: "G".to_string(),
            quantity: 1,
        }));
        for alloc in [&injected, &also_injected] {
            book.insert(IdentityEntity::<Trade, String>::with_allocator(
                Trade {
                    symbol: "I".to_string(),
                    quantity: 1,
                },
                alloc,
            ));
        }
    }

    assert_eq!(book.len(), 12);
    let keys: HashSet<_> = book.iter().map(|t| t.surrogate()).collect();
    assert_eq!(keys.len(), 12);
}
