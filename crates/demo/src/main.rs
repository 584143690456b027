//! Walks an entity through deferred resolution and a legacy-id migration.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use deferid_core::{CanonicalId, GuardResult, IdentityEntity, Identified, MigrationRegistry};
use deferid_guards::ensure;
use uuid::Uuid;

#[derive(Debug)]
struct Trade {
    symbol: String,
    quantity: u32,
}

impl Identified<String> for Trade {
    const KIND: &'static str = "Trade";

    fn validate_id(&self, id: &String) -> GuardResult<()> {
        ensure(id.starts_with("TR-"), "ID must start with 'TR-'")
    }
}

#[derive(Debug)]
struct Person {
    name: String,
}

impl<T: CanonicalId> Identified<T> for Person {
    const KIND: &'static str = "Person";
}

fn main() -> Result<()> {
    deferid_observability::init();

    trade_lifecycle()?;
    legacy_migration()?;

    tracing::info!("demo finished");
    Ok(())
}

fn trade_lifecycle() -> Result<()> {
    let trade = IdentityEntity::<Trade, String>::new(Trade {
        symbol: "B".to_string(),
        quantity: 100,
    });
    tracing::info!(
        symbol = %trade.symbol,
        quantity = trade.quantity,
        surrogate = %trade.surrogate(),
        "trade created"
    );

    let mut book = HashSet::new();
    book.insert(&trade);

    if let Err(err) = trade.resolve("BAD-1".to_string()) {
        tracing::warn!(error = %err, "rejected candidate id");
    }

    trade
        .resolve("TR-001".to_string())
        .context("resolving trade")?;
    tracing::info!(
        id = %trade.id()?,
        still_in_book = book.contains(&trade),
        "trade resolved"
    );

    if let Err(err) = trade.resolve("TR-001".to_string()) {
        tracing::warn!(error = %err, "second resolution refused");
    }

    let snapshot = serde_json::to_string(&trade.snapshot())?;
    tracing::info!(%snapshot, "trade snapshot");
    Ok(())
}

fn legacy_migration() -> Result<()> {
    let registry = Arc::new(MigrationRegistry::new().with::<String, u64, _>(
        |legacy: &String, current: &u64| {
            legacy
                .strip_prefix("LEG-")
                .and_then(|n| n.parse::<u64>().ok())
                == Some(*current)
        },
    ));

    let legacy = IdentityEntity::<Person, String>::builder(Person {
        name: "Alice".to_string(),
    })
    .migrations(registry)
    .build();
    let current = IdentityEntity::<Person, u64>::new(Person {
        name: "Alice".to_string(),
    });
    let modern = IdentityEntity::<Person, Uuid>::new(Person {
        name: "Alice".to_string(),
    });

    legacy.resolve("LEG-42".to_string())?;
    current.resolve(42)?;
    modern.resolve(Uuid::new_v4())?;

    tracing::info!(
        name = %legacy.name,
        legacy = %legacy.id()?,
        current = %current.id()?,
        same_identity = legacy.same_identity_as(&current),
        "legacy record compared with its replacement"
    );
    tracing::info!(
        modern = %modern.id()?,
        same_identity = legacy.same_identity_as(&modern),
        "no migration registered for uuid ids"
    );
    Ok(())
}
