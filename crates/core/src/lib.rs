//! `deferid-core` — entities whose canonical identifier arrives after construction.
//!
//! An [`IdentityEntity`] is stamped with a [`SurrogateKey`] when it is built and
//! may receive its canonical id exactly once, later. Equality and hashing only
//! ever look at the surrogate key, so an entity can sit in a `HashSet` or
//! `BTreeSet` before resolution and stay findable afterwards. Whether two
//! entities stand for the same external record is a separate question,
//! answered by [`IdentityEntity::same_identity_as`].
//!
//! ```
//! use deferid_core::{IdentityEntity, Identified};
//!
//! #[derive(Debug)]
//! struct Trade {
//!     symbol: String,
//!     quantity: u32,
//! }
//!
//! impl Identified<String> for Trade {
//!     const KIND: &'static str = "Trade";
//! }
//!
//! let trade = IdentityEntity::<Trade, String>::new(Trade { symbol: "B".into(), quantity: 100 });
//! assert!(!trade.is_resolved());
//!
//! trade.resolve("TR-001".to_string()).unwrap();
//! assert_eq!(trade.id().unwrap(), "TR-001");
//! assert!(trade.resolve("TR-001".to_string()).unwrap_err().is_already_resolved());
//! ```

pub mod canonical;
pub mod entity;
pub mod equivalence;
pub mod error;
pub mod slot;
pub mod surrogate;

pub use canonical::CanonicalId;
pub use deferid_guards::{ContractError, GuardResult};
pub use entity::{sort_by_identity, IdentityEntity, IdentityEntityBuilder, Identified};
pub use equivalence::{Equivalence, MigrationRegistry, PlainEquality};
pub use error::{IdentityError, IdentityResult};
pub use slot::{IdentitySlot, IdentitySnapshot, ResolutionState};
pub use surrogate::{KeyAllocator, SurrogateKey, SurrogateKeyAllocator};
