//! Types usable as canonical ids, with their intrinsic guards.

use core::fmt::{Debug, Display};

use deferid_guards::{ensure, ensure_str_is_valued, GuardResult};
use uuid::Uuid;

/// A value that can serve as an entity's externally meaningful identifier.
///
/// `validate` is the type's own guard, applied to every candidate before an
/// entity accepts it. Entity-specific rules go in
/// [`crate::Identified::validate_id`] instead.
pub trait CanonicalId: Clone + Eq + Ord + Debug + Display + Send + Sync + 'static {
    fn validate(&self) -> GuardResult<()> {
        Ok(())
    }
}

impl CanonicalId for String {
    fn validate(&self) -> GuardResult<()> {
        ensure_str_is_valued(self, "id").map(|_| ())
    }
}

impl CanonicalId for Uuid {
    fn validate(&self) -> GuardResult<()> {
        ensure(!self.is_nil(), "Arg 'id' cannot be the nil UUID")
    }
}

macro_rules! impl_integer_id {
    ($($t:ty),* $(,)?) => {
        $(impl CanonicalId for $t {})*
    };
}

impl_integer_id!(u32, u64, u128, i32, i64, i128);
