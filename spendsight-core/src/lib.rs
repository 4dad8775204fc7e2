//! spendsight-core: transaction model, locale phrase tables, and filtering
//! for the purchase-history ledger.

pub mod filter;
pub mod locale;
pub mod transaction;

pub use filter::{FilterState, TypeTag};
pub use locale::{Marker, market_transaction_count, matches_marker};
pub use transaction::{FALLBACK_CURRENCY, Transaction};
