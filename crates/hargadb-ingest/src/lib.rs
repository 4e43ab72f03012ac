//! Price reconciliation: turns an extracted price plus a listing title into
//! an idempotent price upsert with a consistent lowest-price roll-up, or a
//! quarantined unmapped listing when no variant can be matched confidently.

pub mod error;
pub mod reconcile;
pub mod types;

pub use error::IngestError;
pub use reconcile::reconcile;
pub use types::{IngestOutcome, IngestRequest, MarketplaceRef};
