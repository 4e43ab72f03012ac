use hargadb_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Bad input shape, rejected before any database read.
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// Products are never auto-created from a price feed.
    #[error("product not found: {slug}")]
    ProductNotFound { slug: String },

    #[error("marketplace not found: {reference}")]
    MarketplaceNotFound { reference: String },

    #[error(transparent)]
    Db(#[from] DbError),

    /// Transaction begin/commit errors surface here directly; query errors
    /// arrive wrapped in [`DbError`].
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
