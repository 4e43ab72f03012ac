use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("page blocked by anti-bot protection (marker: \"{marker}\")")]
    BlockedPage { marker: &'static str },
}
