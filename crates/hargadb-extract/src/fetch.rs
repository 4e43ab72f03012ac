//! Outbound page fetch.
//!
//! Deliberately thin: one GET, one body. Retry and backoff policy belongs
//! to the caller (a scheduler or an operator re-running the command), so a
//! non-2xx status is surfaced, never retried here.

use std::time::Duration;

use crate::error::ExtractError;

/// Builds the shared HTTP client with the configured request timeout.
///
/// # Errors
///
/// Returns [`ExtractError::Http`] if the TLS backend fails to initialize.
pub fn build_client(timeout_secs: u64) -> Result<reqwest::Client, ExtractError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetches the HTML body of a listing or specification page.
///
/// # Errors
///
/// Returns [`ExtractError::Http`] on transport failure or timeout and
/// [`ExtractError::UnexpectedStatus`] on a non-2xx response.
pub async fn fetch_html(
    client: &reqwest::Client,
    url: &str,
    user_agent: &str,
) -> Result<String, ExtractError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, user_agent)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(ExtractError::UnexpectedStatus {
            status: response.status().as_u16(),
            url: url.to_owned(),
        });
    }

    Ok(response.text().await?)
}
