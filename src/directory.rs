//! Paginated channel directory fetching
//!
//! The directory is consumed one page at a time through the
//! [`DirectoryFetcher`] trait so the reconciliation loop can be driven by a
//! scripted fetcher in tests. [`HttpDirectoryFetcher`] is the production
//! implementation over a `conversations.list`-shaped HTTP endpoint.

use crate::config::DirectoryConfig;
use crate::error::FetchError;
use crate::types::{ChannelRecord, Page};
use async_trait::async_trait;
use serde::Deserialize;

/// Fallback delay when a rate-limit response carries no usable Retry-After
const DEFAULT_RETRY_AFTER_SECS: u64 = 1;

/// One-page window onto the remote channel directory
///
/// Implementations surface rate limiting as
/// [`FetchError::RateLimited`] so the loop can honor the mandated delay and
/// retry the same cursor; any other failure terminates paging.
#[async_trait]
pub trait DirectoryFetcher: Send + Sync {
    /// Fetch one page of channel records
    ///
    /// # Arguments
    ///
    /// * `cursor` - Continuation token from the previous page, or `None` for
    ///   the first page
    /// * `limit` - Number of records to request
    async fn fetch_page(&self, cursor: Option<&str>, limit: usize) -> Result<Page, FetchError>;
}

/// Directory fetcher backed by a paginated HTTP list endpoint
///
/// The client is an explicit value passed in by the caller, not ambient
/// process state, so two fetchers can run against different workspaces in the
/// same process.
pub struct HttpDirectoryFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Wire shape of the paginated list response
#[derive(Debug, Deserialize)]
struct ListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<ChannelRecord>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: String,
}

impl HttpDirectoryFetcher {
    /// Create a fetcher from an explicit HTTP client and directory settings
    pub fn new(client: reqwest::Client, config: &DirectoryConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/conversations.list", self.base_url)
    }
}

#[async_trait]
impl DirectoryFetcher for HttpDirectoryFetcher {
    async fn fetch_page(
        &self,
        cursor: Option<&str>,
        limit: usize,
    ) -> Result<Page, FetchError> {
        let mut request = self
            .client
            .get(self.endpoint())
            .query(&[("limit", limit.to_string())]);

        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(FetchError::RateLimited { retry_after_secs });
        }

        let response = response.error_for_status()?;
        let body: ListResponse = response.json().await?;

        if !body.ok {
            return Err(FetchError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        let next_cursor = body
            .response_metadata
            .map(|m| m.next_cursor)
            .filter(|c| !c.is_empty());

        tracing::debug!(
            records = body.channels.len(),
            has_next = next_cursor.is_some(),
            "fetched directory page"
        );

        Ok(Page {
            records: body.channels,
            next_cursor,
        })
    }
}
