//! The paginated directory reconciliation loop
//!
//! This is the core of the crate: it drives a [`DirectoryFetcher`] page by
//! page, matches each page's records against the candidate set, honors
//! rate-limit backpressure, and accumulates the one artifact that survives
//! the traversal — the [`MatchResult`].
//!
//! # Example
//!
//! ```no_run
//! use channel_recon::config::DirectoryConfig;
//! use channel_recon::directory::HttpDirectoryFetcher;
//! use channel_recon::reconcile::{ReconcileOptions, reconcile};
//! use channel_recon::types::CandidateSet;
//!
//! # async fn example() {
//! let candidates = CandidateSet::from_names(["Random-Coffee", "eng-platform"]);
//! let config = DirectoryConfig::default();
//! let fetcher = HttpDirectoryFetcher::new(reqwest::Client::new(), &config);
//!
//! let result = reconcile(&candidates, &fetcher, &ReconcileOptions::default()).await;
//! for (channel_id, matched) in result.iter() {
//!     println!("{channel_id}: {} by {}", matched.candidate_name, matched.creator_id);
//! }
//! # }
//! ```

use crate::config::RateLimitPolicy;
use crate::directory::DirectoryFetcher;
use crate::error::FetchError;
use crate::types::{CandidateSet, MatchResult};
use std::time::Duration;

/// Options controlling one reconciliation run
#[derive(Clone, Debug)]
pub struct ReconcileOptions {
    /// Number of records requested per page
    ///
    /// Paging stops once a page comes back with fewer than `page_size - 1`
    /// records (the short page signals the final page).
    pub page_size: usize,

    /// How many consecutive rate-limited attempts to tolerate per page
    pub rate_limit: RateLimitPolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            page_size: 150,
            rate_limit: RateLimitPolicy::default(),
        }
    }
}

/// Reconcile a candidate set against the full remote channel directory
///
/// Fetches successive pages from `fetcher`, matching every record's name
/// against every candidate case-insensitively. On a match the record's id is
/// mapped to the candidate's configured name and the record's creator id; an
/// id is recorded at most once (first match wins).
///
/// Failure handling follows the crate taxonomy:
/// - [`FetchError::RateLimited`] suspends the loop for the server-mandated
///   delay and retries the **same** cursor, up to the policy's ceiling
/// - any other fetch failure (and an exhausted ceiling) terminates the loop
///   early; the partial result accumulated so far is returned
///
/// The function therefore never fails: an empty or partial mapping is the
/// degraded outcome, and the logs carry the reason.
pub async fn reconcile<F>(
    candidates: &CandidateSet,
    fetcher: &F,
    options: &ReconcileOptions,
) -> MatchResult
where
    F: DirectoryFetcher + ?Sized,
{
    let mut cursor: Option<String> = None;
    let mut result = MatchResult::new();
    let mut page_count = 0usize;
    let mut channels_checked = 0usize;

    loop {
        let page = match fetch_with_backoff(
            fetcher,
            cursor.as_deref(),
            options,
            page_count,
        )
        .await
        {
            Some(page) => page,
            // Soft failure: keep whatever matched so far
            None => return result,
        };

        for record in &page.records {
            for candidate in candidates.iter() {
                if candidate.matches(&record.name) {
                    result.record(&record.id, candidate.name(), &record.creator);
                }
            }
        }

        page_count += 1;
        channels_checked += page.records.len();
        tracing::info!(
            page = page_count,
            channels_checked,
            matched = result.len(),
            "checked directory page"
        );

        // A short page signals the final page. The threshold is one below the
        // requested size, matching the behavior this loop replaces.
        if page.records.len() < options.page_size.saturating_sub(1) {
            break;
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => {
                tracing::warn!(
                    page = page_count,
                    "full page without continuation cursor, stopping traversal"
                );
                break;
            }
        }
    }

    tracing::info!(
        pages = page_count,
        channels_checked,
        matched = result.len(),
        "directory traversal complete"
    );
    result
}

/// Fetch one page, absorbing rate-limit signals
///
/// Retries the same cursor after each server-mandated delay. Returns `None`
/// when the fetch fails terminally or the retry ceiling is exhausted; the
/// caller treats that as the end of the traversal.
async fn fetch_with_backoff<F>(
    fetcher: &F,
    cursor: Option<&str>,
    options: &ReconcileOptions,
    page_count: usize,
) -> Option<crate::types::Page>
where
    F: DirectoryFetcher + ?Sized,
{
    let mut attempts = 0u32;
    loop {
        match fetcher.fetch_page(cursor, options.page_size).await {
            Ok(page) => return Some(page),
            Err(FetchError::RateLimited { retry_after_secs }) => {
                attempts += 1;
                if let Some(max) = options.rate_limit.max_retries
                    && attempts > max
                {
                    tracing::error!(
                        attempts,
                        max_retries = max,
                        page = page_count,
                        "rate-limit retry ceiling exhausted, returning partial result"
                    );
                    return None;
                }
                tracing::warn!(
                    retry_after_secs,
                    attempt = attempts,
                    page = page_count,
                    "rate limited, suspending before re-fetching the same cursor"
                );
                tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    page = page_count,
                    "directory fetch failed, returning partial result"
                );
                return None;
            }
        }
    }
}
