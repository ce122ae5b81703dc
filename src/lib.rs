//! # channel-recon
//!
//! Library for reconciling a local list of desired channel names against a
//! workspace's full channel directory served by a paginated API.
//!
//! ## Design Philosophy
//!
//! channel-recon is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Explicitly composed** - Collaborators (fetcher, sink, notifier) are
//!   values the caller wires together; nothing runs at load time and there is
//!   no ambient client state
//! - **Degrade, don't crash** - Every collaborator failure is logged and
//!   converted into a degraded continuation; a run always completes
//!
//! ## Quick Start
//!
//! ```no_run
//! use channel_recon::{Config, Reconciler};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = Config::default();
//!     config.directory.token = std::env::var("DIRECTORY_TOKEN").ok();
//!     config.notifications.token = config.directory.token.clone();
//!
//!     let summary = Reconciler::from_config(&config).run().await;
//!     println!(
//!         "matched {} channels, notified {} creators",
//!         summary.matched, summary.notified
//!     );
//! }
//! ```
//!
//! The core of the crate is [`reconcile`](reconcile::reconcile): it pages
//! through the directory, matches record names against candidates
//! case-insensitively, suspends on rate-limit backpressure, and returns the
//! one artifact that survives the traversal — a deterministic mapping from
//! channel id to matched name and creator id.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Candidate list loading
pub mod candidates;
/// Configuration types
pub mod config;
/// Paginated channel directory fetching
pub mod directory;
/// Error types
pub mod error;
/// Creator notifications
pub mod notify;
/// The paginated directory reconciliation loop
pub mod reconcile;
/// Top-level reconciler composing the collaborators
pub mod reconciler;
/// Tabular persistence of the match result
pub mod sink;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{
    CandidateSourceConfig, Config, DirectoryConfig, NotificationConfig, RateLimitPolicy,
    SheetConfig,
};
pub use directory::{DirectoryFetcher, HttpDirectoryFetcher};
pub use error::{Error, FetchError, NotifyError, Result, SinkError, SourceError};
pub use notify::{HttpNotifier, Notifier};
pub use reconcile::{ReconcileOptions, reconcile};
pub use reconciler::{Reconciler, RunSummary};
pub use sink::{CsvSheetSink, ResultSink};
pub use types::{Candidate, CandidateSet, ChannelRecord, MatchResult, MatchedChannel, Page};
