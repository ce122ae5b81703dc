//! Top-level reconciler composing the collaborators
//!
//! [`Reconciler`] wires the candidate loader, directory fetcher, result sink,
//! and notifier together behind one explicit [`run`](Reconciler::run) entry
//! point. Nothing executes at load time and there is no ambient client state;
//! the caller decides when to run and which collaborators to run with.
//!
//! `run` never fails. Every collaborator failure is caught at its boundary,
//! logged, and converted into a degraded continuation: a missing candidate
//! list becomes an empty set, a failed traversal yields a partial mapping, a
//! failed persist still lets notifications proceed, and a failed notification
//! skips to the next recipient. The [`RunSummary`] tells the caller what
//! actually happened.

use crate::candidates::load_candidates;
use crate::config::Config;
use crate::directory::{DirectoryFetcher, HttpDirectoryFetcher};
use crate::notify::{HttpNotifier, Notifier};
use crate::reconcile::{ReconcileOptions, reconcile};
use crate::sink::{CsvSheetSink, ResultSink};
use std::path::PathBuf;

/// Outcome of one reconciliation run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Logical candidates loaded from the list
    pub candidates: usize,
    /// Channels matched during the traversal
    pub matched: usize,
    /// Whether the sheet was written successfully
    pub persisted: bool,
    /// Creators notified successfully
    pub notified: usize,
    /// Per-recipient notification failures (logged and skipped)
    pub notify_failures: usize,
}

/// Composes loader, fetcher, sink, and notifier into one runnable unit
pub struct Reconciler<F, S, N> {
    candidates_path: PathBuf,
    fetcher: F,
    sink: S,
    notifier: N,
    options: ReconcileOptions,
}

impl Reconciler<HttpDirectoryFetcher, CsvSheetSink, HttpNotifier> {
    /// Build a reconciler with HTTP collaborators from a [`Config`]
    ///
    /// The reqwest client is created here and shared by the fetcher and the
    /// notifier; callers needing a customized client should compose the
    /// collaborators themselves via [`Reconciler::new`].
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        Self::new(
            config.candidates.path.clone(),
            HttpDirectoryFetcher::new(client.clone(), &config.directory),
            CsvSheetSink::new(config.sheet.path.clone()),
            HttpNotifier::new(client, &config.notifications),
            ReconcileOptions {
                page_size: config.directory.page_size,
                rate_limit: config.rate_limit.clone(),
            },
        )
    }
}

impl<F, S, N> Reconciler<F, S, N>
where
    F: DirectoryFetcher,
    S: ResultSink,
    N: Notifier,
{
    /// Compose a reconciler from explicit collaborators
    pub fn new(
        candidates_path: impl Into<PathBuf>,
        fetcher: F,
        sink: S,
        notifier: N,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            candidates_path: candidates_path.into(),
            fetcher,
            sink,
            notifier,
            options,
        }
    }

    /// Load candidates, reconcile, persist, then notify each creator once
    ///
    /// Persistence and notification happen only after the traversal fully
    /// completes, and notification is independent of persistence success.
    pub async fn run(&self) -> RunSummary {
        tracing::info!("starting reconciliation run");

        let candidates = match load_candidates(&self.candidates_path) {
            Ok(set) => set,
            Err(e) => {
                tracing::warn!(error = %e, "candidate list unavailable, proceeding with empty set");
                Default::default()
            }
        };

        let result = reconcile(&candidates, &self.fetcher, &self.options).await;

        let persisted = match self.sink.persist(&result) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to persist match sheet");
                false
            }
        };

        let mut notified = 0usize;
        let mut notify_failures = 0usize;
        for (channel_id, matched) in result.iter() {
            match self
                .notifier
                .notify(&matched.creator_id, &matched.candidate_name)
                .await
            {
                Ok(()) => notified += 1,
                Err(e) => {
                    notify_failures += 1;
                    tracing::warn!(
                        error = %e,
                        channel = channel_id,
                        creator = matched.creator_id,
                        "could not notify channel creator"
                    );
                }
            }
        }

        let summary = RunSummary {
            candidates: candidates.len(),
            matched: result.len(),
            persisted,
            notified,
            notify_failures,
        };
        tracing::info!(
            matched = summary.matched,
            persisted = summary.persisted,
            notified = summary.notified,
            notify_failures = summary.notify_failures,
            "reconciliation run complete"
        );
        summary
    }
}
