//! Configuration types for channel-recon

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory API configuration (endpoint, credentials, page size)
///
/// Groups settings for the paginated channel directory endpoint.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Base URL of the directory API (default: Slack Web API)
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Bearer token presented to the directory endpoint
    #[serde(default)]
    pub token: Option<String>,

    /// Number of records requested per page (default: 150)
    ///
    /// The loop's short-page termination heuristic is tied to this value:
    /// paging stops once a page comes back with fewer than `page_size - 1`
    /// records.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            token: None,
            page_size: default_page_size(),
        }
    }
}

/// Rate-limit retry policy for the reconciliation loop
///
/// The remote directory signals backpressure with a mandated delay; the loop
/// always honors the delay before re-fetching the same cursor. This policy
/// bounds how many consecutive rate-limited attempts are tolerated per page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Maximum consecutive rate-limited retries per page (default: 10)
    ///
    /// `None` means unbounded retry, which reproduces the original behavior
    /// of waiting on the server forever; request it explicitly and monitor
    /// the logs for liveness.
    #[serde(default = "default_max_retries")]
    pub max_retries: Option<u32>,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
        }
    }
}

impl RateLimitPolicy {
    /// A policy that retries rate-limited fetches without bound
    pub fn unbounded() -> Self {
        Self { max_retries: None }
    }
}

/// Candidate list configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateSourceConfig {
    /// Path to the newline-delimited list of desired channel names
    /// (default: "channel_names.txt")
    #[serde(default = "default_candidates_path")]
    pub path: PathBuf,
}

impl Default for CandidateSourceConfig {
    fn default() -> Self {
        Self {
            path: default_candidates_path(),
        }
    }
}

/// Tabular sheet configuration
///
/// The sheet holds one row per matched channel (id, configured name, creator
/// id) under a header row, and is written back to the same named file.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Path to the sheet file (default: "channel_matches.csv")
    #[serde(default = "default_sheet_path")]
    pub path: PathBuf,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: default_sheet_path(),
        }
    }
}

/// Notification configuration (creator messages)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Base URL of the messaging API (default: Slack Web API)
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Bearer token presented to the messaging endpoint
    #[serde(default)]
    pub token: Option<String>,

    /// Message template with `{creator}` and `{channel}` placeholders
    #[serde(default = "default_message_template")]
    pub template: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            token: None,
            template: default_message_template(),
        }
    }
}

/// Main configuration for the reconciler
///
/// Fields are organized into logical sub-configs:
/// - [`directory`](DirectoryConfig) — directory endpoint and page size
/// - [`rate_limit`](RateLimitPolicy) — backpressure retry ceiling
/// - [`candidates`](CandidateSourceConfig) — desired-name list location
/// - [`sheet`](SheetConfig) — persisted artifact location
/// - [`notifications`](NotificationConfig) — creator message settings
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directory endpoint settings
    #[serde(default)]
    pub directory: DirectoryConfig,

    /// Rate-limit retry policy
    #[serde(default)]
    pub rate_limit: RateLimitPolicy,

    /// Candidate list settings
    #[serde(default)]
    pub candidates: CandidateSourceConfig,

    /// Persisted sheet settings
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Creator notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

fn default_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_page_size() -> usize {
    150
}

fn default_max_retries() -> Option<u32> {
    Some(10)
}

fn default_candidates_path() -> PathBuf {
    PathBuf::from("channel_names.txt")
}

fn default_sheet_path() -> PathBuf {
    PathBuf::from("channel_matches.csv")
}

fn default_message_template() -> String {
    "Hi <@{creator}>!\nA prefix will be added to your channel: #{channel}\n\
     This is being done to help organize the workspace."
        .to_string()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_page_size_is_150() {
        let config = Config::default();
        assert_eq!(config.directory.page_size, 150);
    }

    #[test]
    fn default_retry_ceiling_is_bounded() {
        let policy = RateLimitPolicy::default();
        assert_eq!(policy.max_retries, Some(10));
    }

    #[test]
    fn unbounded_policy_is_explicit() {
        let policy = RateLimitPolicy::unbounded();
        assert_eq!(policy.max_retries, None);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.directory.page_size, 150);
        assert_eq!(config.candidates.path, PathBuf::from("channel_names.txt"));
        assert_eq!(config.sheet.path, PathBuf::from("channel_matches.csv"));
        assert!(config.notifications.template.contains("{channel}"));
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: Config =
            serde_json::from_str(r#"{"directory": {"page_size": 200}}"#).unwrap();
        assert_eq!(config.directory.page_size, 200);
        assert_eq!(config.directory.base_url, "https://slack.com/api");
    }
}
