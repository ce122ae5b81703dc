//! Creator notifications
//!
//! After reconciliation completes, each matched channel's creator receives a
//! one-time message referencing the matched channel name. Delivery goes
//! through the [`Notifier`] trait; [`HttpNotifier`] is the production
//! implementation posting to a `chat.postMessage`-shaped endpoint with an
//! explicit client. Per-recipient failures are the caller's to log and skip;
//! they never abort the remaining recipients.

use crate::config::NotificationConfig;
use crate::error::NotifyError;
use async_trait::async_trait;
use serde::Deserialize;

/// Send-message capability keyed by creator id
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the templated message for one matched channel to its creator
    async fn notify(&self, creator_id: &str, channel_name: &str) -> Result<(), NotifyError>;
}

/// Notifier posting messages over HTTP
pub struct HttpNotifier {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    template: String,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl HttpNotifier {
    /// Create a notifier from an explicit HTTP client and notification settings
    pub fn new(client: reqwest::Client, config: &NotificationConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            template: config.template.clone(),
        }
    }

    /// Render the message text for one recipient
    ///
    /// Substitutes `{creator}` and `{channel}` in the configured template.
    /// Anything fancier than placeholder substitution is out of scope.
    pub fn render(&self, creator_id: &str, channel_name: &str) -> String {
        self.template
            .replace("{creator}", creator_id)
            .replace("{channel}", channel_name)
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, creator_id: &str, channel_name: &str) -> Result<(), NotifyError> {
        let text = self.render(creator_id, channel_name);
        let payload = serde_json::json!({
            "channel": creator_id,
            "text": text,
        });

        let mut request = self
            .client
            .post(format!("{}/chat.postMessage", self.base_url))
            .json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body: PostMessageResponse = response.json().await?;
        if !body.ok {
            return Err(NotifyError::Api(
                body.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        tracing::debug!(creator = creator_id, channel = channel_name, "notified creator");
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> HttpNotifier {
        let config = NotificationConfig {
            base_url: server.uri(),
            token: Some("xoxb-test".to_string()),
            template: "Hi <@{creator}>! Your channel #{channel} gets a prefix.".to_string(),
        };
        HttpNotifier::new(reqwest::Client::new(), &config)
    }

    #[test]
    fn render_substitutes_both_placeholders() {
        let config = NotificationConfig {
            template: "creator={creator} channel={channel}".to_string(),
            ..NotificationConfig::default()
        };
        let notifier = HttpNotifier::new(reqwest::Client::new(), &config);
        assert_eq!(
            notifier.render("U1", "random-coffee"),
            "creator=U1 channel=random-coffee"
        );
    }

    #[tokio::test]
    async fn posts_rendered_message_keyed_by_creator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(body_partial_json(serde_json::json!({
                "channel": "U1",
                "text": "Hi <@U1>! Your channel #random-coffee gets a prefix.",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server)
            .notify("U1", "random-coffee")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn ok_false_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": false,
                "error": "channel_not_found",
            })))
            .mount(&server)
            .await;

        let err = notifier_for(&server)
            .notify("U1", "random-coffee")
            .await
            .unwrap_err();
        match err {
            NotifyError::Api(msg) => assert_eq!(msg, "channel_not_found"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn http_failure_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = notifier_for(&server)
            .notify("U1", "random-coffee")
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Transport(_)));
    }
}
