use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::OutgoingEmail;
use crate::error::MailError;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "RESEND_API_KEY";

/// Value shipped in build environments; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "re_placeholder_key_for_build";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailOutcome {
    /// Accepted by the provider.
    Sent { id: String },
    /// No API key configured; nothing was sent.
    Skipped,
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: String,
}

/// Sends mail through a Resend-compatible `POST {api_base}/emails`.
#[derive(Debug, Clone)]
pub struct MailClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
}

impl MailClient {
    /// `api_key` of `None`, empty, or the build placeholder leaves the
    /// client unconfigured.
    pub fn new(api_base: impl Into<String>, api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_API_KEY);
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Read the key from `RESEND_API_KEY`.
    pub fn from_env(api_base: impl Into<String>) -> Self {
        Self::new(api_base, std::env::var(API_KEY_ENV).ok())
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> Result<Url, MailError> {
        Url::parse(&format!("{}/", self.api_base))
            .and_then(|base| base.join("emails"))
            .map_err(|e| MailError::Invalid(format!("api base '{}': {e}", self.api_base)))
    }

    pub async fn send(&self, email: &OutgoingEmail) -> Result<MailOutcome, MailError> {
        let Some(key) = &self.api_key else {
            tracing::info!(
                subject = %email.subject,
                "email service not configured, skipping send"
            );
            return Ok(MailOutcome::Skipped);
        };
        if email.to.is_empty() {
            return Err(MailError::Invalid("no recipients".into()));
        }

        let resp = self
            .http
            .post(self.endpoint()?)
            .bearer_auth(key)
            .json(email)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "mail provider rejected message");
            return Err(MailError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let sent: SendResponse = resp.json().await?;
        tracing::info!(id = %sent.id, to = ?email.to, "email sent");
        Ok(MailOutcome::Sent { id: sent.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            from: "FocusOS <noreply@focusos.app>".into(),
            to: vec!["rachel.k@example.com".into()],
            subject: "Sam wants to be your friend on FocusOS!".into(),
            html: "<p>hi</p>".into(),
        }
    }

    #[test]
    fn placeholder_and_blank_keys_are_unconfigured() {
        assert!(!MailClient::new("http://x", None).is_configured());
        assert!(!MailClient::new("http://x", Some("".into())).is_configured());
        assert!(!MailClient::new("http://x", Some(PLACEHOLDER_API_KEY.into())).is_configured());
        assert!(MailClient::new("http://x", Some("re_live".into())).is_configured());
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = MailClient::new("https://mail.example.com/v1/", Some("k".into()));
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://mail.example.com/v1/emails"
        );
        assert!(MailClient::new("not a url", Some("k".into())).endpoint().is_err());
    }

    #[tokio::test]
    async fn unconfigured_send_is_skipped() {
        let client = MailClient::new("http://127.0.0.1:9", None);
        assert_eq!(client.send(&email()).await.unwrap(), MailOutcome::Skipped);
    }

    #[tokio::test]
    async fn posts_json_with_bearer_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer re_test")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "to": ["rachel.k@example.com"],
                "subject": "Sam wants to be your friend on FocusOS!",
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"msg_123"}"#)
            .create_async()
            .await;

        let client = MailClient::new(server.url(), Some("re_test".into()));
        let outcome = client.send(&email()).await.unwrap();
        assert_eq!(outcome, MailOutcome::Sent { id: "msg_123".into() });
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_error_keeps_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(r#"{"message":"invalid from"}"#)
            .create_async()
            .await;

        let client = MailClient::new(server.url(), Some("re_test".into()));
        match client.send(&email()).await {
            Err(MailError::Provider { status, body }) => {
                assert_eq!(status, 422);
                assert!(body.contains("invalid from"));
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
