//! Application state.

use focusos_core::mail::{InviteSigner, MailClient};
use focusos_core::storage::MailConfig;
use focusos_core::MailError;

/// Shared across handlers; cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub mail: MailClient,
    /// Sender address for outgoing mail.
    pub from: String,
    /// Base URL used in email links.
    pub app_url: String,
    /// Present when accept links are signed.
    pub signer: Option<InviteSigner>,
}

impl AppState {
    pub fn new(mail: MailClient, config: &MailConfig) -> Result<Self, MailError> {
        let signer = match config.invite_secret.as_deref() {
            Some(secret) if !secret.is_empty() => Some(InviteSigner::new(secret)?),
            _ => None,
        };
        Ok(Self {
            mail,
            from: config.from.clone(),
            app_url: config.app_url.clone(),
            signer,
        })
    }

    /// Mail client keyed from `RESEND_API_KEY`.
    pub fn from_env(config: &MailConfig) -> Result<Self, MailError> {
        Self::new(MailClient::from_env(config.api_base.clone()), config)
    }
}
