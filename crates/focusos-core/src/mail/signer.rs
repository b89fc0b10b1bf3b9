use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::MailError;

type HmacSha256 = Hmac<Sha256>;

/// Signs and checks the `token` query parameter of accept links.
///
/// The token is hex HMAC-SHA256 over `friend_email|sender_email`, both
/// lowercased, so a link cannot be replayed for a different pair.
#[derive(Clone)]
pub struct InviteSigner {
    keyed: HmacSha256,
}

impl InviteSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, MailError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(MailError::Invalid("invite secret must not be empty".into()));
        }
        let keyed = HmacSha256::new_from_slice(secret)
            .map_err(|e| MailError::Invalid(format!("invite secret: {e}")))?;
        Ok(Self { keyed })
    }

    fn mac(&self, friend_email: &str, sender_email: &str) -> HmacSha256 {
        let mut mac = self.keyed.clone();
        mac.update(friend_email.trim().to_lowercase().as_bytes());
        mac.update(b"|");
        mac.update(sender_email.trim().to_lowercase().as_bytes());
        mac
    }

    pub fn sign(&self, friend_email: &str, sender_email: &str) -> String {
        hex::encode(self.mac(friend_email, sender_email).finalize().into_bytes())
    }

    /// Constant-time check of `token`.
    pub fn verify(&self, friend_email: &str, sender_email: &str, token: &str) -> bool {
        let Ok(bytes) = hex::decode(token.trim()) else {
            return false;
        };
        self.mac(friend_email, sender_email)
            .verify_slice(&bytes)
            .is_ok()
    }
}

impl std::fmt::Debug for InviteSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteSigner").finish_non_exhaustive()
    }
}
