//! Transactional email for friend invitations.
//!
//! - [`templates`]: the request and acceptance messages
//! - [`InviteSigner`]: optional HMAC token carried in accept links
//! - [`MailClient`]: Resend-compatible HTTP sender, a logged no-op when no
//!   API key is configured

mod client;
mod signer;
pub mod templates;

pub use client::{MailClient, MailOutcome, API_KEY_ENV, PLACEHOLDER_API_KEY};
pub use signer::InviteSigner;
pub use templates::{friend_accepted_email, friend_request_email};

use serde::{Deserialize, Deserializer, Serialize};

/// Who invites whom. Field names match the JSON the routes accept.
///
/// Absent and `null` fields both read as empty; [`FriendInvite::is_complete`]
/// decides whether the invite is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendInvite {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub friend_email: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub friend_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sender_email: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl FriendInvite {
    /// True when every field has a non-blank value.
    pub fn is_complete(&self) -> bool {
        [
            &self.friend_email,
            &self.friend_name,
            &self.sender_name,
            &self.sender_email,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// A message ready for the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_completeness() {
        let mut invite = FriendInvite {
            friend_email: "rachel.k@example.com".into(),
            friend_name: "Rachel".into(),
            sender_name: "Sam".into(),
            sender_email: "sam@example.com".into(),
        };
        assert!(invite.is_complete());
        invite.sender_name = "  ".into();
        assert!(!invite.is_complete());
    }

    #[test]
    fn invite_accepts_partial_json() {
        let invite: FriendInvite = serde_json::from_str(r#"{"friendEmail":"a@b.c"}"#).unwrap();
        assert_eq!(invite.friend_email, "a@b.c");
        assert!(!invite.is_complete());
    }

    #[test]
    fn invite_treats_null_as_missing() {
        let invite: FriendInvite =
            serde_json::from_str(r#"{"friendEmail":"a@b.c","senderName":null}"#).unwrap();
        assert_eq!(invite.sender_name, "");
        assert!(!invite.is_complete());
    }
}
