//! Accounts and sessions.
//!
//! [`AuthProvider`] is the seam between the app and whatever holds
//! accounts. [`LocalAuth`] is the demo-mode provider: a single user and
//! session kept in [`LocalStorage`] under `demoUser` / `demoSession`.
//! Passwords are accepted but never checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, ValidationError};
use crate::storage::LocalStorage;
use crate::store::parse_enum;

const USER_KEY: &str = "demoUser";
const SESSION_KEY: &str = "demoSession";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Friend,
}

impl std::str::FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_enum("role", s, &[("admin", Role::Admin), ("friend", Role::Friend)])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
}

/// Partial profile update; `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.display_name.is_none() && self.role.is_none()
    }
}

pub trait AuthProvider {
    fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    fn sign_out(&self) -> Result<(), AuthError>;

    /// Current session, if any.
    fn session(&self) -> Result<Option<Session>, AuthError>;

    fn profile(&self) -> Result<Option<UserProfile>, AuthError>;

    fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, AuthError>;

    /// Current session or [`AuthError::NotSignedIn`].
    fn require_session(&self) -> Result<Session, AuthError> {
        self.session()?.ok_or(AuthError::NotSignedIn)
    }
}

fn check_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidCredentials(format!(
            "'{email}' is not an email address"
        )));
    }
    Ok(email.to_string())
}

fn demo_id() -> String {
    format!("demo_{}", uuid::Uuid::new_v4().simple())
}

pub struct LocalAuth<'a> {
    storage: &'a LocalStorage,
}

impl<'a> LocalAuth<'a> {
    pub fn new(storage: &'a LocalStorage) -> Self {
        Self { storage }
    }

    fn stored_user(&self) -> Result<Option<UserProfile>, AuthError> {
        match self.storage.get(USER_KEY)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    fn store_user(&self, user: &UserProfile) -> Result<(), AuthError> {
        self.storage.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    fn store_session(&self, user: UserProfile) -> Result<Session, AuthError> {
        let session = Session { user };
        self.storage
            .set(SESSION_KEY, &serde_json::to_string(&session)?)?;
        Ok(session)
    }
}

impl AuthProvider for LocalAuth<'_> {
    fn sign_up(
        &self,
        email: &str,
        _password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let email = check_email(email)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "display name must not be empty".into(),
            ));
        }

        let now = Utc::now();
        let user = UserProfile {
            id: demo_id(),
            email,
            display_name: display_name.to_string(),
            role: Role::Admin,
            created_at: now,
            updated_at: now,
        };
        self.store_user(&user)?;
        tracing::info!(user_id = %user.id, "signed up");
        self.store_session(user)
    }

    fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        let email = check_email(email)?;
        let user = match self.stored_user()? {
            Some(user) => user,
            None => {
                let now = Utc::now();
                let local_part = email.split('@').next().unwrap_or_default().to_string();
                let user = UserProfile {
                    id: demo_id(),
                    email,
                    display_name: local_part,
                    role: Role::Admin,
                    created_at: now,
                    updated_at: now,
                };
                self.store_user(&user)?;
                user
            }
        };
        tracing::info!(user_id = %user.id, "signed in");
        self.store_session(user)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        self.storage.remove(USER_KEY)?;
        self.storage.remove(SESSION_KEY)?;
        tracing::info!("signed out");
        Ok(())
    }

    fn session(&self) -> Result<Option<Session>, AuthError> {
        let Some(blob) = self.storage.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&blob) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                tracing::warn!(%err, "ignoring unreadable session");
                Ok(None)
            }
        }
    }

    fn profile(&self) -> Result<Option<UserProfile>, AuthError> {
        self.stored_user()
    }

    fn update_profile(&self, update: ProfileUpdate) -> Result<UserProfile, AuthError> {
        let mut user = self.stored_user()?.ok_or(AuthError::UserNotFound)?;
        if let Some(email) = update.email {
            user.email = check_email(&email)?;
        }
        if let Some(name) = update.display_name {
            let name = name.trim();
            if !name.is_empty() {
                user.display_name = name.to_string();
            }
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        user.updated_at = Utc::now();
        self.store_user(&user)?;

        // Keep an open session pointing at the fresh profile.
        if self.session()?.is_some() {
            self.store_session(user.clone())?;
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalStorage {
        LocalStorage::open_memory().unwrap()
    }

    #[test]
    fn role_parses_lowercase_names() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("friend".parse::<Role>().unwrap(), Role::Friend);
        let err = "owner".parse::<Role>().unwrap_err();
        assert!(err.to_string().contains("admin, friend"), "{err}");
    }

    #[test]
    fn sign_up_creates_admin_and_session() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        let session = auth.sign_up("sam@example.com", "pw", "Sam").unwrap();
        assert!(session.user.id.starts_with("demo_"));
        assert_eq!(session.user.role, Role::Admin);
        assert_eq!(session.user.display_name, "Sam");
        assert_eq!(auth.session().unwrap(), Some(session.clone()));
        assert_eq!(auth.profile().unwrap(), Some(session.user));
    }

    #[test]
    fn sign_in_without_user_derives_name_from_email() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        let session = auth.sign_in("jordan@example.com", "whatever").unwrap();
        assert_eq!(session.user.display_name, "jordan");
        assert_eq!(session.user.email, "jordan@example.com");
    }

    #[test]
    fn sign_in_reuses_stored_user() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        let first = auth.sign_up("sam@example.com", "pw", "Sam").unwrap();
        storage.remove(SESSION_KEY).unwrap();
        assert!(auth.session().unwrap().is_none());

        let again = auth.sign_in("other@example.com", "pw").unwrap();
        assert_eq!(again.user.id, first.user.id);
    }

    #[test]
    fn sign_out_forgets_user_and_session() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        auth.sign_up("sam@example.com", "pw", "Sam").unwrap();
        auth.sign_out().unwrap();
        assert!(auth.session().unwrap().is_none());
        assert!(auth.profile().unwrap().is_none());
        assert!(matches!(auth.require_session(), Err(AuthError::NotSignedIn)));
    }

    #[test]
    fn rejects_bad_email() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        assert!(matches!(
            auth.sign_up("not-an-email", "pw", "Sam"),
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(auth.sign_in("", "pw").is_err());
    }

    #[test]
    fn update_profile_merges_and_refreshes_session() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        let before = auth.sign_up("sam@example.com", "pw", "Sam").unwrap().user;
        let updated = auth
            .update_profile(ProfileUpdate {
                display_name: Some("Samantha".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.display_name, "Samantha");
        assert_eq!(updated.email, before.email);
        assert!(updated.updated_at >= before.updated_at);
        assert_eq!(auth.require_session().unwrap().user, updated);
    }

    #[test]
    fn update_profile_without_user_fails() {
        let storage = storage();
        let auth = LocalAuth::new(&storage);
        assert!(matches!(
            auth.update_profile(ProfileUpdate::default()),
            Err(AuthError::UserNotFound)
        ));
    }

    #[test]
    fn corrupt_session_reads_as_signed_out() {
        let storage = storage();
        storage.set(SESSION_KEY, "nope").unwrap();
        let auth = LocalAuth::new(&storage);
        assert!(auth.session().unwrap().is_none());
    }
}
