//! Accounts and the signed-in session.
//!
//! Credentials live in a single list under [`USERS_KEY`]. Signing in writes a
//! [`Session`] record either to the persistent store ("remember me") or to the
//! ephemeral one; reading the session checks the persistent store first.

mod profile;

pub use profile::{display_name, initials, university_display, ProfileUpdate};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, Result, ValidationError};
use crate::storage::{
    load_json, load_record, save_json, KvStore, Storage, SESSION_KEY, USERS_KEY,
};

/// University shown when a user has not picked one.
pub const DEFAULT_UNIVERSITY: &str = "University";

/// A registered account.
///
/// Passwords are stored as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The signed-in identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub full_name: String,
    pub university: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Where the session record is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionScope {
    /// Survives restarts ("remember me").
    Local,
    /// Cleared with the ephemeral store.
    Session,
}

/// Registration form input.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub university: String,
    pub major: String,
}

/// Trim and lower-case an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl Registration {
    fn validate(&self) -> Result<(), ValidationError> {
        let email = normalize_email(&self.email);
        if email.is_empty() || !email.contains('@') {
            return Err(ValidationError::invalid("email", "must be a valid email address"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::invalid("password", "must not be empty"));
        }
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::invalid("full_name", "must not be empty"));
        }
        Ok(())
    }
}

/// In-memory view of accounts and the current session.
#[derive(Debug, Clone, Default)]
pub struct UserStore {
    users: Vec<User>,
    session: Option<(Session, SessionScope)>,
}

impl UserStore {
    /// Load the credentials list and the session, persistent store first.
    pub fn load(storage: &Storage) -> Self {
        let users = load_json(storage.local.as_ref(), USERS_KEY);
        let session = load_record::<Session>(storage.local.as_ref(), SESSION_KEY)
            .map(|s| (s, SessionScope::Local))
            .or_else(|| {
                load_record::<Session>(storage.session.as_ref(), SESSION_KEY)
                    .map(|s| (s, SessionScope::Session))
            });
        Self { users, session }
    }

    /// Write the credentials list and the session record.
    ///
    /// The session is written only to its own scope and removed from the
    /// other; with no session both copies are removed.
    pub fn save(&self, storage: &Storage) -> Result<()> {
        save_json(storage.local.as_ref(), USERS_KEY, &self.users)?;
        match &self.session {
            Some((session, SessionScope::Local)) => {
                save_json(storage.local.as_ref(), SESSION_KEY, session)?;
                storage.session.remove(SESSION_KEY)?;
            }
            Some((session, SessionScope::Session)) => {
                save_json(storage.session.as_ref(), SESSION_KEY, session)?;
                storage.local.remove(SESSION_KEY)?;
            }
            None => {
                storage.local.remove(SESSION_KEY)?;
                storage.session.remove(SESSION_KEY)?;
            }
        }
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().map(|(s, _)| s)
    }

    pub fn session_scope(&self) -> Option<SessionScope> {
        self.session.as_ref().map(|(_, scope)| *scope)
    }

    /// Identifier tasks and pomodoro sessions are scoped to.
    pub fn current_user_id(&self) -> Option<&str> {
        self.session().map(|s| s.email.as_str())
    }

    /// Full account record of the signed-in user.
    pub fn current_user(&self) -> Option<&User> {
        let email = self.current_user_id()?;
        self.users.iter().find(|u| u.email == email)
    }

    /// Create an account.
    ///
    /// # Errors
    /// `AuthError::DuplicateEmail` if the normalised email is taken, or a
    /// validation error for an unusable email/password/name.
    pub fn register(&mut self, registration: Registration) -> Result<&User> {
        registration.validate()?;
        let email = normalize_email(&registration.email);
        if self.users.iter().any(|u| u.email == email) {
            return Err(AuthError::DuplicateEmail(email).into());
        }

        self.users.push(User {
            email,
            password: registration.password,
            full_name: registration.full_name.trim().to_string(),
            date_of_birth: registration.date_of_birth,
            university: registration.university,
            major: registration.major,
            avatar: None,
            created_at: Some(Utc::now()),
        });
        tracing::debug!(count = self.users.len(), "registered user");
        Ok(&self.users[self.users.len() - 1])
    }

    /// Sign in and record the session in the requested scope.
    ///
    /// # Errors
    /// `AuthError::InvalidCredentials` when no account matches.
    pub fn login(&mut self, email: &str, password: &str, remember_me: bool) -> Result<&Session> {
        let email = normalize_email(email);
        let user = self
            .users
            .iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session {
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            university: university_display(&user.university).to_string(),
            avatar: user.avatar.clone(),
            created_at: Utc::now(),
        };
        let scope = if remember_me {
            SessionScope::Local
        } else {
            SessionScope::Session
        };
        let (session, _) = self.session.insert((session, scope));
        Ok(session)
    }

    /// Forget the session. Signing out twice is harmless.
    pub fn logout(&mut self) {
        self.session = None;
    }

    /// Apply a profile edit to the signed-in user.
    ///
    /// Returns `Ok(false)` when the update matches the stored profile.
    ///
    /// # Errors
    /// `AuthError::NotSignedIn` without a session, or the first failing
    /// field from [`ProfileUpdate::validate`].
    pub fn update_profile(&mut self, update: ProfileUpdate, today: NaiveDate) -> Result<bool> {
        let (session, _) = self.session.as_mut().ok_or(AuthError::NotSignedIn)?;
        update.validate(today)?;

        let user = self
            .users
            .iter_mut()
            .find(|u| u.email == session.email)
            .ok_or(AuthError::NotSignedIn)?;
        if !update.differs_from(user) {
            return Ok(false);
        }

        update.apply_to(user);
        session.full_name = user.full_name.clone();
        session.university = university_display(&user.university).to_string();
        session.avatar = user.avatar.clone();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> Registration {
        Registration {
            email: email.to_string(),
            password: "Secret123".to_string(),
            full_name: "Nguyen Van An".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(2003, 4, 5),
            university: "FPT University".to_string(),
            major: "Computer Science".to_string(),
        }
    }

    #[test]
    fn register_normalizes_email() {
        let mut store = UserStore::default();
        let user = store.register(registration("  An@Uni.EDU ")).unwrap();
        assert_eq!(user.email, "an@uni.edu");
    }

    #[test]
    fn duplicate_email_rejected_case_insensitively() {
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        let err = store.register(registration("AN@uni.edu")).unwrap_err();
        assert!(matches!(err, crate::CoreError::Auth(AuthError::DuplicateEmail(_))));
        assert_eq!(store.users().len(), 1);
    }

    #[test]
    fn register_rejects_bad_email() {
        let mut store = UserStore::default();
        assert!(store.register(registration("not-an-email")).is_err());
    }

    #[test]
    fn login_with_wrong_password_fails() {
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        let err = store.login("an@uni.edu", "nope", false).unwrap_err();
        assert!(matches!(err, crate::CoreError::Auth(AuthError::InvalidCredentials)));
        assert!(store.session().is_none());
    }

    #[test]
    fn login_sets_session_and_scope() {
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        let session = store.login(" AN@uni.edu", "Secret123", true).unwrap();
        assert_eq!(session.email, "an@uni.edu");
        assert_eq!(store.session_scope(), Some(SessionScope::Local));
        assert_eq!(store.current_user_id(), Some("an@uni.edu"));
    }

    #[test]
    fn session_scope_controls_which_store_is_written() {
        let storage = Storage::in_memory().unwrap();
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        store.login("an@uni.edu", "Secret123", false).unwrap();
        store.save(&storage).unwrap();

        assert!(storage.local.get(SESSION_KEY).unwrap().is_none());
        assert!(storage.session.get(SESSION_KEY).unwrap().is_some());

        let reloaded = UserStore::load(&storage);
        assert_eq!(reloaded.current_user_id(), Some("an@uni.edu"));
        assert_eq!(reloaded.session_scope(), Some(SessionScope::Session));
    }

    #[test]
    fn logout_clears_both_stores() {
        let storage = Storage::in_memory().unwrap();
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        store.login("an@uni.edu", "Secret123", true).unwrap();
        store.save(&storage).unwrap();

        store.logout();
        store.save(&storage).unwrap();
        assert!(storage.local.get(SESSION_KEY).unwrap().is_none());
        assert!(storage.session.get(SESSION_KEY).unwrap().is_none());
        assert!(UserStore::load(&storage).session().is_none());
        assert_eq!(UserStore::load(&storage).users().len(), 1);
    }

    #[test]
    fn malformed_session_means_signed_out() {
        let storage = Storage::in_memory().unwrap();
        storage.local.set(SESSION_KEY, "{\"email\": 42").unwrap();
        assert!(UserStore::load(&storage).session().is_none());
    }

    #[test]
    fn update_profile_requires_session() {
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let update = ProfileUpdate::from_user(&store.users()[0].clone());
        let err = store.update_profile(update, today).unwrap_err();
        assert!(matches!(err, crate::CoreError::Auth(AuthError::NotSignedIn)));
    }

    #[test]
    fn update_profile_changes_user_and_session() {
        let mut store = UserStore::default();
        store.register(registration("an@uni.edu")).unwrap();
        store.login("an@uni.edu", "Secret123", true).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let mut update = ProfileUpdate::from_user(store.current_user().unwrap());
        assert!(!store.update_profile(update.clone(), today).unwrap());

        update.full_name = "Tran Thi Binh".into();
        update.university = "RMIT Vietnam".into();
        assert!(store.update_profile(update, today).unwrap());
        assert_eq!(store.current_user().unwrap().full_name, "Tran Thi Binh");
        assert_eq!(store.session().unwrap().university, "RMIT Vietnam");
    }
}
