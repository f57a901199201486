//! Session and identity management.
//!
//! [`SessionManager`] owns the account registry and the signed-in user. It
//! validates credentials against the persisted registry and mirrors every
//! change to storage before committing it in memory.

mod error;

pub use error::AuthError;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use ecofinds_core::{Email, Password, UserId};

use crate::models::{ProfileUpdate, RegisteredUser, User};
use crate::storage::{Storage, keys};

/// Owner of the registry and the current session.
#[derive(Debug)]
pub struct SessionManager {
    storage: Storage,
    users: Vec<RegisteredUser>,
    current: Option<User>,
}

impl SessionManager {
    /// Rehydrate the registry and session from storage.
    ///
    /// Malformed slots are discarded (see [`Storage::load_or_default`]), so
    /// this never fails.
    #[instrument(skip(storage))]
    pub fn load(storage: Storage) -> Self {
        let users: Vec<RegisteredUser> = storage.load_or_default(keys::USERS_REGISTRY);
        let current: Option<User> = storage.load_or_default(keys::CURRENT_SESSION);

        if let Some(user) = &current {
            debug!(user_id = %user.id, "Restored session");
        }
        debug!(accounts = users.len(), "Loaded user registry");

        Self {
            storage,
            users,
            current,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// All registry entries, in registration order.
    #[must_use]
    pub fn users(&self) -> &[RegisteredUser] {
        &self.users
    }

    /// Look up a registered user by ID.
    #[must_use]
    pub fn find_user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|entry| &entry.user)
            .find(|user| &user.id == id)
    }

    // =========================================================================
    // Password Authentication
    // =========================================================================

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmptyUsername` / `AuthError::EmptyPassword` for blank input.
    /// Returns `AuthError::DuplicateIdentity` if the email or username is taken.
    /// Returns `AuthError::Storage` if the registry or session cannot be persisted;
    /// in that case nothing changes.
    #[instrument(skip(self, password))]
    pub fn register(
        &mut self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        if username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        if self.identity_taken(Some(email.as_str()), Some(username), None) {
            info!("Registration rejected: email or username already registered");
            return Err(AuthError::DuplicateIdentity);
        }

        let entry = RegisteredUser {
            user: User {
                id: UserId::generate(),
                email,
                username: username.to_owned(),
                name: String::new(),
                phone: String::new(),
                address: String::new(),
                avatar: None,
            },
            password: Password::new(password),
        };

        let mut users = self.users.clone();
        users.push(entry.clone());
        self.persist_identity(&users, &entry.user)?;

        self.users = users;
        self.current = Some(entry.user.clone());
        info!(user_id = %entry.user.id, "Registered user");

        Ok(entry.user)
    }

    /// Sign in with an exact email and password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no registry entry matches.
    /// Returns `AuthError::Storage` if the session cannot be persisted.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = self
            .users
            .iter()
            .find(|entry| entry.matches_credentials(email, password))
            .map(|entry| entry.user.clone())
            .ok_or(AuthError::InvalidCredentials)?;

        self.storage.save(keys::CURRENT_SESSION, &user)?;
        self.current = Some(user.clone());
        info!(user_id = %user.id, "Signed in");

        Ok(user)
    }

    /// Sign out. Idempotent.
    ///
    /// The in-memory session is always cleared.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the persisted session cannot be removed.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        if let Some(user) = self.current.take() {
            info!(user_id = %user.id, "Signed out");
        }
        self.storage.remove(keys::CURRENT_SESSION)?;
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Merge `update` into the signed-in user and their registry entry.
    ///
    /// Returns `Ok(None)` without touching anything when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `AuthError::EmptyUsername` for invalid new values.
    /// Returns `AuthError::DuplicateIdentity` if a new email or username belongs
    /// to another account.
    /// Returns `AuthError::Storage` if persisting fails; nothing changes in that case.
    #[instrument(skip(self, update))]
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> Result<Option<User>, AuthError> {
        let Some(current) = &self.current else {
            debug!("Profile update ignored: no active session");
            return Ok(None);
        };

        let email = update.email.as_deref().map(Email::parse).transpose()?;
        if update
            .username
            .as_deref()
            .is_some_and(|username| username.trim().is_empty())
        {
            return Err(AuthError::EmptyUsername);
        }
        if self.identity_taken(
            email.as_ref().map(Email::as_str),
            update.username.as_deref(),
            Some(&current.id),
        ) {
            info!(user_id = %current.id, "Profile update rejected: identity already registered");
            return Err(AuthError::DuplicateIdentity);
        }

        let mut session = current.clone();
        update.apply(&mut session, email.as_ref());

        let mut users = self.users.clone();
        match users.iter_mut().find(|entry| entry.user.id == session.id) {
            Some(entry) => update.apply(&mut entry.user, email.as_ref()),
            None => warn!(user_id = %session.id, "Session user missing from registry"),
        }

        self.persist_identity(&users, &session)?;

        self.users = users;
        self.current = Some(session.clone());
        info!(user_id = %session.id, "Updated profile");

        Ok(Some(session))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Whether another account already holds `email` or `username`.
    fn identity_taken(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        except: Option<&UserId>,
    ) -> bool {
        self.users
            .iter()
            .filter(|entry| except.is_none_or(|id| &entry.user.id != id))
            .any(|entry| {
                email.is_some_and(|email| entry.user.email.matches(email))
                    || username.is_some_and(|username| entry.user.username == username)
            })
    }

    /// Write registry then session; undo the registry write if the session
    /// write fails.
    fn persist_identity(&self, users: &[RegisteredUser], session: &User) -> Result<(), AuthError> {
        self.storage.save(keys::USERS_REGISTRY, users)?;

        if let Err(e) = self.storage.save(keys::CURRENT_SESSION, session) {
            self.restore(keys::USERS_REGISTRY, &self.users);
            return Err(e.into());
        }
        Ok(())
    }

    fn restore<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.storage.save(key, value) {
            error!(key, error = %e, "Failed to roll back persisted state");
        }
    }
}
