//! Account registration and credential checking.

use std::sync::Arc;

use tracing::warn;

use super::crypto::{self, PasswordHashError};
use super::error::Error;
use super::ports::{UserPersistenceError, UserRepository};
use super::user::{Password, Role, User, Username};

/// Message returned for any credential failure during login. Unknown
/// usernames and wrong passwords are indistinguishable to the caller.
const INVALID_CREDENTIALS: &str = "invalid username or password";

/// Application service for account registration and login.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    /// Build the service over a credential store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new account.
    ///
    /// The role is derived from the username at registration time; a taken
    /// username yields a conflict.
    pub async fn register(&self, username: Username, password: &Password) -> Result<User, Error> {
        let verifier = crypto::hash_password(password).map_err(hash_failure)?;
        let role = Role::for_username(&username);
        let user = User::new(username, role, verifier);
        match self.users.insert(&user).await {
            Ok(()) => Ok(user),
            Err(UserPersistenceError::DuplicateUsername { .. }) => {
                Err(Error::conflict("username is already taken"))
            }
            Err(err) => Err(user_store_failure(err)),
        }
    }

    /// Check credentials and return the stored user on success.
    pub async fn login(&self, username: &Username, password: &Password) -> Result<User, Error> {
        let Some(user) = self
            .users
            .find_by_username(username)
            .await
            .map_err(user_store_failure)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches =
            crypto::verify_password(password, user.verifier()).map_err(hash_failure)?;
        if matches {
            Ok(user)
        } else {
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

fn user_store_failure(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user store unreachable");
            Error::service_unavailable("user store is unavailable")
        }
        UserPersistenceError::Query { message } => {
            warn!(error = %message, "user store query failed");
            Error::internal("user store query failed")
        }
        UserPersistenceError::DuplicateUsername { username } => {
            // Reached only from lookups, where a duplicate cannot occur.
            warn!(username = %username, "unexpected duplicate during lookup");
            Error::internal("user store query failed")
        }
    }
}

fn hash_failure(err: PasswordHashError) -> Error {
    warn!(error = %err, "password hashing failed");
    Error::internal("credential processing failed")
}
