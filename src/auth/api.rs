//! # Auth Service
//!
//! Signup, login and per-request identity resolution on top of a
//! [`UserRepository`] and a [`CookieSigner`].

use std::sync::Arc;

use super::crypto::{hash_password, verify_password};
use super::errors::{AuthError, AuthResult};
use super::identity::SessionIdentity;
use super::signer::CookieSigner;
use super::user::{NewUser, User, UserRepository};
use super::validate::{valid_password, Field, SignupForm, ValidationErrors};

/// Auth service combining user storage and cookie signing
pub struct AuthService<U: UserRepository> {
    users: Arc<U>,
    signer: CookieSigner,
    // Verified against when the username is unknown, so both login failure
    // paths hash once.
    decoy_credential: String,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, signer: CookieSigner) -> Self {
        Self {
            users: Arc::new(users),
            signer,
            decoy_credential: hash_password("", ""),
        }
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    /// Register a new user
    ///
    /// Returns the stored user and the signed token for the session cookie.
    pub fn signup(&self, form: &SignupForm) -> AuthResult<(User, String)> {
        form.validate().map_err(AuthError::Validation)?;

        // The repository re-checks under its write lock; this check only
        // avoids hashing for a name that is already taken.
        if self.users.name_exists(&form.username)? {
            tracing::info!(username = %form.username, "signup rejected: name taken");
            return Err(AuthError::Validation(ValidationErrors::single(
                Field::Username,
                super::user::USER_EXISTS,
            )));
        }

        let user = self
            .users
            .create(NewUser::register(&form.username, &form.password, form.email()))?;
        tracing::info!(user_id = user.id, username = %user.name, "user signed up");

        let token = self.issue_token(&user);
        Ok((user, token))
    }

    /// Authenticate a user
    ///
    /// Unknown users and wrong passwords fail identically.
    pub fn login(&self, username: &str, password: &str) -> AuthResult<(User, String)> {
        let user = match self.users.find_by_name(username)? {
            Some(user) if user.verify_password(password) => user,
            Some(_) => {
                tracing::info!("login failed");
                return Err(AuthError::InvalidCredentials);
            }
            None => {
                let _ = verify_password(username, password, &self.decoy_credential);
                tracing::info!("login failed");
                return Err(AuthError::InvalidCredentials);
            }
        };

        tracing::info!(user_id = user.id, "user logged in");
        let token = self.issue_token(&user);
        Ok((user, token))
    }

    /// Resolve the identity carried by a session cookie value
    ///
    /// Any failure (no cookie, bad signature, non-numeric id, deleted user)
    /// resolves to no identity.
    pub fn resolve(&self, token: Option<&str>) -> Option<SessionIdentity> {
        let token = token.filter(|t| !t.is_empty())?;

        let Some(value) = self.signer.verify(token) else {
            tracing::debug!("session cookie failed verification");
            return None;
        };
        let user_id: u64 = value.parse().ok()?;

        match self.users.find_by_id(user_id) {
            Ok(Some(user)) => Some(SessionIdentity::from(&user)),
            Ok(None) => None,
            Err(e) => {
                tracing::error!(error = %e, "identity lookup failed");
                None
            }
        }
    }

    /// Replace the caller's credential after re-checking the current password
    pub fn change_password(
        &self,
        identity: &SessionIdentity,
        current: &str,
        new_password: &str,
        verify: &str,
    ) -> AuthResult<()> {
        let user = self
            .users
            .find_by_id(identity.user_id)?
            .ok_or(AuthError::AuthenticationRequired)?;

        if !user.verify_password(current) {
            return Err(AuthError::InvalidCredentials);
        }

        let mut errors = ValidationErrors::default();
        if !valid_password(new_password) {
            errors.push(Field::Password, "That wasn't a valid password.");
        } else if new_password != verify {
            errors.push(Field::Verify, "Your passwords didn't match.");
        }
        errors.into_result().map_err(AuthError::Validation)?;

        self.users
            .update_credential(user.id, hash_password(&user.name, new_password))?;
        tracing::info!(user_id = user.id, "password changed");
        Ok(())
    }

    fn issue_token(&self, user: &User) -> String {
        self.signer.sign(&user.id.to_string())
    }
}
