//! # Ownership Guard
//!
//! Every mutation of a post or comment goes through the same sequence:
//! resolve the session identity, load the resource, compare its recorded
//! author with the identity's name.
//!
//! ```text
//! Start -> Unauthenticated                      (AuthenticationRequired)
//! Start -> Authenticated -> missing resource    (NotFound)
//!                        -> Unauthorized        (Unauthorized)
//!                        -> Authorized -> Mutated
//! ```

use std::collections::BTreeSet;

use super::errors::{AuthError, AuthResult};
use super::identity::SessionIdentity;

/// A record with a fixed author
pub trait Owned {
    /// Human readable record kind, used in "not found" messages
    const KIND: &'static str;

    fn author(&self) -> &str;
}

/// A record that keeps the set of user ids that liked it
pub trait Likeable: Owned {
    fn liked_users(&self) -> &BTreeSet<u64>;
    fn liked_users_mut(&mut self) -> &mut BTreeSet<u64>;
}

/// Result of a like toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
    Liked,
    Unliked,
    /// Authors cannot like their own records; nothing changed
    SelfLike,
}

impl LikeOutcome {
    /// Whether the record was modified and needs to be written back
    pub fn changed(&self) -> bool {
        !matches!(self, LikeOutcome::SelfLike)
    }
}

/// Fail with `AuthenticationRequired` when no identity was resolved
pub fn require_identity(identity: Option<&SessionIdentity>) -> AuthResult<&SessionIdentity> {
    identity.ok_or(AuthError::AuthenticationRequired)
}

/// Fail with `NotFound` when the lookup came back empty
pub fn require_resource<R: Owned>(resource: Option<R>) -> AuthResult<R> {
    resource.ok_or_else(|| AuthError::NotFound(R::KIND.to_string()))
}

/// Run the full guard and hand back the resource when the identity owns it
pub fn authorize<R: Owned>(identity: Option<&SessionIdentity>, resource: Option<R>) -> AuthResult<R> {
    let identity = require_identity(identity)?;
    let resource = require_resource(resource)?;

    if resource.author() != identity.name {
        tracing::warn!(
            user_id = identity.user_id,
            kind = R::KIND,
            author = resource.author(),
            "mutation denied: not the author"
        );
        return Err(AuthError::Unauthorized);
    }

    Ok(resource)
}

/// Add or remove the identity's like
pub fn toggle_like<R: Likeable>(identity: &SessionIdentity, resource: &mut R) -> LikeOutcome {
    if resource.author() == identity.name {
        return LikeOutcome::SelfLike;
    }

    let liked = resource.liked_users_mut();
    if liked.remove(&identity.user_id) {
        LikeOutcome::Unliked
    } else {
        liked.insert(identity.user_id);
        LikeOutcome::Liked
    }
}
