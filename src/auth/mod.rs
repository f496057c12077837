//! # Auth Module
//!
//! Cookie-based session authentication and the ownership checks applied
//! before every mutation.
//!
//! - `crypto`: salted SHA-256 password credentials
//! - `signer`: HMAC-signed cookie values
//! - `validate`: username/password/email rules
//! - `guard`: author checks and the like toggle

pub mod errors;
pub mod crypto;
pub mod signer;
pub mod validate;
pub mod user;
pub mod identity;
pub mod guard;
pub mod api;

pub use api::AuthService;
pub use errors::{AuthError, AuthResult};
pub use guard::{authorize, require_identity, toggle_like, LikeOutcome, Likeable, Owned};
pub use identity::SessionIdentity;
pub use signer::CookieSigner;
pub use user::{InMemoryUserRepository, User, UserRepository};
pub use validate::{SignupForm, ValidationErrors};
