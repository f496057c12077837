//! Shared application state and the session identity extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;

use crate::auth::identity::cookie_value;
use crate::auth::{AuthService, CookieSigner, InMemoryUserRepository, SessionIdentity};
use crate::blog::{BlogService, InMemoryCommentRepository, InMemoryPostRepository};
use crate::config::{AppConfig, ConfigResult, CookieSecret};

/// State shared by every handler
pub struct AppState {
    pub auth: AuthService<InMemoryUserRepository>,
    pub blog: BlogService<InMemoryPostRepository, InMemoryCommentRepository>,
    pub cookie_name: String,
}

impl AppState {
    /// Build in-memory services keyed with the process secret
    pub fn new(config: &AppConfig, secret: &CookieSecret) -> ConfigResult<Self> {
        Ok(Self {
            auth: AuthService::new(InMemoryUserRepository::new(), CookieSigner::new(secret)?),
            blog: BlogService::new(InMemoryPostRepository::new(), InMemoryCommentRepository::new()),
            cookie_name: config.session.cookie_name.clone(),
        })
    }
}

/// The verified identity behind the request's session cookie, if any
///
/// Never rejects: handlers decide whether anonymity is acceptable.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<SessionIdentity>);

impl CurrentUser {
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| cookie_value(header, &state.cookie_name));

        Ok(CurrentUser(state.auth.resolve(token.as_deref())))
    }
}
