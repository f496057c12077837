//! Auth HTTP Routes
//!
//! Signup, login, logout and the welcome page. Successful signup and login
//! set the signed session cookie and redirect to `/welcome`.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::auth::identity::{login_cookie, logout_cookie};
use crate::auth::{AuthError, SignupForm};

use super::response::{HttpError, LOGIN_PATH};
use super::state::{AppState, CurrentUser};

/// Auth routes with shared state
pub fn auth_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/logout", get(logout_handler))
        .route("/welcome", get(welcome_handler))
        .with_state(state)
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub username: String,
}

// ==================
// Handlers
// ==================

fn with_session_cookie(state: &AppState, token: String) -> Response {
    let cookie = login_cookie(&state.cookie_name, token);
    ([(SET_COOKIE, cookie.to_string())], Redirect::to("/welcome")).into_response()
}

/// Signup handler
async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Result<Response, HttpError> {
    let (_, token) = state.auth.signup(&form)?;
    Ok(with_session_cookie(&state, token))
}

/// Login handler
async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, HttpError> {
    let (_, token) = state.auth.login(&form.username, &form.password)?;
    Ok(with_session_cookie(&state, token))
}

/// Logout handler: empty the cookie, keep its path
async fn logout_handler(State(state): State<Arc<AppState>>) -> Response {
    let cookie = logout_cookie(&state.cookie_name);
    ([(SET_COOKIE, cookie.to_string())], Redirect::to(LOGIN_PATH)).into_response()
}

/// Welcome handler
async fn welcome_handler(user: CurrentUser) -> Result<Json<WelcomeResponse>, HttpError> {
    let identity = user.0.ok_or(AuthError::AuthenticationRequired)?;
    Ok(Json(WelcomeResponse {
        username: identity.name,
    }))
}
