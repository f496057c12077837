//! # Session Identity
//!
//! The user recovered from a verified session cookie. Lives for one request.

use serde::Serialize;
use tower_cookies::Cookie;

use super::user::User;

/// Who is acting on this request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionIdentity {
    pub user_id: u64,
    pub name: String,
}

impl From<&User> for SessionIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
        }
    }
}

/// Cookie set on login/signup: `name=<token>; Path=/`
pub fn login_cookie(name: &str, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), token);
    cookie.set_path("/");
    cookie
}

/// Cookie set on logout: `name=; Path=/`
pub fn logout_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name.to_string(), String::new());
    cookie.set_path("/");
    cookie
}

/// Pull a named cookie's raw value out of a `Cookie:` request header
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_cookie_format() {
        let cookie = login_cookie("user_id", "1|abc123".to_string());
        assert_eq!(cookie.to_string(), "user_id=1|abc123; Path=/");
    }

    #[test]
    fn test_logout_cookie_format() {
        assert_eq!(logout_cookie("user_id").to_string(), "user_id=; Path=/");
    }

    #[test]
    fn test_cookie_value_lookup() {
        let header = "theme=dark; user_id=7|deadbeef; other=x";
        assert_eq!(cookie_value(header, "user_id"), Some("7|deadbeef".to_string()));
        assert_eq!(cookie_value(header, "missing"), None);
        assert_eq!(cookie_value("", "user_id"), None);
    }

    #[test]
    fn test_identity_from_user() {
        let user = User {
            id: 3,
            name: "alice".to_string(),
            credential: "abcde|00".to_string(),
            email: None,
            created: chrono::Utc::now(),
        };
        let identity = SessionIdentity::from(&user);
        assert_eq!(identity.user_id, 3);
        assert_eq!(identity.name, "alice");
    }
}
