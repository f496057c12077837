//! # Field Validators
//!
//! Pure predicates over form input. Form-level checks collect every failing
//! field instead of stopping at the first one.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap())
}

// Lenient on purpose: the `.` matches any character.
fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\S]+@[\S]+.[\S]+$").unwrap())
}

/// 3-20 letters, digits, `_` or `-`
pub fn valid_username(s: &str) -> bool {
    username_re().is_match(s)
}

/// 3-20 characters of anything, newlines included
pub fn valid_password(s: &str) -> bool {
    (3..=20).contains(&s.chars().count())
}

/// Empty (email is optional) or shaped like `local@domain.tld`
pub fn valid_email(s: &str) -> bool {
    s.is_empty() || email_re().is_match(s)
}

/// Form field a validation message refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Username,
    Password,
    Verify,
    Email,
    Subject,
    Body,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Username => "username",
            Field::Password => "password",
            Field::Verify => "verify",
            Field::Email => "email",
            Field::Subject => "subject",
            Field::Body => "body",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// All field errors from one validation pass, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Message for a field, if it was rejected
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was rejected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

impl SignupForm {
    /// Check every field; the password confirmation is its own rule
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if !valid_username(&self.username) {
            errors.push(Field::Username, "That's not a valid username.");
        }

        if !valid_password(&self.password) {
            errors.push(Field::Password, "That wasn't a valid password.");
        } else if self.password != self.verify {
            errors.push(Field::Verify, "Your passwords didn't match.");
        }

        if !valid_email(&self.email) {
            errors.push(Field::Email, "That's not a valid email.");
        }

        errors.into_result()
    }

    /// The optional email, `None` when left blank
    pub fn email(&self) -> Option<String> {
        if self.email.is_empty() {
            None
        } else {
            Some(self.email.clone())
        }
    }
}

/// Subject and body are both required for a post
pub fn validate_post(subject: &str, body: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if subject.trim().is_empty() {
        errors.push(Field::Subject, "Subject is required.");
    }
    if body.trim().is_empty() {
        errors.push(Field::Body, "Body is required.");
    }

    errors.into_result()
}

/// A comment needs a non-blank body
pub fn validate_comment(body: &str) -> Result<(), ValidationErrors> {
    if body.trim().is_empty() {
        Err(ValidationErrors::single(Field::Body, "Comment cannot be empty."))
    } else {
        Ok(())
    }
}
