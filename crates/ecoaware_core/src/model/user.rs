//! User account model and request actor.
//!
//! # Invariants
//! - `username` is unique (enforced by storage) and matches `[\w.@+-]+`.
//! - Inactive users are never treated as authenticated actors.

use super::{now_epoch_ms, require_max_chars, require_non_nil, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

const USERNAME_MAX_CHARS: usize = 150;
const NAME_MAX_CHARS: usize = 150;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Registered community member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Empty when not provided.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: i64,
}

impl User {
    /// Creates an active, non-staff user joined now.
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_active: true,
            date_joined: now_epoch_ms(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_nil("user.id", self.id)?;
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        require_max_chars("first_name", &self.first_name, NAME_MAX_CHARS)?;
        require_max_chars("last_name", &self.last_name, NAME_MAX_CHARS)?;
        Ok(())
    }

    /// Full name when set, username otherwise.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn actor(&self) -> Actor {
        Actor::from(self)
    }
}

/// Explicit caller identity passed into service use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub is_staff: bool,
    pub is_active: bool,
}

impl Actor {
    pub fn is_authenticated(&self) -> bool {
        self.is_active && !self.user_id.is_nil()
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.is_staff
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            is_staff: user.is_staff,
            is_active: user.is_active,
        }
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::BlankField("username"));
    }
    require_max_chars("username", username, USERNAME_MAX_CHARS)?;
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Empty email is allowed; anything else must look like `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || EMAIL_RE.is_match(email) {
        return Ok(());
    }
    Err(ValidationError::InvalidEmail(email.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{validate_email, validate_username, User};
    use crate::model::ValidationError;

    #[test]
    fn username_rules_follow_account_contract() {
        assert!(validate_username("staff_test").is_ok());
        assert!(validate_username("eco.warrior+1@ph").is_ok());
        assert_eq!(
            validate_username("  "),
            Err(ValidationError::BlankField("username"))
        );
        assert!(matches!(
            validate_username("has space"),
            Err(ValidationError::InvalidUsername(_))
        ));
    }

    #[test]
    fn email_may_be_empty_but_not_malformed() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("staff@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn inactive_user_is_not_an_authenticated_actor() {
        let mut user = User::new("maria", "");
        user.is_staff = true;
        assert!(user.actor().is_admin());

        user.is_active = false;
        assert!(!user.actor().is_authenticated());
        assert!(!user.actor().is_admin());
    }

    #[test]
    fn display_name_prefers_full_name() {
        let mut user = User::new("juan", "");
        assert_eq!(user.display_name(), "juan");
        user.first_name = "Juan".to_string();
        user.last_name = "Dela Cruz".to_string();
        assert_eq!(user.display_name(), "Juan Dela Cruz");
    }
}
