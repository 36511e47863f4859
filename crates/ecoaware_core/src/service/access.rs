//! Access rules shared by service use-cases.

use crate::model::user::{Actor, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// No active account behind the actor.
    LoginRequired,
    StaffOnly,
    /// Only the record owner may change it.
    NotOwner,
    /// Staff may not deactivate, demote or delete their own account.
    SelfLockout,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "login required"),
            Self::StaffOnly => write!(f, "staff access required"),
            Self::NotOwner => write!(f, "only the author may change this record"),
            Self::SelfLockout => write!(f, "cannot lock out your own staff account"),
        }
    }
}

impl Error for AccessError {}

pub fn require_login(actor: &Actor) -> Result<(), AccessError> {
    if actor.is_authenticated() {
        Ok(())
    } else {
        Err(AccessError::LoginRequired)
    }
}

pub fn require_staff(actor: &Actor) -> Result<(), AccessError> {
    require_login(actor)?;
    if actor.is_staff {
        Ok(())
    } else {
        Err(AccessError::StaffOnly)
    }
}

pub fn require_owner(actor: &Actor, owner_id: UserId) -> Result<(), AccessError> {
    require_login(actor)?;
    if actor.user_id == owner_id {
        Ok(())
    } else {
        Err(AccessError::NotOwner)
    }
}
