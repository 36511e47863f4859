//! User account use-case service.
//!
//! # Responsibility
//! - Registration and self-service profile edits.
//! - Staff-only account administration.
//! - Idempotent staff bootstrap (create or promote).
//!
//! # Invariants
//! - Usernames stay unique; duplicates surface as `ServiceError::Conflict`.
//! - A staff member cannot deactivate or delete their own account.

use crate::model::user::{validate_username, Actor, User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::service::access::{require_login, require_staff, AccessError};
use crate::service::{ServiceError, ServiceResult};
use log::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
}

/// Fields a member may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Fields staff may change on any account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAdminForm {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
}

/// What `ensure_staff` had to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffBootstrap {
    Created(User),
    Promoted(User),
    AlreadyStaff(User),
}

impl StaffBootstrap {
    pub fn user(&self) -> &User {
        match self {
            Self::Created(user) | Self::Promoted(user) | Self::AlreadyStaff(user) => user,
        }
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn register(&self, form: &RegistrationForm) -> ServiceResult<User> {
        let user = User::new(form.username.trim(), form.email.trim());
        self.repo.create_user(&user)?;
        info!(
            "event=user_register module=service status=ok user_id={}",
            user.id
        );
        Ok(user)
    }

    /// Creates a staff account, or promotes an existing one.
    ///
    /// Calling this repeatedly is safe; the email is only used on creation.
    pub fn ensure_staff(&self, username: &str, email: &str) -> ServiceResult<StaffBootstrap> {
        let username = username.trim();
        validate_username(username)?;

        let outcome = match self.repo.get_user_by_username(username)? {
            Some(user) if user.is_staff => StaffBootstrap::AlreadyStaff(user),
            Some(mut user) => {
                user.is_staff = true;
                self.repo.update_user(&user)?;
                StaffBootstrap::Promoted(user)
            }
            None => {
                let mut user = User::new(username, email.trim());
                user.is_staff = true;
                self.repo.create_user(&user)?;
                StaffBootstrap::Created(user)
            }
        };
        info!(
            "event=staff_bootstrap module=service status=ok user_id={} outcome={}",
            outcome.user().id,
            match outcome {
                StaffBootstrap::Created(_) => "created",
                StaffBootstrap::Promoted(_) => "promoted",
                StaffBootstrap::AlreadyStaff(_) => "unchanged",
            }
        );
        Ok(outcome)
    }

    pub fn get_user(&self, id: UserId) -> ServiceResult<User> {
        self.repo
            .get_user(id)?
            .ok_or_else(|| ServiceError::not_found("user", id))
    }

    pub fn get_user_by_username(&self, username: &str) -> ServiceResult<User> {
        self.repo
            .get_user_by_username(username)?
            .ok_or_else(|| ServiceError::not_found("user", username))
    }

    pub fn list_users(&self, actor: &Actor) -> ServiceResult<Vec<User>> {
        require_staff(actor)?;
        Ok(self.repo.list_users()?)
    }

    pub fn edit_user(&self, actor: &Actor, id: UserId, form: &UserAdminForm) -> ServiceResult<User> {
        require_staff(actor)?;
        let mut user = self.get_user(id)?;
        if id == actor.user_id && (!form.is_active || !form.is_staff) {
            return Err(AccessError::SelfLockout.into());
        }
        user.username = form.username.trim().to_string();
        user.email = form.email.trim().to_string();
        user.first_name = form.first_name.trim().to_string();
        user.last_name = form.last_name.trim().to_string();
        user.is_active = form.is_active;
        user.is_staff = form.is_staff;
        self.repo.update_user(&user)?;
        info!("event=user_edit module=service status=ok user_id={id}");
        Ok(user)
    }

    /// Flips `is_active` and returns the updated account.
    pub fn toggle_user_status(&self, actor: &Actor, id: UserId) -> ServiceResult<User> {
        require_staff(actor)?;
        if id == actor.user_id {
            return Err(AccessError::SelfLockout.into());
        }
        let mut user = self.get_user(id)?;
        user.is_active = !user.is_active;
        self.repo.update_user(&user)?;
        info!(
            "event=user_toggle_status module=service status=ok user_id={id} is_active={}",
            user.is_active
        );
        Ok(user)
    }

    pub fn delete_user(&self, actor: &Actor, id: UserId) -> ServiceResult<User> {
        require_staff(actor)?;
        if id == actor.user_id {
            return Err(AccessError::SelfLockout.into());
        }
        let user = self.get_user(id)?;
        self.repo.delete_user(id)?;
        info!("event=user_delete module=service status=ok user_id={id}");
        Ok(user)
    }

    pub fn update_profile(&self, actor: &Actor, form: &ProfileForm) -> ServiceResult<User> {
        require_login(actor)?;
        let mut user = self.get_user(actor.user_id)?;
        user.first_name = form.first_name.trim().to_string();
        user.last_name = form.last_name.trim().to_string();
        user.email = form.email.trim().to_string();
        self.repo.update_user(&user)?;
        Ok(user)
    }
}
