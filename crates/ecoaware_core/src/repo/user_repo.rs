//! User repository contracts and SQLite implementation.
//!
//! # Invariants
//! - Usernames are unique; duplicates surface as `RepoError::Conflict`.
//! - Deleting a user cascades to their articles, comments, participations
//!   and suggestions.

use super::{bool_to_int, clamp_count, map_write_error, parse_bool, parse_uuid};
use super::{RepoError, RepoResult};
use crate::model::user::{User, UserId};
use rusqlite::{params, Connection, Row};

pub(crate) const USER_COLUMNS: &str = "users.id,
    users.username,
    users.email,
    users.first_name,
    users.last_name,
    users.is_staff,
    users.is_active,
    users.date_joined";

/// Repository interface for user accounts.
pub trait UserRepository {
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    /// All users sorted by username.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Newest users first by `date_joined`.
    fn recent_users(&self, limit: u32) -> RepoResult<Vec<User>>;
    fn delete_user(&self, id: UserId) -> RepoResult<()>;
    fn count_users(&self, staff_only: bool) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_users(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        self.conn
            .execute(
                "INSERT INTO users (
                    id,
                    username,
                    email,
                    first_name,
                    last_name,
                    is_staff,
                    is_active,
                    date_joined
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    user.id.to_string(),
                    user.username.as_str(),
                    user.email.as_str(),
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    bool_to_int(user.is_staff),
                    bool_to_int(user.is_active),
                    user.date_joined,
                ],
            )
            .map_err(|err| {
                map_write_error(err, || format!("username `{}` is taken", user.username))
            })?;

        Ok(user.id)
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        user.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE users
                 SET
                    username = ?1,
                    email = ?2,
                    first_name = ?3,
                    last_name = ?4,
                    is_staff = ?5,
                    is_active = ?6
                 WHERE id = ?7;",
                params![
                    user.username.as_str(),
                    user.email.as_str(),
                    user.first_name.as_str(),
                    user.last_name.as_str(),
                    bool_to_int(user.is_staff),
                    bool_to_int(user.is_active),
                    user.id.to_string(),
                ],
            )
            .map_err(|err| {
                map_write_error(err, || format!("username `{}` is taken", user.username))
            })?;

        if changed == 0 {
            return Err(RepoError::not_found("user", user.id));
        }
        Ok(())
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let users = self.query_users(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1;"),
            [id.to_string()],
        )?;
        Ok(users.into_iter().next())
    }

    fn get_user_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let users = self.query_users(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1;"),
            [username],
        )?;
        Ok(users.into_iter().next())
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        self.query_users(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY username ASC;"),
            [],
        )
    }

    fn recent_users(&self, limit: u32) -> RepoResult<Vec<User>> {
        self.query_users(
            &format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY date_joined DESC, id ASC LIMIT ?1;"
            ),
            [i64::from(limit)],
        )
    }

    fn delete_user(&self, id: UserId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found("user", id));
        }
        Ok(())
    }

    fn count_users(&self, staff_only: bool) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM users WHERE (?1 = 0 OR is_staff = 1);",
            [bool_to_int(staff_only)],
            |row| row.get(0),
        )?;
        Ok(clamp_count(count))
    }
}

/// Decodes a row selected with `USER_COLUMNS`.
pub(crate) fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let user = User {
        id: parse_uuid(&id_text, "users.id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        is_staff: parse_bool(row.get("is_staff")?, "users.is_staff")?,
        is_active: parse_bool(row.get("is_active")?, "users.is_active")?,
        date_joined: row.get("date_joined")?,
    };
    user.validate()?;
    Ok(user)
}
