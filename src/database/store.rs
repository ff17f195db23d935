use async_trait::async_trait;

use crate::errors::Result;
use crate::models::user::{ProfileUpdate, User};

/// Persistent user records.
///
/// Implementations enforce username and email uniqueness themselves and report
/// a conflict from `insert` (or an email change in `update_profile`) as
/// `AppError::DuplicateUsername` / `AppError::DuplicateEmail`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Unknown or malformed ids resolve to `None`.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    async fn insert(&self, user: &User) -> Result<()>;

    /// Returns whether a record matched `id`.
    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<bool>;

    /// Returns whether a record matched `username`.
    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool>;

    async fn ping(&self) -> Result<()>;
}
