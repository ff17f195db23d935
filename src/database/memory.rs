use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::database::store::CredentialStore;
use crate::errors::{AppError, Result};
use crate::models::user::{ProfileUpdate, User};

/// Process-local user store. Used with `STORAGE=memory` and in tests.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<ObjectId, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.users.read().await.get(&object_id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::DuplicateUsername);
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(AppError::DuplicateEmail);
        }

        let id = user.id.unwrap_or_else(ObjectId::new);
        let mut stored = user.clone();
        stored.id = Some(id);
        users.insert(id, stored);
        Ok(())
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<bool> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let mut users = self.users.write().await;

        if let Some(email) = &update.email {
            if users
                .iter()
                .any(|(other_id, u)| *other_id != object_id && &u.email == email)
            {
                return Err(AppError::DuplicateEmail);
            }
        }

        match users.get_mut(&object_id) {
            Some(user) => {
                update.apply_to(user);
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let mut users = self.users.write().await;
        match users.values_mut().find(|u| u.username == username) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
