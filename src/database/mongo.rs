use async_trait::async_trait;
use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};

use crate::database::store::CredentialStore;
use crate::errors::{AppError, Result};
use crate::models::user::{ProfileUpdate, User};

const USERS: &str = "users";
const USERNAME_INDEX: &str = "username_unique";
const EMAIL_INDEX: &str = "email_unique";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    /// Creates the unique indexes that back registration conflict detection.
    pub async fn ensure_indexes(&self) -> Result<()> {
        for (field, name) in [("username", USERNAME_INDEX), ("email", EMAIL_INDEX)] {
            let options = IndexOptions::builder()
                .unique(true)
                .name(name.to_string())
                .build();
            let model = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(options)
                .build();

            self.users().create_index(model).await?;
        }

        tracing::info!("✅ Unique indexes ensured on '{}'", USERS);
        Ok(())
    }
}

/// Maps a unique-index violation to the matching duplicate error.
fn map_write_error(err: mongodb::error::Error) -> AppError {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
        if write_error.code == DUPLICATE_KEY {
            return if write_error.message.contains(EMAIL_INDEX) {
                AppError::DuplicateEmail
            } else {
                AppError::DuplicateUsername
            };
        }
    }
    err.into()
}

fn profile_set_document(update: &ProfileUpdate) -> Document {
    let mut set = doc! { "updatedAt": BsonDateTime::from_chrono(Utc::now()) };

    if let Some(first_name) = &update.first_name {
        set.insert("firstName", first_name);
    }
    if let Some(last_name) = &update.last_name {
        set.insert("lastName", last_name);
    }
    if let Some(mobile) = update.mobile {
        set.insert("mobile", mobile);
    }
    if let Some(address) = &update.address {
        set.insert("address", address);
    }
    if let Some(profile) = &update.profile {
        set.insert("profile", profile);
    }
    if let Some(email) = &update.email {
        set.insert("email", email);
    }

    set
}

#[async_trait]
impl CredentialStore for MongoUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users().find_one(doc! { "username": username }).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.users().find_one(doc! { "_id": object_id }).await?)
    }

    async fn insert(&self, user: &User) -> Result<()> {
        self.users().insert_one(user).await.map_err(map_write_error)?;
        Ok(())
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<bool> {
        let Ok(object_id) = ObjectId::parse_str(id) else {
            return Ok(false);
        };

        let result = self
            .users()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": profile_set_document(update) },
            )
            .await
            .map_err(map_write_error)?;

        Ok(result.matched_count > 0)
    }

    async fn update_password(&self, username: &str, password_hash: &str) -> Result<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "username": username },
                doc! {
                    "$set": {
                        "password": password_hash,
                        "updatedAt": BsonDateTime::from_chrono(Utc::now()),
                    }
                },
            )
            .await?;

        Ok(result.matched_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
