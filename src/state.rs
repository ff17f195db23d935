use std::sync::Arc;

use crate::config::{AppConfig, StorageBackend};
use crate::database::connection::get_db_client;
use crate::database::{CredentialStore, MemoryUserStore, MongoUserStore};
use crate::errors::{AppError, Result};
use crate::services::{
    AccountService, BcryptHasher, OTPService, OtpSessionStore, PasswordHasher, SingleSlotStore,
    TokenIssuer,
};

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub otp: OTPService,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenIssuer>,
        sessions: Arc<dyn OtpSessionStore>,
    ) -> Self {
        AppState {
            accounts: AccountService::new(users.clone(), hasher.clone(), tokens.clone()),
            otp: OTPService::new(sessions, users, hasher),
            tokens,
        }
    }

    /// Wires the configured store with bcrypt, JWT signing and the
    /// process-wide OTP slot.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let users: Arc<dyn CredentialStore> = match config.storage {
            StorageBackend::Mongo => {
                let url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| AppError::configuration("DATABASE_URL must be set"))?;
                let db = get_db_client(url, &config.database_name).await?;
                let store = MongoUserStore::new(db);
                store.ensure_indexes().await?;
                Arc::new(store)
            }
            StorageBackend::Memory => {
                tracing::warn!("⚠️ Using in-memory user store; data is lost on restart");
                Arc::new(MemoryUserStore::new())
            }
        };

        Ok(Self::new(
            users,
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            Arc::new(TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours)),
            Arc::new(SingleSlotStore::new()),
        ))
    }
}
