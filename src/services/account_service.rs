use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::database::CredentialStore;
use crate::errors::{AppError, Result};
use crate::models::user::{AuthResponse, CreateUser, ProfileUpdate, User, UserResponse};
use crate::services::password::PasswordHasher;
use crate::services::token::TokenIssuer;

/// Registration, login and profile access over the credential store.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Creates a user. Uniqueness is left to the store, so a concurrent
    /// registration with the same username or email loses with a duplicate error.
    pub async fn register(&self, payload: CreateUser) -> Result<UserResponse> {
        payload.validate()?;

        let password_hash = self.hasher.hash(&payload.password).await?;
        let now = Utc::now();

        let user = User {
            id: Some(ObjectId::new()),
            username: payload.username,
            email: payload.email,
            password_hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            mobile: payload.mobile,
            address: payload.address,
            profile: payload.profile.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.users.insert(&user).await?;
        tracing::info!("👤 Registered user {}", user.username);

        Ok(user.into())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !self.hasher.verify(password, &user.password_hash).await? {
            return Err(AppError::InvalidPassword);
        }

        let token = self.tokens.sign(&user.id_hex(), &user.username)?;
        tracing::info!("🔓 Login for {}", user.username);

        Ok(AuthResponse {
            msg: "Login Successful".to_string(),
            username: user.username,
            token,
        })
    }

    pub async fn get_user(&self, username: &str) -> Result<UserResponse> {
        if username.trim().is_empty() {
            return Err(AppError::ProfileNotFound);
        }

        self.users
            .find_by_username(username)
            .await?
            .map(UserResponse::from)
            .ok_or(AppError::ProfileNotFound)
    }

    /// Applies `update` to the account behind a verified token. A token whose
    /// user no longer exists is `Unauthorized`.
    pub async fn update_user(&self, user_id: &str, update: ProfileUpdate) -> Result<()> {
        update.validate()?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // Deleted between lookup and write
        if !self.users.update_profile(user_id, &update).await? {
            return Err(AppError::Unauthorized);
        }

        tracing::info!("📝 Updated profile for {}", user.username);
        Ok(())
    }

    pub async fn user_exists(&self, username: &str) -> Result<()> {
        match self.users.find_by_username(username).await? {
            Some(_) => Ok(()),
            None => Err(AppError::UserNotFound),
        }
    }

    pub async fn ping(&self) -> Result<()> {
        self.users.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryUserStore;
    use crate::services::password::BcryptHasher;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryUserStore::new()),
            Arc::new(BcryptHasher::new(4)),
            Arc::new(TokenIssuer::new("test-secret", 24)),
        )
    }

    fn create(username: &str, email: &str, password: &str) -> CreateUser {
        CreateUser {
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            first_name: Some("bill".to_string()),
            last_name: Some("william".to_string()),
            mobile: Some(8009860560),
            address: None,
            profile: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_token_for_user() {
        let accounts = service();
        accounts
            .register(create("example123", "example@gmail.com", "admin123"))
            .await
            .unwrap();

        let auth = accounts.login("example123", "admin123").await.unwrap();
        assert_eq!(auth.username, "example123");

        let claims = TokenIssuer::new("test-secret", 24).verify(&auth.token).unwrap();
        assert_eq!(claims.username, "example123");
    }

    #[tokio::test]
    async fn login_failures_are_distinguished() {
        let accounts = service();
        accounts
            .register(create("example123", "example@gmail.com", "admin123"))
            .await
            .unwrap();

        assert!(matches!(
            accounts.login("nobody", "admin123").await,
            Err(AppError::UserNotFound)
        ));
        assert!(matches!(
            accounts.login("example123", "wrong").await,
            Err(AppError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn duplicates_are_rejected() {
        let accounts = service();
        accounts
            .register(create("example123", "example@gmail.com", "admin123"))
            .await
            .unwrap();

        assert!(matches!(
            accounts
                .register(create("example123", "other@gmail.com", "admin123"))
                .await,
            Err(AppError::DuplicateUsername)
        ));
        assert!(matches!(
            accounts
                .register(create("other", "example@gmail.com", "admin123"))
                .await,
            Err(AppError::DuplicateEmail)
        ));
    }

    #[tokio::test]
    async fn invalid_registration_is_a_validation_error() {
        let accounts = service();
        assert!(matches!(
            accounts.register(create("example123", "not-an-email", "admin123")).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            accounts.register(create("example123", "example@gmail.com", "")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_user_changes_profile_fields() {
        let accounts = service();
        let created = accounts
            .register(create("example123", "example@gmail.com", "admin123"))
            .await
            .unwrap();

        let update = ProfileUpdate {
            address: Some("Apt. 556, Kulas Light, Gwenborough".to_string()),
            ..ProfileUpdate::default()
        };
        accounts.update_user(&created.id, update).await.unwrap();

        let user = accounts.get_user("example123").await.unwrap();
        assert_eq!(
            user.address.as_deref(),
            Some("Apt. 556, Kulas Light, Gwenborough")
        );
        assert_eq!(user.first_name.as_deref(), Some("bill"));
    }

    #[tokio::test]
    async fn update_for_missing_user_is_unauthorized() {
        let accounts = service();
        let err = accounts
            .update_user(&ObjectId::new().to_hex(), ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn update_with_malformed_id_is_unauthorized() {
        let accounts = service();
        let update = ProfileUpdate {
            first_name: Some("William".to_string()),
            ..ProfileUpdate::default()
        };
        let err = accounts
            .update_user("not-an-object-id", update)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn missing_profile_and_existence_checks() {
        let accounts = service();
        assert!(matches!(
            accounts.get_user("ghost").await,
            Err(AppError::ProfileNotFound)
        ));
        assert!(matches!(
            accounts.user_exists("ghost").await,
            Err(AppError::UserNotFound)
        ));
    }
}
