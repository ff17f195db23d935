use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;

use crate::database::CredentialStore;
use crate::errors::{AppError, Result};
use crate::models::otp::OtpSession;
use crate::services::password::PasswordHasher;

/// Holder of the password-reset session. Each call is one atomic transition.
///
/// The default `SingleSlotStore` keeps one session for the whole process, so
/// every client shares the same code and reset window.
pub trait OtpSessionStore: Send + Sync {
    fn issue(&self, code: String);

    /// Consumes the code and opens the reset window on a match.
    fn verify(&self, candidate: &str) -> bool;

    fn is_authorized(&self) -> bool;

    fn close_reset(&self);
}

#[derive(Default)]
pub struct SingleSlotStore {
    session: Mutex<OtpSession>,
}

impl SingleSlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, OtpSession> {
        // Transitions never panic mid-update, so a poisoned slot is still consistent.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OtpSessionStore for SingleSlotStore {
    fn issue(&self, code: String) {
        self.lock().issue(code);
    }

    fn verify(&self, candidate: &str) -> bool {
        self.lock().verify(candidate)
    }

    fn is_authorized(&self) -> bool {
        self.lock().is_authorized()
    }

    fn close_reset(&self) {
        self.lock().close_reset();
    }
}

#[derive(Clone)]
pub struct OTPService {
    sessions: Arc<dyn OtpSessionStore>,
    users: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl OTPService {
    pub fn new(
        sessions: Arc<dyn OtpSessionStore>,
        users: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            sessions,
            users,
            hasher,
        }
    }

    // Generate 6-digit OTP
    pub fn generate_otp() -> String {
        let mut rng = rand::thread_rng();
        format!("{:06}", rng.gen_range(0..1_000_000))
    }

    /// Issues a fresh code, replacing any outstanding one. An already open
    /// reset window stays open.
    pub fn generate(&self) -> String {
        let code = Self::generate_otp();
        self.sessions.issue(code.clone());
        tracing::info!("OTP issued");
        tracing::debug!(code = %code, "OTP value");
        code
    }

    pub fn verify(&self, candidate: &str) -> Result<()> {
        if self.sessions.verify(candidate) {
            tracing::info!("OTP verified, reset session opened");
            Ok(())
        } else {
            tracing::warn!("OTP verification failed");
            Err(AppError::InvalidOTP)
        }
    }

    pub fn check_authorized(&self) -> bool {
        self.sessions.is_authorized()
    }

    pub fn require_reset_session(&self) -> Result<()> {
        if self.check_authorized() {
            Ok(())
        } else {
            Err(AppError::SessionExpired)
        }
    }

    /// Sets a new password for `username` inside an open reset window.
    ///
    /// The window closes only once the new hash is persisted; a failed lookup,
    /// hash or write leaves it open so the client can retry.
    pub async fn consume_and_reset(&self, username: &str, new_password: &str) -> Result<()> {
        self.require_reset_session()?;

        let user = self
            .users
            .find_by_username(username)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let password_hash = self.hasher.hash(new_password).await?;

        if !self
            .users
            .update_password(&user.username, &password_hash)
            .await?
        {
            return Err(AppError::UserNotFound);
        }

        self.sessions.close_reset();
        tracing::info!("🔑 Password reset for {}", user.username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryUserStore;
    use crate::models::user::{ProfileUpdate, User};
    use crate::services::password::BcryptHasher;
    use async_trait::async_trait;
    use chrono::Utc;
    use mongodb::bson::oid::ObjectId;

    fn service_with(users: Arc<dyn CredentialStore>) -> OTPService {
        OTPService::new(
            Arc::new(SingleSlotStore::new()),
            users,
            Arc::new(BcryptHasher::new(4)),
        )
    }

    async fn seeded_store() -> Arc<MemoryUserStore> {
        let store = Arc::new(MemoryUserStore::new());
        store
            .insert(&User {
                id: Some(ObjectId::new()),
                username: "example123".to_string(),
                email: "example@gmail.com".to_string(),
                password_hash: bcrypt::hash("admin123", 4).unwrap(),
                first_name: None,
                last_name: None,
                mobile: None,
                address: None,
                profile: String::new(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        store
    }

    /// Store whose writes always fail; reads come from the wrapped store.
    struct FailingWrites(Arc<MemoryUserStore>);

    #[async_trait]
    impl CredentialStore for FailingWrites {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
            self.0.find_by_username(username).await
        }
        async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
            self.0.find_by_id(id).await
        }
        async fn insert(&self, _user: &User) -> Result<()> {
            Err(AppError::persistence("write refused"))
        }
        async fn update_profile(&self, _id: &str, _update: &ProfileUpdate) -> Result<bool> {
            Err(AppError::persistence("write refused"))
        }
        async fn update_password(&self, _username: &str, _hash: &str) -> Result<bool> {
            Err(AppError::persistence("write refused"))
        }
        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..200 {
            let code = OTPService::generate_otp();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn code_verifies_exactly_once() {
        let otp = service_with(seeded_store().await);
        let code = otp.generate();

        assert!(otp.verify(&code).is_ok());
        assert!(otp.check_authorized());
        assert!(matches!(otp.verify(&code), Err(AppError::InvalidOTP)));
    }

    #[tokio::test]
    async fn last_generated_code_wins() {
        let otp = service_with(seeded_store().await);
        let first = otp.generate();
        let mut second = otp.generate();
        while second == first {
            second = otp.generate();
        }

        assert!(matches!(otp.verify(&first), Err(AppError::InvalidOTP)));
        assert!(otp.verify(&second).is_ok());
    }

    #[tokio::test]
    async fn reset_requires_verified_code() {
        let otp = service_with(seeded_store().await);
        otp.generate();

        let err = otp.consume_and_reset("example123", "newpass").await.unwrap_err();
        assert!(matches!(err, AppError::SessionExpired));
        assert!(matches!(
            otp.require_reset_session(),
            Err(AppError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn reset_closes_window_and_updates_hash() {
        let store = seeded_store().await;
        let otp = service_with(store.clone());
        let code = otp.generate();
        otp.verify(&code).unwrap();

        otp.consume_and_reset("example123", "newpass").await.unwrap();

        assert!(!otp.check_authorized());
        let user = store.find_by_username("example123").await.unwrap().unwrap();
        assert!(bcrypt::verify("newpass", &user.password_hash).unwrap());
        assert!(matches!(
            otp.consume_and_reset("example123", "again").await,
            Err(AppError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn unknown_user_keeps_window_open() {
        let otp = service_with(seeded_store().await);
        let code = otp.generate();
        otp.verify(&code).unwrap();

        let err = otp.consume_and_reset("nobody", "newpass").await.unwrap_err();
        assert!(matches!(err, AppError::UserNotFound));
        assert!(otp.check_authorized());
    }

    #[tokio::test]
    async fn failed_write_keeps_window_open_for_retry() {
        let store = seeded_store().await;
        let otp = service_with(Arc::new(FailingWrites(store.clone())));
        let code = otp.generate();
        otp.verify(&code).unwrap();

        let err = otp.consume_and_reset("example123", "newpass").await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert!(otp.check_authorized());
    }
}
