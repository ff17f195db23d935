use async_trait::async_trait;

use crate::errors::Result;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String>;

    /// `Ok(false)` for a wrong password or an unreadable digest.
    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool>;
}

/// bcrypt on the blocking pool so request tasks are not stalled.
#[derive(Clone, Copy, Debug)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost)).await??;
        Ok(digest)
    }

    async fn verify(&self, plaintext: &str, digest: &str) -> Result<bool> {
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &digest)).await?;

        Ok(outcome.unwrap_or_else(|e| {
            tracing::warn!("Stored password digest could not be checked: {}", e);
            false
        }))
    }
}
