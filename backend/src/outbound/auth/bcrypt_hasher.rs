//! bcrypt password hashing on the blocking thread pool.

use async_trait::async_trait;

use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// bcrypt-backed [`PasswordHasher`].
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Hasher using `cost` rounds.
    pub const fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }
}

fn join_error(err: tokio::task::JoinError) -> PasswordHashError {
    PasswordHashError::hashing(format!("hashing task aborted: {err}"))
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password.as_str(), cost))
            .await
            .map_err(join_error)?
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = zeroize::Zeroizing::new(password.to_owned());
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password.as_str(), &hash))
            .await
            .map_err(join_error)?
            .map_err(|err| match err {
                bcrypt::BcryptError::InvalidHash(_)
                | bcrypt::BcryptError::InvalidPrefix(_)
                | bcrypt::BcryptError::InvalidCost(_) => {
                    PasswordHashError::malformed_hash(err.to_string())
                }
                other => PasswordHashError::hashing(other.to_string()),
            })
    }
}
