use async_trait::async_trait;
use whathefood_common::{Account, RegisterRequest};

use super::{AuthError, SignedToken};
use crate::error::AppError;

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check an email/password pair
    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError>;
    /// Mint a session token for a verified account
    fn issue(&self, account: &Account) -> Result<SignedToken, AppError>;
    /// Self-service sign-up, always as `USER`
    async fn register(&self, request: RegisterRequest) -> Result<Account, AppError>;
}
