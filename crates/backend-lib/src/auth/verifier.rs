//! Credential verification against the account store.
use std::sync::Arc;

use whathefood_common::Account;

use super::password::{verify_dummy_blocking, verify_password_blocking};
use super::AuthError;
use crate::storage::UserStore;

/// Checks an email/password pair. Read-only.
#[derive(Clone)]
pub struct CredentialVerifier {
    store: Arc<dyn UserStore>,
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Empty fields, unknown email and wrong password all come back as
    /// `AuthError::InvalidCredentials`.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        if email.is_empty() || password.is_empty() {
            verify_dummy_blocking(password).await;
            return Err(AuthError::InvalidCredentials);
        }

        let row = self.store.find_by_email(email).await.map_err(|err| {
            tracing::error!(%email, error = %err, "account lookup failed");
            AuthError::StoreUnavailable
        })?;

        match row {
            Some(row) => {
                if verify_password_blocking(row.password_hash, password).await {
                    Ok(row.account)
                } else {
                    Err(AuthError::InvalidCredentials)
                }
            },
            None => {
                verify_dummy_blocking(password).await;
                Err(AuthError::InvalidCredentials)
            },
        }
    }
}
