use crate::auth::{
    hash_password_secure, AuthError, AuthService, CredentialVerifier, PasswordRequirements,
    SessionIssuer, SignedToken,
};
use crate::error::AppError;
use crate::metrics::REGISTERED;
use crate::storage::{StoredAccount, UserStore};
use crate::validation;
use async_trait::async_trait;
use metrics::counter;
use std::sync::Arc;
use whathefood_common::{Account, RegisterRequest, Role};

pub struct DefaultAuth {
    verifier: CredentialVerifier,
    issuer: SessionIssuer,
    store: Arc<dyn UserStore>,
    requirements: PasswordRequirements,
}

impl DefaultAuth {
    pub fn new(
        store: Arc<dyn UserStore>,
        issuer: SessionIssuer,
        requirements: PasswordRequirements,
    ) -> Self {
        Self {
            verifier: CredentialVerifier::new(store.clone()),
            issuer,
            store,
            requirements,
        }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        self.verifier.verify(email, password).await
    }

    fn issue(&self, account: &Account) -> Result<SignedToken, AppError> {
        self.issuer.issue(account)
    }

    async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        validation::validate_registration(&request, &self.requirements)?;
        // Skip the hash for a known duplicate; insert still enforces uniqueness
        if self.store.email_exists(&request.email).await? {
            return Err(AppError::EmailTaken);
        }

        let RegisterRequest {
            username,
            email,
            mut password,
            ..
        } = request;
        let hash = hash_password_secure(&mut password)
            .await
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

        let row = StoredAccount::new(email, username, None, Role::User, hash);
        let account = self.store.insert(row).await?;

        counter!(REGISTERED).increment(1);
        tracing::info!(email = %account.email, id = %account.id, "account registered");
        Ok(account)
    }
}

/// Create an `ADMIN` account, or promote the existing account with that email.
///
/// An existing account keeps its password. A new one must meet the same
/// password requirements as self-service sign-up.
pub async fn provision_admin(
    store: &dyn UserStore,
    requirements: &PasswordRequirements,
    email: &str,
    display_name: &str,
    mut password: String,
) -> Result<Account, AppError> {
    if let Some(existing) = store.find_by_email(email).await? {
        let account = store.set_role(existing.account.id, Role::Admin).await?;
        tracing::info!(%email, id = %account.id, "promoted account to ADMIN");
        return Ok(account);
    }

    validation::validate_email(email)?;
    validation::validate_username(display_name)?;
    validation::validate_password(&password, requirements)?;

    let hash = hash_password_secure(&mut password)
        .await
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;
    let row = StoredAccount::new(
        email.to_string(),
        display_name.to_string(),
        None,
        Role::Admin,
        hash,
    );
    let account = store.insert(row).await?;
    tracing::info!(%email, id = %account.id, "created ADMIN account");
    Ok(account)
}
