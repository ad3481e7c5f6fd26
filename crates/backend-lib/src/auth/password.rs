// ============================
// backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use zeroize::{Zeroize, Zeroizing};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash checked when the email is unknown, so that path costs the same as a
/// wrong password.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("not-a-real-password").unwrap_or_default());

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

fn salt() -> Result<SaltString, argon2::password_hash::Error> {
    let mut bytes = [0u8; 16];
    rand::rng().fill(&mut bytes);
    SaltString::encode_b64(&bytes)
}

/// Hash a password using Argon2id
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt()?)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a hash
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Burn one verification against the dummy hash
pub fn verify_dummy(plain: &str) -> bool {
    verify_password(&DUMMY_HASH, plain)
}

/// Run `verify_password` on the blocking pool
pub async fn verify_password_blocking(hash: String, plain: &str) -> bool {
    let plain = Zeroizing::new(plain.to_owned());
    tokio::task::spawn_blocking(move || verify_password(&hash, &plain))
        .await
        .unwrap_or(false)
}

/// Run `verify_dummy` on the blocking pool
pub async fn verify_dummy_blocking(plain: &str) -> bool {
    let plain = Zeroizing::new(plain.to_owned());
    tokio::task::spawn_blocking(move || verify_dummy(&plain))
        .await
        .unwrap_or(false)
}

/// Check if a password meets the complexity requirements
pub fn validate_password_strength(password: &str, requirements: &PasswordRequirements) -> bool {
    if password.chars().count() < requirements.min_length {
        return false;
    }

    if requirements.require_uppercase && !password.chars().any(|c| c.is_uppercase()) {
        return false;
    }

    if requirements.require_lowercase && !password.chars().any(|c| c.is_lowercase()) {
        return false;
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return false;
    }

    true
}

/// Securely hash a password and zeroize the original
pub async fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let owned = Zeroizing::new(plain.clone());
    plain.zeroize();
    tokio::task::spawn_blocking(move || hash_password(&owned)).await?
}
