// ============================
// backend-lib/src/auth/session.rs
// ============================
//! Session token issuing and reading.
//!
//! Sessions are stateless: the signed token is the only record of a login.
//! There is no server-side table and no revocation, a token stays valid
//! until its `exp`.
use axum::http::{
    header::{AUTHORIZATION, COOKIE},
    HeaderMap, HeaderValue,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use uuid::Uuid;
use whathefood_common::{Account, ClaimSet, Identity, Role};

use crate::config::SessionSettings;
use crate::error::AppError;

/// Default session cookie name
pub const SESSION_COOKIE: &str = "whathefood_session";

/// Default session TTL (time to live)
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7); // 7 days

/// JWT payload
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: Uuid,
    role: Role,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    iat: i64,
    exp: i64,
}

impl From<TokenClaims> for ClaimSet {
    fn from(claims: TokenClaims) -> Self {
        Self {
            subject_id: claims.sub,
            role: claims.role,
            display_name: claims.name,
            avatar_ref: claims.avatar,
        }
    }
}

/// An encoded, signed session token
#[derive(Clone, PartialEq, Eq)]
pub struct SignedToken(String);

impl SignedToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SignedToken(..)")
    }
}

/// HMAC keys derived from the configured signing secret
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Mints session tokens for verified accounts
#[derive(Clone)]
pub struct SessionIssuer {
    keys: Arc<SessionKeys>,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(keys: Arc<SessionKeys>, ttl: Duration) -> Self {
        Self { keys, ttl }
    }

    pub fn issue(&self, account: &Account) -> Result<SignedToken, AppError> {
        self.issue_at(account, Utc::now().timestamp())
    }

    fn issue_at(&self, account: &Account, issued_at: i64) -> Result<SignedToken, AppError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: account.id,
            role: account.role,
            name: account.display_name.clone(),
            avatar: account.avatar_ref.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map(SignedToken)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }
}

/// Turns an inbound request into an `Identity`
#[derive(Clone)]
pub struct SessionReader {
    keys: Arc<SessionKeys>,
    cookie_name: String,
    validation: Validation,
}

impl SessionReader {
    pub fn new(keys: Arc<SessionKeys>, cookie_name: impl Into<String>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            keys,
            cookie_name: cookie_name.into(),
            validation,
        }
    }

    /// Session cookie first, then `Authorization: Bearer`.
    pub fn read(&self, headers: &HeaderMap) -> Identity {
        match parse_cookie(headers, &self.cookie_name).or_else(|| bearer_token(headers)) {
            Some(token) => self.read_token(&token),
            None => Identity::Anonymous,
        }
    }

    /// Any validation failure reads as anonymous.
    pub fn read_token(&self, token: &str) -> Identity {
        match decode::<TokenClaims>(token, &self.keys.decoding, &self.validation) {
            Ok(data) => Identity::Authenticated(data.claims.into()),
            Err(err) => {
                tracing::debug!(error = %err, "rejected session token");
                Identity::Anonymous
            },
        }
    }
}

/// Find a cookie value by name across all `Cookie` headers
pub fn parse_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// `Set-Cookie` value carrying a fresh session.
///
/// Script-inaccessible and scoped to the application origin.
pub fn session_cookie(settings: &SessionSettings, token: &SignedToken) -> Result<HeaderValue, AppError> {
    let secure = if settings.secure_cookie { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        settings.cookie_name,
        token.as_str(),
        settings.ttl_secs,
        secure
    ))
    .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))
}

/// `Set-Cookie` value telling the browser to drop the session
pub fn clear_session_cookie(settings: &SessionSettings) -> Result<HeaderValue, AppError> {
    let secure = if settings.secure_cookie { "; Secure" } else { "" };
    HeaderValue::from_str(&format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT{}",
        settings.cookie_name, secure
    ))
    .map_err(|e| AppError::Internal(format!("invalid session cookie: {e}")))
}
