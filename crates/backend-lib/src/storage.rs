// ============================
// backend-lib/src/storage.rs
// ============================
//! Account store abstraction with flat-file and in-memory implementations.
use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{fs as tokio_fs, sync::RwLock};
use uuid::Uuid;
use whathefood_common::{Account, Role};

/// Name of the account document inside the storage directory
pub const USERS_FILE: &str = "users.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt account document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Email already registered")]
    EmailTaken,

    #[error("No account with id {0}")]
    NotFound(Uuid),
}

/// An account row together with its credential hash.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StoredAccount {
    #[serde(flatten)]
    pub account: Account,
    /// PHC-formatted salted hash
    pub password_hash: String,
}

impl StoredAccount {
    /// Build a fresh row stamped with the current time.
    pub fn new(
        email: String,
        display_name: String,
        avatar_ref: Option<String>,
        role: Role,
        password_hash: String,
    ) -> Self {
        let mut account = Account::new(email, display_name, role);
        account.avatar_ref = avatar_ref;
        Self {
            account,
            password_hash,
        }
    }
}

/// Trait for account store backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up an account by exact email
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, StoreError>;

    /// Insert a new account, failing on a duplicate email
    async fn insert(&self, row: StoredAccount) -> Result<Account, StoreError>;

    /// Administrative role change
    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, StoreError>;

    /// All accounts, without hashes, for the `list-users` command
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// Flat-file implementation of the `UserStore` trait.
///
/// Every call re-reads `users.json`, so an admin provisioned from the CLI is
/// visible to a running server. Writes within this process are serialized.
#[derive(Clone)]
pub struct FlatFileUserStore {
    path: PathBuf,
    write_lock: Arc<RwLock<()>>,
}

impl FlatFileUserStore {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            path: root.join(USERS_FILE),
            write_lock: Arc::new(RwLock::new(())),
        })
    }

    async fn load(&self) -> Result<Vec<StoredAccount>, StoreError> {
        if !tokio_fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }
        let content = tokio_fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a sibling temp file then rename over the document.
    async fn save(&self, rows: &[StoredAccount]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(rows)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlatFileUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, StoreError> {
        let _guard = self.write_lock.read().await;
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|row| row.account.email == email))
    }

    async fn insert(&self, row: StoredAccount) -> Result<Account, StoreError> {
        let _guard = self.write_lock.write().await;
        let mut rows = self.load().await?;
        if rows.iter().any(|r| r.account.email == row.account.email) {
            return Err(StoreError::EmailTaken);
        }
        let account = row.account.clone();
        rows.push(row);
        self.save(&rows).await?;
        Ok(account)
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, StoreError> {
        let _guard = self.write_lock.write().await;
        let mut rows = self.load().await?;
        let row = rows
            .iter_mut()
            .find(|r| r.account.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.account.role = role;
        row.account.updated_at = Utc::now();
        let account = row.account.clone();
        self.save(&rows).await?;
        Ok(account)
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let _guard = self.write_lock.read().await;
        Ok(self.load().await?.into_iter().map(|r| r.account).collect())
    }
}

/// In-memory store keyed by email
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<DashMap<String, StoredAccount>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, StoreError> {
        Ok(self.rows.get(email).map(|r| r.value().clone()))
    }

    async fn insert(&self, row: StoredAccount) -> Result<Account, StoreError> {
        match self.rows.entry(row.account.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::EmailTaken),
            Entry::Vacant(slot) => {
                let account = row.account.clone();
                slot.insert(row);
                Ok(account)
            },
        }
    }

    async fn set_role(&self, id: Uuid, role: Role) -> Result<Account, StoreError> {
        let mut row = self
            .rows
            .iter_mut()
            .find(|r| r.account.id == id)
            .ok_or(StoreError::NotFound(id))?;
        row.account.role = role;
        row.account.updated_at = Utc::now();
        Ok(row.account.clone())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.rows.iter().map(|r| r.account.clone()).collect())
    }
}
