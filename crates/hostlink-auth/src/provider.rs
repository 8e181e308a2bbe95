//! Credential stores
//!
//! [`CredentialStore`] is the capability the bridge talks to:
//! 1. `validate_login` checks a username/password pair
//! 2. `change_password` replaces a hash in memory (blocking work)
//! 3. `persist` writes the store back to disk
//!
//! [`LocalProvider`] is the JSON-file backed implementation.

use crate::credential::{normalize_username, Credential, CredentialInfo};
use crate::error::{AuthError, AuthResult};
use crate::password::CredentialHasher;
use crate::storage::{CredentialFile, StoredData};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};

/// Verified against when a username is unknown, so the response time does
/// not reveal whether the account exists
const DUMMY_PASSWORD: &str = "hostlink-dummy-password";

/// An auth provider owning user records and credential checks
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Succeeds only for an existing, enabled user with a matching password
    async fn validate_login(&self, username: &str, password: &str) -> AuthResult<()>;

    /// Replace the password of an existing user.
    ///
    /// May block on hashing or I/O; async callers should run it on a worker
    /// thread.
    fn change_password(&self, username: &str, new_password: &str) -> AuthResult<()>;

    /// Write pending changes to durable storage
    async fn persist(&self) -> AuthResult<()>;
}

/// JSON-file backed credential store
pub struct LocalProvider {
    /// On-disk document
    file: CredentialFile,
    /// In-memory copy of the document
    data: RwLock<StoredData>,
    /// Password hasher
    hasher: CredentialHasher,
    /// Lazily computed hash of [`DUMMY_PASSWORD`]
    dummy_hash: OnceLock<String>,
}

impl LocalProvider {
    /// Load the provider from the document at `path`
    pub fn load(path: impl Into<PathBuf>) -> AuthResult<Self> {
        let file = CredentialFile::new(path);
        let data = file.load()?;
        Ok(Self {
            file,
            data: RwLock::new(data),
            hasher: CredentialHasher::new(),
            dummy_hash: OnceLock::new(),
        })
    }

    /// Builder pattern: use a specific hasher for new hashes
    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// Add a new user
    pub fn add_user(&self, username: &str, password: &str) -> AuthResult<()> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if self.read().users.iter().any(|c| c.username == username) {
            return Err(AuthError::UsernameTaken(username));
        }

        let hash = self.hasher.hash(password)?;

        let mut data = self.write();
        // Re-check under the write lock; another writer may have won the race
        if data.users.iter().any(|c| c.username == username) {
            return Err(AuthError::UsernameTaken(username));
        }
        data.users.push(Credential::new(&username, hash));
        info!("Added user {}", username);
        Ok(())
    }

    /// Remove a user
    pub fn remove_user(&self, username: &str) -> AuthResult<()> {
        let username = normalize_username(username);
        let mut data = self.write();
        let before = data.users.len();
        data.users.retain(|c| c.username != username);
        if data.users.len() == before {
            return Err(AuthError::InvalidUser(username));
        }
        info!("Removed user {}", username);
        Ok(())
    }

    /// Enable or disable a user
    pub fn set_disabled(&self, username: &str, disabled: bool) -> AuthResult<()> {
        let username = normalize_username(username);
        let mut data = self.write();
        let credential = data
            .users
            .iter_mut()
            .find(|c| c.username == username)
            .ok_or_else(|| AuthError::InvalidUser(username.clone()))?;
        credential.disabled = disabled;
        info!("User {} disabled={}", username, disabled);
        Ok(())
    }

    /// List all users
    pub fn list_users(&self) -> Vec<CredentialInfo> {
        self.read().users.iter().map(CredentialInfo::from).collect()
    }

    /// Number of known users
    pub fn user_count(&self) -> usize {
        self.read().users.len()
    }

    async fn dummy_hash(&self) -> AuthResult<String> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash.clone());
        }
        let hasher = self.hasher.clone();
        let hash = tokio::task::spawn_blocking(move || hasher.hash(DUMMY_PASSWORD)).await??;
        Ok(self.dummy_hash.get_or_init(|| hash).clone())
    }

    // A poisoned lock still holds a consistent list; every mutation is a
    // single assignment
    fn read(&self) -> RwLockReadGuard<'_, StoredData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CredentialStore for LocalProvider {
    async fn validate_login(&self, username: &str, password: &str) -> AuthResult<()> {
        let username = normalize_username(username);
        let stored = self
            .read()
            .users
            .iter()
            .find(|c| c.username == username)
            .map(|c| (c.password_hash.clone(), !c.disabled));

        let (hash, enabled) = match stored {
            Some(found) => found,
            None => (self.dummy_hash().await?, false),
        };

        let hasher = self.hasher.clone();
        let password = password.to_string();
        let matched = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash)).await?;

        if matched && enabled {
            Ok(())
        } else {
            warn!("Login validation failed for {:?}", username);
            Err(AuthError::InvalidAuth)
        }
    }

    fn change_password(&self, username: &str, new_password: &str) -> AuthResult<()> {
        let username = normalize_username(username);
        if !self.read().users.iter().any(|c| c.username == username) {
            return Err(AuthError::InvalidUser(username));
        }

        let hash = self.hasher.hash(new_password)?;

        let mut data = self.write();
        let credential = data
            .users
            .iter_mut()
            .find(|c| c.username == username)
            .ok_or_else(|| AuthError::InvalidUser(username.clone()))?;
        credential.password_hash = hash;
        info!("Changed password of user {}", username);
        Ok(())
    }

    async fn persist(&self) -> AuthResult<()> {
        self.file.save_with(|| self.read().clone()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn create_test_provider() -> (LocalProvider, TempDir) {
        let dir = tempdir().unwrap();
        let provider = LocalProvider::load(dir.path().join("auth.json"))
            .unwrap()
            .with_hasher(CredentialHasher::with_params(256, 1, 1).unwrap());
        (provider, dir)
    }

    #[tokio::test]
    async fn test_validate_login() {
        let (provider, _dir) = create_test_provider();
        provider.add_user("Admin", "secret").unwrap();

        provider.validate_login("admin", "secret").await.unwrap();
        provider.validate_login(" ADMIN ", "secret").await.unwrap();
    }

    #[tokio::test]
    async fn test_rejections_are_indistinguishable() {
        let (provider, _dir) = create_test_provider();
        provider.add_user("admin", "secret").unwrap();

        let wrong_password = provider.validate_login("admin", "nope").await;
        let unknown_user = provider.validate_login("ghost", "secret").await;

        assert!(matches!(wrong_password, Err(AuthError::InvalidAuth)));
        assert!(matches!(unknown_user, Err(AuthError::InvalidAuth)));
    }

    #[tokio::test]
    async fn test_disabled_user_is_rejected() {
        let (provider, _dir) = create_test_provider();
        provider.add_user("admin", "secret").unwrap();
        provider.set_disabled("admin", true).unwrap();

        let result = provider.validate_login("admin", "secret").await;
        assert!(matches!(result, Err(AuthError::InvalidAuth)));

        provider.set_disabled("admin", false).unwrap();
        provider.validate_login("admin", "secret").await.unwrap();
    }

    #[test]
    fn test_duplicate_and_empty_usernames() {
        let (provider, _dir) = create_test_provider();
        provider.add_user("admin", "secret").unwrap();

        assert!(matches!(
            provider.add_user(" Admin", "other"),
            Err(AuthError::UsernameTaken(_))
        ));
        assert!(matches!(
            provider.add_user("   ", "other"),
            Err(AuthError::EmptyUsername)
        ));
        assert_eq!(provider.user_count(), 1);
    }

    #[tokio::test]
    async fn test_change_password_and_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let hasher = CredentialHasher::with_params(256, 1, 1).unwrap();

        {
            let provider = LocalProvider::load(path.clone())
                .unwrap()
                .with_hasher(hasher.clone());
            provider.add_user("admin", "old").unwrap();
            provider.change_password("admin", "new").unwrap();
            provider.persist().await.unwrap();
        }

        // Reload from disk
        let provider = LocalProvider::load(path).unwrap().with_hasher(hasher);
        provider.validate_login("admin", "new").await.unwrap();
        assert!(provider.validate_login("admin", "old").await.is_err());
    }

    #[test]
    fn test_change_password_unknown_user() {
        let (provider, _dir) = create_test_provider();
        let result = provider.change_password("ghost", "new");
        assert!(matches!(result, Err(AuthError::InvalidUser(u)) if u == "ghost"));
    }

    #[tokio::test]
    async fn test_changes_stay_in_memory_until_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("auth.json");
        let provider = LocalProvider::load(path.clone())
            .unwrap()
            .with_hasher(CredentialHasher::with_params(256, 1, 1).unwrap());

        provider.add_user("admin", "secret").unwrap();
        assert!(!path.exists());

        provider.persist().await.unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_remove_and_list() {
        let (provider, _dir) = create_test_provider();
        provider.add_user("alice", "a").unwrap();
        provider.add_user("bob", "b").unwrap();

        provider.remove_user("ALICE").unwrap();
        let users = provider.list_users();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "bob");

        assert!(matches!(
            provider.remove_user("alice"),
            Err(AuthError::InvalidUser(_))
        ));
    }
}
