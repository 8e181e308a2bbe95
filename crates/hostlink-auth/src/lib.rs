//! Hostlink Auth - Local credential store and auth providers
//!
//! Provides the credential store the bridge validates logins against and
//! resets passwords in.
//!
//! # Providers
//!
//! Every provider implements [`CredentialStore`]. Providers are registered by
//! name in a [`ProviderRegistry`]; the bridge looks up [`LOCAL_PROVIDER`] on
//! each request and answers 404 when it is missing.
//!
//! The bundled [`LocalProvider`] keeps argon2id password hashes in a JSON
//! document and only writes it back on [`CredentialStore::persist`].
//!
//! # Example
//!
//! ```no_run
//! use hostlink_auth::{CredentialStore, LocalProvider, ProviderRegistry, LOCAL_PROVIDER};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let provider = LocalProvider::load("auth_provider.json").unwrap();
//!     provider.add_user("admin", "hunter22").unwrap();
//!     provider.persist().await.unwrap();
//!
//!     let mut registry = ProviderRegistry::new();
//!     registry.register(LOCAL_PROVIDER, Arc::new(provider));
//!
//!     let store = registry.get(LOCAL_PROVIDER).unwrap();
//!     if store.validate_login("admin", "hunter22").await.is_ok() {
//!         println!("credentials accepted");
//!     }
//! }
//! ```

pub mod credential;
pub mod error;
pub mod password;
pub mod provider;
pub mod registry;
pub mod storage;

pub use credential::{normalize_username, Credential, CredentialInfo};
pub use error::{AuthError, AuthResult};
pub use password::CredentialHasher;
pub use provider::{CredentialStore, LocalProvider};
pub use registry::{ProviderRegistry, LOCAL_PROVIDER};
pub use storage::{CredentialFile, StorageError, StorageResult, StoredData, STORAGE_VERSION};
