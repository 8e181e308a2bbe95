//! The local auth bridge

use crate::error::{BridgeError, BridgeResult};
use crate::payload::{AuthRequest, PasswordResetRequest};
use hostlink_auth::{AuthError, CredentialStore, ProviderRegistry, LOCAL_PROVIDER};
use hostlink_core::TrustedOrigin;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Validates and resets local credentials on behalf of the supervisor
pub struct LocalAuthBridge {
    /// Auth providers, looked up per request
    providers: ProviderRegistry,
    /// The only caller allowed through
    trusted_origin: TrustedOrigin,
}

impl LocalAuthBridge {
    /// Create a new bridge
    pub fn new(providers: ProviderRegistry, trusted_origin: TrustedOrigin) -> Self {
        Self {
            providers,
            trusted_origin,
        }
    }

    /// Reject every caller except the trusted supervisor
    pub fn check_origin(&self, caller: IpAddr) -> BridgeResult<()> {
        if self.trusted_origin.is_trusted(caller) {
            Ok(())
        } else {
            error!("Invalid auth request from {}", caller);
            Err(BridgeError::OriginRejected(caller))
        }
    }

    fn provider(&self) -> BridgeResult<Arc<dyn CredentialStore>> {
        self.providers.get(LOCAL_PROVIDER).ok_or_else(|| {
            error!("Can't find local auth provider");
            BridgeError::ProviderUnavailable
        })
    }

    /// Check a username/password pair
    pub async fn verify_credentials(&self, request: &AuthRequest) -> BridgeResult<()> {
        let provider = self.provider()?;
        provider
            .validate_login(&request.username, &request.password)
            .await?;
        debug!("Credentials of {:?} accepted for add-on {}", request.username, request.addon);
        Ok(())
    }

    /// Set a new password and persist the store.
    ///
    /// The store is only persisted after the change succeeded.
    pub async fn reset_password(&self, request: PasswordResetRequest) -> BridgeResult<()> {
        let provider = self.provider()?;

        let worker = Arc::clone(&provider);
        let PasswordResetRequest { username, password } = request;
        let user = username.clone();
        tokio::task::spawn_blocking(move || worker.change_password(&user, &password))
            .await
            .map_err(AuthError::from)??;

        provider.persist().await?;
        info!("Password of {:?} reset by supervisor", username);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use hostlink_auth::{AuthResult, StorageError};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        fail_change: bool,
        fail_persist: bool,
        panic_change: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CredentialStore for RecordingStore {
        async fn validate_login(&self, username: &str, password: &str) -> AuthResult<()> {
            self.calls.lock().unwrap().push("validate");
            if username == "admin" && password == "secret" {
                Ok(())
            } else {
                Err(AuthError::InvalidAuth)
            }
        }

        fn change_password(&self, username: &str, _new_password: &str) -> AuthResult<()> {
            self.calls.lock().unwrap().push("change");
            if self.panic_change {
                panic!("store crashed");
            }
            if self.fail_change {
                return Err(AuthError::InvalidUser(username.to_string()));
            }
            Ok(())
        }

        async fn persist(&self) -> AuthResult<()> {
            self.calls.lock().unwrap().push("persist");
            if self.fail_persist {
                return Err(StorageError::Io(std::io::Error::other("read-only")).into());
            }
            Ok(())
        }
    }

    fn bridge_with(store: Arc<RecordingStore>) -> LocalAuthBridge {
        let mut providers = ProviderRegistry::new();
        providers.register(LOCAL_PROVIDER, store);
        LocalAuthBridge::new(providers, "172.30.32.2:80".parse().unwrap())
    }

    fn reset(username: &str) -> PasswordResetRequest {
        PasswordResetRequest {
            username: username.to_string(),
            password: "new-secret".to_string(),
        }
    }

    #[test]
    fn test_check_origin() {
        let bridge = bridge_with(Arc::default());
        assert!(bridge.check_origin("172.30.32.2".parse().unwrap()).is_ok());
        assert!(matches!(
            bridge.check_origin("172.30.32.1".parse().unwrap()),
            Err(BridgeError::OriginRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let store = Arc::new(RecordingStore::default());
        let bridge = bridge_with(store.clone());

        let mut request = AuthRequest {
            username: "admin".into(),
            password: "secret".into(),
            addon: "samba".into(),
        };
        bridge.verify_credentials(&request).await.unwrap();

        request.password = "wrong".into();
        assert!(matches!(
            bridge.verify_credentials(&request).await,
            Err(BridgeError::CredentialRejected(AuthError::InvalidAuth))
        ));
        assert_eq!(store.calls(), vec!["validate", "validate"]);
    }

    #[tokio::test]
    async fn test_missing_provider() {
        let bridge = LocalAuthBridge::new(
            ProviderRegistry::new(),
            "172.30.32.2:80".parse().unwrap(),
        );
        assert!(matches!(
            bridge.reset_password(reset("admin")).await,
            Err(BridgeError::ProviderUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_reset_changes_then_persists() {
        let store = Arc::new(RecordingStore::default());
        let bridge = bridge_with(store.clone());

        bridge.reset_password(reset("admin")).await.unwrap();
        assert_eq!(store.calls(), vec!["change", "persist"]);
    }

    #[tokio::test]
    async fn test_failed_change_skips_persist() {
        let store = Arc::new(RecordingStore {
            fail_change: true,
            ..Default::default()
        });
        let bridge = bridge_with(store.clone());

        let result = bridge.reset_password(reset("ghost")).await;
        assert!(matches!(
            result,
            Err(BridgeError::CredentialRejected(AuthError::InvalidUser(_)))
        ));
        assert_eq!(store.calls(), vec!["change"]);
    }

    #[tokio::test]
    async fn test_failed_persist_is_rejected() {
        let store = Arc::new(RecordingStore {
            fail_persist: true,
            ..Default::default()
        });
        let bridge = bridge_with(store.clone());

        let result = bridge.reset_password(reset("admin")).await;
        assert!(matches!(
            result,
            Err(BridgeError::CredentialRejected(AuthError::Storage(_)))
        ));
        assert_eq!(store.calls(), vec!["change", "persist"]);
    }

    #[tokio::test]
    async fn test_worker_panic_is_rejected() {
        let store = Arc::new(RecordingStore {
            panic_change: true,
            ..Default::default()
        });
        let bridge = bridge_with(store.clone());

        let result = bridge.reset_password(reset("admin")).await;
        assert!(matches!(
            result,
            Err(BridgeError::CredentialRejected(AuthError::Worker(_)))
        ));
        assert_eq!(store.calls(), vec!["change"]);
    }
}
