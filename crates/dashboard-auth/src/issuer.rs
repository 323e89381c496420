//! Credential check and access token issuing.

use async_trait::async_trait;
use tracing::{debug, error, instrument};

use dashboard_config::JwtConfig;
use dashboard_core::verify_password;

use crate::error::AuthError;
use crate::jwt::create_access_token;

/// What the issuer needs to know about an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

/// Lookup of stored credentials by username.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_credential(&self, username: &str) -> anyhow::Result<Option<Credential>>;
}

/// Checks `username`/`password` and mints an access token carrying the
/// account's role.
///
/// Empty input is rejected without touching the store. An unknown user and a
/// wrong password produce the same [`AuthError::InvalidCredentials`].
#[instrument(skip(store, password, jwt_config))]
pub async fn issue_token<S>(
    store: &S,
    username: &str,
    password: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AuthError>
where
    S: CredentialStore + ?Sized,
{
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let credential = store
        .find_credential(username)
        .await
        .map_err(|e| {
            error!(error = ?e, "Credential lookup failed");
            AuthError::CredentialStore(e)
        })?
        .ok_or_else(|| {
            debug!("Unknown username");
            AuthError::InvalidCredentials
        })?;

    let matches = verify_password(password, &credential.password_hash)
        .map_err(|_| AuthError::CredentialCheckFailed)?;
    if !matches {
        debug!("Password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    create_access_token(&credential.username, &credential.role, jwt_config)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::jwt::verify_token;

    struct FixedStore {
        credentials: Vec<Credential>,
        lookups: AtomicUsize,
    }

    impl FixedStore {
        fn new() -> Self {
            let hash = bcrypt::hash("password", 4).unwrap();
            Self {
                credentials: vec![
                    Credential {
                        username: "user1".to_string(),
                        password_hash: hash.clone(),
                        role: "admin".to_string(),
                    },
                    Credential {
                        username: "user2".to_string(),
                        password_hash: hash,
                        role: "user".to_string(),
                    },
                ],
                lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialStore for FixedStore {
        async fn find_credential(&self, username: &str) -> anyhow::Result<Option<Credential>> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .credentials
                .iter()
                .find(|c| c.username == username)
                .cloned())
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl CredentialStore for BrokenStore {
        async fn find_credential(&self, _username: &str) -> anyhow::Result<Option<Credential>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    fn config() -> JwtConfig {
        JwtConfig::new("issuer_test_secret", 3600)
    }

    #[tokio::test]
    async fn test_issued_token_carries_role() {
        let store = FixedStore::new();
        let token = issue_token(&store, "user2", "password", &config())
            .await
            .unwrap();

        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.role, "user");
        assert_eq!(claims.sub, "user2");
    }

    #[tokio::test]
    async fn test_empty_credentials_skip_the_store() {
        let store = FixedStore::new();

        for (username, password) in [("", "password"), ("user1", ""), ("", "")] {
            let result = issue_token(&store, username, password, &config()).await;
            assert!(matches!(result, Err(AuthError::MissingCredentials)));
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_are_indistinguishable() {
        let store = FixedStore::new();

        let unknown = issue_token(&store, "nobody", "password", &config())
            .await
            .unwrap_err();
        let wrong = issue_token(&store, "user1", "wrong", &config())
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_store_failure_is_internal() {
        let result = issue_token(&BrokenStore, "user1", "password", &config()).await;
        assert!(matches!(result, Err(AuthError::CredentialStore(_))));
    }
}
