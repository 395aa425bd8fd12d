use std::sync::Arc;
use crate::auth::{CredentialHasher, TokenService};
use crate::errors::{AppResult, AuthError};
use crate::models::UserIdentity;
use crate::services::Store;

/// Login and caller resolution on top of the credential hasher, the token
/// service and the store.
pub struct AuthGateway {
    store: Arc<dyn Store>,
    hasher: CredentialHasher,
    tokens: TokenService,
    decoy_hash: String,
}

impl AuthGateway {
    pub fn new(
        store: Arc<dyn Store>,
        hasher: CredentialHasher,
        tokens: TokenService,
    ) -> AppResult<Self> {
        let decoy_hash = hasher.decoy()?;
        Ok(Self {
            store,
            hasher,
            tokens,
            decoy_hash,
        })
    }

    pub fn hasher(&self) -> &CredentialHasher {
        &self.hasher
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Exchange an email and password for a bearer token.
    ///
    /// An unknown email and a wrong password both fail with
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, identifier: &str, plaintext: &str) -> AppResult<String> {
        let user = self.store.find_user_by_email(identifier).await?;

        let verified = match &user {
            Some(user) => self.hasher.verify(plaintext, &user.password_hash),
            None => {
                let _ = self.hasher.verify(plaintext, &self.decoy_hash);
                false
            }
        };

        match user {
            Some(user) if verified => {
                tracing::info!("Issued token for user: {}", user.email);
                self.tokens.issue(&user.email)
            }
            Some(_) => {
                tracing::debug!("Password mismatch for user: {}", identifier);
                Err(AuthError::InvalidCredentials.into())
            }
            None => {
                tracing::debug!("Login for unknown user: {}", identifier);
                Err(AuthError::InvalidCredentials.into())
            }
        }
    }

    /// Validate a bearer token and resolve its subject to a live user.
    pub async fn resolve_caller(&self, token: &str) -> AppResult<UserIdentity> {
        let subject = self.tokens.validate(token)?;

        let user = self
            .store
            .find_user_by_email(&subject)
            .await?
            .ok_or(AuthError::UnknownSubject)?;

        tracing::debug!("Resolved caller: {}", user.email);
        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::User;
    use crate::services::MemoryStore;
    use chrono::Duration;
    use uuid::Uuid;

    async fn gateway_with_user(email: &str, password: &str) -> (AuthGateway, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let hasher = CredentialHasher::new(4, 8);
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: hasher.hash(password).unwrap(),
        };
        store.insert_user(&user).await.unwrap();

        let tokens = TokenService::new(b"gateway-secret", Duration::minutes(30));
        let gateway = AuthGateway::new(store.clone(), hasher, tokens).unwrap();
        (gateway, store)
    }

    #[tokio::test]
    async fn test_login_then_resolve() {
        let (gateway, _) = gateway_with_user("auth@test.com", "supersecret").await;

        let token = gateway.login("auth@test.com", "supersecret").await.unwrap();
        let caller = gateway.resolve_caller(&token).await.unwrap();
        assert_eq!(caller.email, "auth@test.com");
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_fail_alike() {
        let (gateway, _) = gateway_with_user("auth@test.com", "supersecret").await;

        let wrong_password = gateway.login("auth@test.com", "wrongpassword").await;
        let unknown_user = gateway.login("nobody@test.com", "supersecret").await;

        assert!(matches!(wrong_password, Err(AppError::Auth(AuthError::InvalidCredentials))));
        assert!(matches!(unknown_user, Err(AppError::Auth(AuthError::InvalidCredentials))));
    }

    #[tokio::test]
    async fn test_token_for_missing_user_is_unknown_subject() {
        let (gateway, _) = gateway_with_user("auth@test.com", "supersecret").await;

        // Validly signed, but nobody by that email exists.
        let token = gateway.tokens().issue("ghost@test.com").unwrap();
        let result = gateway.resolve_caller(&token).await;
        assert!(matches!(result, Err(AppError::Auth(AuthError::UnknownSubject))));
    }

    #[tokio::test]
    async fn test_garbage_token_is_rejected() {
        let (gateway, _) = gateway_with_user("auth@test.com", "supersecret").await;
        let result = gateway.resolve_caller("garbage").await;
        assert!(matches!(result, Err(AppError::Auth(AuthError::Malformed))));
    }
}
