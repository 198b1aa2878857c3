/// Username/password login

use tracing::{info, warn};

use crate::auth::jwt::TokenSigner;
use crate::auth::password::verify_password;
use crate::error::{ServiceError, ServiceResult};
use crate::models::User;
use crate::store::SharedStore;

const INVALID_CREDENTIALS: &str = "invalid credentials";

#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(store: SharedStore, signer: TokenSigner) -> Self {
        Self { store, signer }
    }

    /// Verifies the password and issues a bearer token
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> ServiceResult<(User, String)> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            warn!("Login failed: unknown username");
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        };

        let verified = verify_password(password, &user.password_hash).unwrap_or_else(|e| {
            warn!(user_id = user.id, error = %e, "Stored password hash is unusable");
            false
        });
        if !verified {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(ServiceError::unauthenticated(INVALID_CREDENTIALS));
        }

        let token = self
            .signer
            .issue(user.id)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }
}
