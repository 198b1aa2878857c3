/// Identity resolution
///
/// Turns the raw `Authorization` header value into an [`Identity`]. The user
/// is looked up on every call, so a deleted user stops authenticating even
/// while their token is still within its lifetime.

use tracing::debug;

use super::jwt::TokenSigner;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{Role, UserId};
use crate::store::SharedStore;

/// Authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub role: Role,
}

#[derive(Clone)]
pub struct IdentityResolver {
    signer: TokenSigner,
    store: SharedStore,
}

impl IdentityResolver {
    pub fn new(signer: TokenSigner, store: SharedStore) -> Self {
        Self { signer, store }
    }

    /// Resolves a credential; an optional `Bearer ` prefix is accepted
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` for a missing, empty, malformed, expired or
    ///   unverifiable credential, or for a user that no longer exists
    /// - `StoreFailure` if the user lookup fails
    pub async fn resolve(&self, credential: Option<&str>) -> ServiceResult<Identity> {
        let token = credential
            .map(|raw| raw.trim())
            .map(|raw| raw.strip_prefix("Bearer ").unwrap_or(raw).trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::unauthenticated("missing credential"))?;

        let claims = self.signer.verify(token).map_err(|e| {
            debug!(error = %e, "Rejected bearer token");
            ServiceError::unauthenticated("invalid or expired token")
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| ServiceError::unauthenticated("invalid or expired token"))?;

        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| {
                debug!(user_id, "Token subject no longer exists");
                ServiceError::unauthenticated("unknown user")
            })?;

        Ok(Identity {
            user_id: user.id,
            role: user.role,
        })
    }
}
