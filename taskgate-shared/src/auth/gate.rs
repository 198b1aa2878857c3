/// Admin gate and membership gate
///
/// Both gates produce an [`AuthContext`]: the resolved identity plus the
/// [`Scope`] every task operation is filtered by.
///
/// - Admins reaching the admin surface get [`Scope::Unscoped`].
/// - Anyone reaching a company route gets [`Scope::CompanyScoped`] for the
///   path company. Members are checked against `company_users`; admins skip
///   the check but keep the company filter.
///
/// A missing membership is reported as `NotFound`, the same error as a
/// missing task, so the company's contents are not disclosed.

use tracing::debug;

use super::identity::Identity;
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CompanyId, Role};
use crate::store::SharedStore;

/// Filter applied to every task operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Cross-company; tasks addressed by id alone
    Unscoped,

    /// Only tasks of this company are visible
    CompanyScoped(CompanyId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub identity: Identity,
    pub scope: Scope,
}

impl AuthContext {
    pub fn company_id(&self) -> Option<CompanyId> {
        match self.scope {
            Scope::Unscoped => None,
            Scope::CompanyScoped(company_id) => Some(company_id),
        }
    }
}

pub fn is_admin(identity: &Identity) -> bool {
    match identity.role {
        Role::Admin => true,
        Role::Member => false,
    }
}

/// Entry check for the admin surface
///
/// Non-admins are rejected as `Unauthenticated`.
pub fn require_admin(identity: Identity) -> ServiceResult<AuthContext> {
    if !is_admin(&identity) {
        debug!(user_id = identity.user_id, "Non-admin rejected at admin gate");
        return Err(ServiceError::unauthenticated("admin privileges required"));
    }

    Ok(AuthContext {
        identity,
        scope: Scope::Unscoped,
    })
}

#[derive(Clone)]
pub struct MembershipGate {
    store: SharedStore,
}

impl MembershipGate {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Authorizes `identity` to act within `company_id`
    pub async fn authorize(
        &self,
        identity: Identity,
        company_id: CompanyId,
    ) -> ServiceResult<AuthContext> {
        if !is_admin(&identity)
            && self
                .store
                .find_membership(company_id, identity.user_id)
                .await?
                .is_none()
        {
            debug!(
                user_id = identity.user_id,
                company_id, "Membership check failed"
            );
            return Err(ServiceError::not_found("company"));
        }

        Ok(AuthContext {
            identity,
            scope: Scope::CompanyScoped(company_id),
        })
    }
}
