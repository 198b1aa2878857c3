/// Company membership model
///
/// A row in `company_users` is the only fact that authorizes a non-admin user
/// to act within a company.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE company_users (
///     company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     PRIMARY KEY (company_id, user_id)
/// );
/// ```

use serde::{Deserialize, Serialize};

use super::{CompanyId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanyMembership {
    pub company_id: CompanyId,
    pub user_id: UserId,
}

impl CompanyMembership {
    pub fn new(company_id: CompanyId, user_id: UserId) -> Self {
        Self {
            company_id,
            user_id,
        }
    }
}
