/// Persistence collaborators
///
/// The stores own no policy. Every authorization decision is made by the
/// gates and the task service before a store method is reached; the stores
/// only filter by the keys they are handed.
///
/// # Backends
///
/// - [`memory::MemoryStore`]: process-local tables behind one lock. Used when
///   no database is configured and throughout the test suites.
/// - [`postgres::PgStore`]: sqlx over a `PgPool`.
///
/// Both implement every trait below, so they satisfy [`Store`] through the
/// blanket impl.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{
    Company, CompanyId, CompanyMembership, NewTask, NewUser, Task, TaskId, User, UserId,
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Inserts a user; a taken username is [`crate::error::StoreError::Conflict`]
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn find_company(&self, id: CompanyId) -> StoreResult<Option<Company>>;

    async fn create_company(&self, name: &str) -> StoreResult<Company>;
}

#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find_membership(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> StoreResult<Option<CompanyMembership>>;

    /// Inserts all rows or none
    async fn create_memberships(&self, memberships: &[CompanyMembership]) -> StoreResult<()>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks of one company, id ascending
    async fn list_tasks_by_company(
        &self,
        company_id: CompanyId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Task>>;

    /// Tasks of every company, id ascending
    async fn list_all_tasks(&self, limit: i64, offset: i64) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>>;

    /// `None` when the task is absent or belongs to another company
    async fn find_task_in_company(
        &self,
        id: TaskId,
        company_id: CompanyId,
    ) -> StoreResult<Option<Task>>;

    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;

    /// Overwrites the mutable columns of `task` and refreshes `updated_at`
    ///
    /// Returns `None` when the row no longer exists.
    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>>;

    /// Returns the number of rows removed
    async fn delete_task(&self, id: TaskId) -> StoreResult<u64>;

    /// Returns the number of rows removed; 0 if the task is in another company
    async fn delete_task_in_company(&self, id: TaskId, company_id: CompanyId) -> StoreResult<u64>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates a user together with its memberships in one atomic step
    ///
    /// On any failure neither the user nor any membership is persisted.
    async fn register_user(&self, user: NewUser, company_ids: &[CompanyId]) -> StoreResult<User>;
}

/// Everything the services need from a backend
pub trait Store: UserStore + CompanyStore + MembershipStore + TaskStore + AccountStore {}

impl<T> Store for T where T: UserStore + CompanyStore + MembershipStore + TaskStore + AccountStore {}

/// Store handle shared by the gates and services
pub type SharedStore = std::sync::Arc<dyn Store>;
