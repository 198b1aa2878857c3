/// Task scoping engine
///
/// Every operation receives an [`AuthContext`] produced by one of the gates
/// and applies its [`Scope`]:
///
/// | Operation | `CompanyScoped(c)`                           | `Unscoped`                   |
/// |-----------|----------------------------------------------|------------------------------|
/// | list      | company `c` must exist; no limit cap         | all companies; limit ≤ cap   |
/// | get       | `find_task_in_company`                       | `find_task`                  |
/// | create    | company `c`                                  | company from the request     |
/// | update    | scoped fetch, merge, save                    | fetch by id, merge, save     |
/// | delete    | scoped fetch, `delete_task_in_company`       | fetch, `delete_task`         |
///
/// A task outside the caller's scope is indistinguishable from a missing
/// one: both are `NotFound`. An assignee must be a member of the task's
/// company on create and on update.

use serde::Deserialize;
use tracing::{debug, info, warn};
use validator::Validate;

use crate::auth::{AuthContext, Scope};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{CompanyId, NewTask, Task, TaskDraft, TaskId, UserId};
use crate::store::SharedStore;

/// Listing defaults and the admin cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub default_limit: i64,
    pub default_offset: i64,

    /// Upper bound for unscoped listings; company listings are not capped
    pub admin_max_limit: i64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            default_limit: 10,
            default_offset: 0,
            admin_max_limit: 20,
        }
    }
}

/// Raw `limit` / `offset` query parameters
///
/// Kept as strings so that malformed values fall back to the defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageQuery {
    pub fn new(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 0)
        .unwrap_or(default)
}

impl PaginationPolicy {
    /// Resolves `(limit, offset)`; absent, non-numeric or negative values use
    /// the defaults
    pub fn resolve(&self, query: &PageQuery) -> (i64, i64) {
        (
            parse_or(query.limit.as_deref(), self.default_limit),
            parse_or(query.offset.as_deref(), self.default_offset),
        )
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: SharedStore,
    pagination: PaginationPolicy,
}

impl TaskService {
    pub fn new(store: SharedStore, pagination: PaginationPolicy) -> Self {
        Self { store, pagination }
    }

    /// Lists tasks visible in the context's scope, id ascending
    pub async fn list_tasks(&self, ctx: &AuthContext, query: &PageQuery) -> ServiceResult<Vec<Task>> {
        let (limit, offset) = self.pagination.resolve(query);

        match ctx.scope {
            Scope::CompanyScoped(company_id) => {
                self.require_company(company_id).await?;
                debug!(company_id, limit, offset, "Listing company tasks");
                Ok(self
                    .store
                    .list_tasks_by_company(company_id, limit, offset)
                    .await?)
            }
            Scope::Unscoped => {
                if limit > self.pagination.admin_max_limit {
                    return Err(ServiceError::invalid(format!(
                        "Limit exceeds the maximum allowed value of {}",
                        self.pagination.admin_max_limit
                    )));
                }
                debug!(limit, offset, "Listing all tasks");
                Ok(self.store.list_all_tasks(limit, offset).await?)
            }
        }
    }

    pub async fn get_task(&self, ctx: &AuthContext, task_id: TaskId) -> ServiceResult<Task> {
        self.fetch_scoped(ctx, task_id).await
    }

    /// Creates a task owned by the scope's company
    ///
    /// `company_id` is only read for unscoped (admin) callers, for whom it is
    /// required.
    pub async fn create_task(
        &self,
        ctx: &AuthContext,
        company_id: Option<CompanyId>,
        draft: TaskDraft,
    ) -> ServiceResult<Task> {
        draft.validate()?;

        let company_id = match ctx.scope {
            Scope::CompanyScoped(company_id) => company_id,
            Scope::Unscoped => {
                company_id.ok_or_else(|| ServiceError::invalid("company_id is required"))?
            }
        };
        self.require_company(company_id).await?;
        self.require_assignee(company_id, draft.assignee_id).await?;

        let task = self
            .store
            .create_task(NewTask {
                company_id,
                creator_id: ctx.identity.user_id,
                draft,
            })
            .await?;

        info!(
            task_id = task.id,
            company_id,
            creator_id = task.creator_id,
            "Task created"
        );
        Ok(task)
    }

    /// Overwrites the mutable fields of a task in scope
    ///
    /// `company_id`, `creator_id` and `created_at` always come from the
    /// stored record.
    pub async fn update_task(
        &self,
        ctx: &AuthContext,
        task_id: TaskId,
        draft: TaskDraft,
    ) -> ServiceResult<Task> {
        draft.validate()?;

        let current = self.fetch_scoped(ctx, task_id).await?;
        self.require_assignee(current.company_id, draft.assignee_id)
            .await?;

        let merged = current.merge_draft(draft);
        let saved = self.store.save_task(&merged).await?.ok_or_else(|| {
            debug!(task_id, "Task vanished before save");
            ServiceError::not_found("task")
        })?;

        info!(
            task_id,
            company_id = saved.company_id,
            status = saved.status.as_str(),
            "Task updated"
        );
        Ok(saved)
    }

    pub async fn delete_task(&self, ctx: &AuthContext, task_id: TaskId) -> ServiceResult<()> {
        let current = self.fetch_scoped(ctx, task_id).await?;

        let removed = match ctx.scope {
            Scope::CompanyScoped(company_id) => {
                self.store.delete_task_in_company(task_id, company_id).await?
            }
            Scope::Unscoped => self.store.delete_task(task_id).await?,
        };
        if removed == 0 {
            debug!(task_id, "Task vanished before delete");
            return Err(ServiceError::not_found("task"));
        }

        info!(task_id, company_id = current.company_id, "Task deleted");
        Ok(())
    }

    async fn fetch_scoped(&self, ctx: &AuthContext, task_id: TaskId) -> ServiceResult<Task> {
        let task = match ctx.scope {
            Scope::CompanyScoped(company_id) => {
                self.store.find_task_in_company(task_id, company_id).await?
            }
            Scope::Unscoped => self.store.find_task(task_id).await?,
        };

        task.ok_or_else(|| {
            debug!(task_id, company_id = ?ctx.company_id(), "Task not found in scope");
            ServiceError::not_found("task")
        })
    }

    async fn require_company(&self, company_id: CompanyId) -> ServiceResult<()> {
        match self.store.find_company(company_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found("company")),
        }
    }

    async fn require_assignee(
        &self,
        company_id: CompanyId,
        assignee_id: Option<UserId>,
    ) -> ServiceResult<()> {
        let Some(assignee_id) = assignee_id else {
            return Ok(());
        };

        if self
            .store
            .find_membership(company_id, assignee_id)
            .await?
            .is_none()
        {
            warn!(company_id, assignee_id, "Assignee is not a member of the company");
            return Err(ServiceError::not_found("assignee"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::Identity;
    use crate::error::StoreResult;
    use crate::models::{
        Company, CompanyMembership, NewUser, Role, TaskStatus, User, Visibility,
    };
    use crate::store::{AccountStore, CompanyStore, MembershipStore, TaskStore, UserStore};

    /// Fails the test if any store method is reached
    struct UnreachableStore;

    #[async_trait]
    impl UserStore for UnreachableStore {
        async fn find_user(&self, _: UserId) -> StoreResult<Option<User>> {
            unreachable!("store must not be called")
        }
        async fn find_user_by_username(&self, _: &str) -> StoreResult<Option<User>> {
            unreachable!("store must not be called")
        }
        async fn create_user(&self, _: NewUser) -> StoreResult<User> {
            unreachable!("store must not be called")
        }
    }

    #[async_trait]
    impl CompanyStore for UnreachableStore {
        async fn find_company(&self, _: CompanyId) -> StoreResult<Option<Company>> {
            unreachable!("store must not be called")
        }
        async fn create_company(&self, _: &str) -> StoreResult<Company> {
            unreachable!("store must not be called")
        }
    }

    #[async_trait]
    impl MembershipStore for UnreachableStore {
        async fn find_membership(
            &self,
            _: CompanyId,
            _: UserId,
        ) -> StoreResult<Option<CompanyMembership>> {
            unreachable!("store must not be called")
        }
        async fn create_memberships(&self, _: &[CompanyMembership]) -> StoreResult<()> {
            unreachable!("store must not be called")
        }
    }

    #[async_trait]
    impl TaskStore for UnreachableStore {
        async fn list_tasks_by_company(&self, _: CompanyId, _: i64, _: i64) -> StoreResult<Vec<Task>> {
            unreachable!("store must not be called")
        }
        async fn list_all_tasks(&self, _: i64, _: i64) -> StoreResult<Vec<Task>> {
            unreachable!("store must not be called")
        }
        async fn find_task(&self, _: TaskId) -> StoreResult<Option<Task>> {
            unreachable!("store must not be called")
        }
        async fn find_task_in_company(&self, _: TaskId, _: CompanyId) -> StoreResult<Option<Task>> {
            unreachable!("store must not be called")
        }
        async fn create_task(&self, _: NewTask) -> StoreResult<Task> {
            unreachable!("store must not be called")
        }
        async fn save_task(&self, _: &Task) -> StoreResult<Option<Task>> {
            unreachable!("store must not be called")
        }
        async fn delete_task(&self, _: TaskId) -> StoreResult<u64> {
            unreachable!("store must not be called")
        }
        async fn delete_task_in_company(&self, _: TaskId, _: CompanyId) -> StoreResult<u64> {
            unreachable!("store must not be called")
        }
    }

    #[async_trait]
    impl AccountStore for UnreachableStore {
        async fn register_user(&self, _: NewUser, _: &[CompanyId]) -> StoreResult<User> {
            unreachable!("store must not be called")
        }
    }

    fn admin_ctx() -> AuthContext {
        AuthContext {
            identity: Identity {
                user_id: 1,
                role: Role::Admin,
            },
            scope: Scope::Unscoped,
        }
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: "details".to_string(),
            due_date: None,
            assignee_id: None,
            visibility: Visibility::Company,
            status: TaskStatus::Pending,
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let policy = PaginationPolicy::default();

        assert_eq!(policy.resolve(&PageQuery::default()), (10, 0));
        assert_eq!(policy.resolve(&PageQuery::new(Some("abc"), Some("x1"))), (10, 0));
        assert_eq!(policy.resolve(&PageQuery::new(Some("-5"), Some("-1"))), (10, 0));
        assert_eq!(policy.resolve(&PageQuery::new(Some("3"), Some("6"))), (3, 6));
        assert_eq!(policy.resolve(&PageQuery::new(Some(""), None)), (10, 0));
    }

    #[tokio::test]
    async fn test_unscoped_limit_above_cap_never_reaches_store() {
        let service = TaskService::new(Arc::new(UnreachableStore), PaginationPolicy::default());

        let err = service
            .list_tasks(&admin_ctx(), &PageQuery::new(Some("30"), None))
            .await
            .unwrap_err();
        match err {
            ServiceError::InvalidArgument(message) => {
                assert_eq!(message, "Limit exceeds the maximum allowed value of 20")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_store() {
        let service = TaskService::new(Arc::new(UnreachableStore), PaginationPolicy::default());

        let err = service
            .create_task(&admin_ctx(), Some(1), draft(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let err = service
            .update_task(&admin_ctx(), 1, draft(""))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_unscoped_create_requires_company_id() {
        let service = TaskService::new(Arc::new(UnreachableStore), PaginationPolicy::default());

        let err = service
            .create_task(&admin_ctx(), None, draft("orphan"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }
}
