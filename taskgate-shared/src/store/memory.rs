/// In-memory store
///
/// All tables live behind a single `tokio::sync::RwLock`, so every write,
/// including a whole registration, is applied under one write guard. Ids are
/// per-table counters starting at 1. Referential checks mirror the foreign
/// keys of the PostgreSQL schema so both backends fail the same way.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountStore, CompanyStore, MembershipStore, TaskStore, UserStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{
    Company, CompanyId, CompanyMembership, NewTask, NewUser, Task, TaskId, User, UserId,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    companies: BTreeMap<CompanyId, Company>,
    memberships: BTreeSet<CompanyMembership>,
    tasks: BTreeMap<TaskId, Task>,
    last_user_id: UserId,
    last_company_id: CompanyId,
    last_task_id: TaskId,
}

impl Tables {
    fn insert_user(&mut self, user: NewUser) -> StoreResult<User> {
        if self.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }

        self.last_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: self.last_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(created.id, created.clone());
        Ok(created)
    }

    fn check_memberships(&self, memberships: &[CompanyMembership]) -> StoreResult<()> {
        let mut seen = BTreeSet::new();
        for membership in memberships {
            if !self.companies.contains_key(&membership.company_id) {
                return Err(StoreError::MissingReference(
                    "company_users_company_id_fkey".to_string(),
                ));
            }
            if !self.users.contains_key(&membership.user_id) {
                return Err(StoreError::MissingReference(
                    "company_users_user_id_fkey".to_string(),
                ));
            }
            if self.memberships.contains(membership) || !seen.insert(*membership) {
                return Err(StoreError::Conflict("company_users_pkey".to_string()));
            }
        }
        Ok(())
    }

    fn check_task_refs(&self, company_id: CompanyId, assignee_id: Option<UserId>) -> StoreResult<()> {
        if !self.companies.contains_key(&company_id) {
            return Err(StoreError::MissingReference("tasks_company_id_fkey".to_string()));
        }
        if let Some(assignee_id) = assignee_id {
            if !self.users.contains_key(&assignee_id) {
                return Err(StoreError::MissingReference("tasks_assignee_id_fkey".to_string()));
            }
        }
        Ok(())
    }
}

fn page<'a>(tasks: impl Iterator<Item = &'a Task>, limit: i64, offset: i64) -> Vec<Task> {
    tasks
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        self.tables.write().await.insert_user(user)
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn find_company(&self, id: CompanyId) -> StoreResult<Option<Company>> {
        Ok(self.tables.read().await.companies.get(&id).cloned())
    }

    async fn create_company(&self, name: &str) -> StoreResult<Company> {
        let mut tables = self.tables.write().await;
        tables.last_company_id += 1;
        let now = Utc::now();
        let company = Company {
            id: tables.last_company_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.companies.insert(company.id, company.clone());
        Ok(company)
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn find_membership(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> StoreResult<Option<CompanyMembership>> {
        let key = CompanyMembership::new(company_id, user_id);
        Ok(self.tables.read().await.memberships.get(&key).copied())
    }

    async fn create_memberships(&self, memberships: &[CompanyMembership]) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_memberships(memberships)?;
        tables.memberships.extend(memberships.iter().copied());
        Ok(())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks_by_company(
        &self,
        company_id: CompanyId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let tasks = tables.tasks.values().filter(|t| t.company_id == company_id);
        Ok(page(tasks, limit, offset))
    }

    async fn list_all_tasks(&self, limit: i64, offset: i64) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(page(tables.tasks.values(), limit, offset))
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        Ok(self.tables.read().await.tasks.get(&id).cloned())
    }

    async fn find_task_in_company(
        &self,
        id: TaskId,
        company_id: CompanyId,
    ) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.company_id == company_id)
            .cloned())
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        tables.check_task_refs(task.company_id, task.draft.assignee_id)?;
        if !tables.users.contains_key(&task.creator_id) {
            return Err(StoreError::MissingReference("tasks_creator_id_fkey".to_string()));
        }

        tables.last_task_id += 1;
        let now = Utc::now();
        let draft = task.draft;
        let created = Task {
            id: tables.last_task_id,
            company_id: task.company_id,
            creator_id: task.creator_id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            assignee_id: draft.assignee_id,
            visibility: draft.visibility,
            status: draft.status,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let Some(company_id) = tables.tasks.get(&task.id).map(|t| t.company_id) else {
            return Ok(None);
        };
        tables.check_task_refs(company_id, task.assignee_id)?;

        let Some(stored) = tables.tasks.get_mut(&task.id) else {
            return Ok(None);
        };
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.due_date = task.due_date;
        stored.assignee_id = task.assignee_id;
        stored.visibility = task.visibility;
        stored.status = task.status;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<u64> {
        let removed = self.tables.write().await.tasks.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn delete_task_in_company(&self, id: TaskId, company_id: CompanyId) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        match tables.tasks.get(&id) {
            Some(task) if task.company_id == company_id => {
                tables.tasks.remove(&id);
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn register_user(&self, user: NewUser, company_ids: &[CompanyId]) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        // Validate everything before the first insert so a failure leaves no trace.
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("users_username_key".to_string()));
        }
        let mut seen = BTreeSet::new();
        for company_id in company_ids {
            if !tables.companies.contains_key(company_id) {
                return Err(StoreError::MissingReference(
                    "company_users_company_id_fkey".to_string(),
                ));
            }
            if !seen.insert(*company_id) {
                return Err(StoreError::Conflict("company_users_pkey".to_string()));
            }
        }

        let created = tables.insert_user(user)?;
        tables.memberships.extend(
            company_ids
                .iter()
                .map(|company_id| CompanyMembership::new(*company_id, created.id)),
        );
        Ok(created)
    }
}
