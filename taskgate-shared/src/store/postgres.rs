/// PostgreSQL store
///
/// Runtime-checked `sqlx` queries over a [`PgPool`]. Constraint violations are
/// translated by `From<sqlx::Error> for StoreError`, so a duplicate username
/// surfaces as [`crate::error::StoreError::Conflict`] and a dangling reference as
/// [`crate::error::StoreError::MissingReference`].
///
/// # Example
///
/// ```no_run
/// use taskgate_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskgate_shared::store::{CompanyStore, PgStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = PgStore::new(pool);
/// let company = store.create_company("Acme").await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountStore, CompanyStore, MembershipStore, TaskStore, UserStore};
use crate::error::StoreResult;
use crate::models::{
    Company, CompanyId, CompanyMembership, NewTask, NewUser, Task, TaskId, User, UserId,
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

const TASK_COLUMNS: &str = "id, company_id, creator_id, title, description, due_date, \
                            assignee_id, visibility, status, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn find_company(&self, id: CompanyId) -> StoreResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    async fn create_company(&self, name: &str) -> StoreResult<Company> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(company)
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn find_membership(
        &self,
        company_id: CompanyId,
        user_id: UserId,
    ) -> StoreResult<Option<CompanyMembership>> {
        let membership = sqlx::query_as::<_, CompanyMembership>(
            r#"
            SELECT company_id, user_id
            FROM company_users
            WHERE company_id = $1 AND user_id = $2
            "#,
        )
        .bind(company_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn create_memberships(&self, memberships: &[CompanyMembership]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for membership in memberships {
            sqlx::query("INSERT INTO company_users (company_id, user_id) VALUES ($1, $2)")
                .bind(membership.company_id)
                .bind(membership.user_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(())
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks_by_company(
        &self,
        company_id: CompanyId,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {}
            FROM tasks
            WHERE company_id = $1
            ORDER BY id ASC
            LIMIT $2 OFFSET $3
            "#,
            TASK_COLUMNS
        ))
        .bind(company_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn list_all_tasks(&self, limit: i64, offset: i64) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {}
            FROM tasks
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
            TASK_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn find_task(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn find_task_in_company(
        &self,
        id: TaskId,
        company_id: CompanyId,
    ) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND company_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let draft = task.draft;
        let created = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (company_id, creator_id, title, description, due_date,
                               assignee_id, visibility, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(task.company_id)
        .bind(task.creator_id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(draft.due_date)
        .bind(draft.assignee_id)
        .bind(draft.visibility)
        .bind(draft.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn save_task(&self, task: &Task) -> StoreResult<Option<Task>> {
        let saved = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                due_date = $4,
                assignee_id = $5,
                visibility = $6,
                status = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.due_date)
        .bind(task.assignee_id)
        .bind(task.visibility)
        .bind(task.status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_task_in_company(&self, id: TaskId, company_id: CompanyId) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND company_id = $2")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn register_user(&self, user: NewUser, company_ids: &[CompanyId]) -> StoreResult<User> {
        // Dropping `tx` on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(&mut *tx)
        .await?;

        for company_id in company_ids {
            sqlx::query("INSERT INTO company_users (company_id, user_id) VALUES ($1, $2)")
                .bind(company_id)
                .bind(created.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(created)
    }
}
