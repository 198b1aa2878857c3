/// Task model
///
/// Tasks belong to exactly one company for their whole life. There is no
/// workflow engine: `status` is set directly by the caller on create and
/// update, and any status may follow any other (done → pending is allowed).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_visibility AS ENUM ('company', 'private');
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     company_id BIGINT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
///     creator_id BIGINT NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     due_date TIMESTAMPTZ,
///     assignee_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     visibility task_visibility NOT NULL,
///     status task_status NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CompanyId, UserId};

/// Task identifier
pub type TaskId = i64;

/// Who may see a task inside its company
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_visibility", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Company,
    Private,
}

/// Progress of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Persisted task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    pub id: TaskId,

    /// Scoping key; never changes after creation
    pub company_id: CompanyId,

    /// User who created the task
    pub creator_id: UserId,

    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,

    /// Must be a member of `company_id` when set
    pub assignee_id: Option<UserId>,

    pub visibility: Visibility,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied mutable fields of a task
///
/// Used for both create and update. On update every field overwrites the
/// stored value, so an absent `due_date` or `assignee_id` clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TaskDraft {
    #[validate(length(min = 1, max = 255, message = "title must be 1 to 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub assignee_id: Option<UserId>,

    pub visibility: Visibility,
    pub status: TaskStatus,
}

/// Input for inserting a task
#[derive(Debug, Clone)]
pub struct NewTask {
    pub company_id: CompanyId,
    pub creator_id: UserId,
    pub draft: TaskDraft,
}

impl Task {
    /// Applies a draft on top of this record
    ///
    /// `id`, `company_id`, `creator_id` and `created_at` always come from
    /// `self`; everything else comes from the draft.
    pub fn merge_draft(&self, draft: TaskDraft) -> Task {
        Task {
            id: self.id,
            company_id: self.company_id,
            creator_id: self.creator_id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            assignee_id: draft.assignee_id,
            visibility: draft.visibility,
            status: draft.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_task() -> Task {
        let created = Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: 7,
            company_id: 1,
            creator_id: 11,
            title: "Write report".to_string(),
            description: "Quarterly numbers".to_string(),
            due_date: None,
            assignee_id: Some(11),
            visibility: Visibility::Company,
            status: TaskStatus::Pending,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        let status: TaskStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, TaskStatus::InProgress);
        assert!(serde_json::from_str::<Visibility>("\"public\"").is_err());
    }

    #[test]
    fn test_merge_draft_keeps_identity_fields() {
        let task = sample_task();
        let merged = task.merge_draft(TaskDraft {
            title: "Rewrite report".to_string(),
            description: "Annual numbers".to_string(),
            due_date: None,
            assignee_id: None,
            visibility: Visibility::Private,
            status: TaskStatus::Done,
        });

        assert_eq!(merged.id, task.id);
        assert_eq!(merged.company_id, task.company_id);
        assert_eq!(merged.creator_id, task.creator_id);
        assert_eq!(merged.created_at, task.created_at);
        assert_eq!(merged.title, "Rewrite report");
        assert_eq!(merged.assignee_id, None);
        assert_eq!(merged.status, TaskStatus::Done);
    }

    #[test]
    fn test_done_may_return_to_pending() {
        let mut task = sample_task();
        task.status = TaskStatus::Done;
        let draft = TaskDraft {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: None,
            assignee_id: None,
            visibility: task.visibility,
            status: TaskStatus::Pending,
        };

        assert_eq!(task.merge_draft(draft).status, TaskStatus::Pending);
    }

    #[test]
    fn test_draft_requires_title_and_description() {
        let draft = TaskDraft {
            title: String::new(),
            description: String::new(),
            due_date: None,
            assignee_id: None,
            visibility: Visibility::Company,
            status: TaskStatus::Pending,
        };

        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("description"));
    }

    #[test]
    fn test_draft_title_fits_column() {
        let mut draft = TaskDraft {
            title: "t".repeat(255),
            description: "fits".to_string(),
            due_date: None,
            assignee_id: None,
            visibility: Visibility::Company,
            status: TaskStatus::Pending,
        };
        assert!(draft.validate().is_ok());

        draft.title.push('t');
        let errors = draft.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
