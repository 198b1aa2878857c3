/// Domain models for Taskgate
///
/// Plain data types; persistence lives behind the traits in [`crate::store`].
///
/// # Models
///
/// - `user`: User accounts and the closed [`user::Role`] enum
/// - `company`: Companies, the aggregate root for task scoping
/// - `membership`: The (company, user) join rows that authorize access
/// - `task`: Tasks, their drafts and enums

pub mod company;
pub mod membership;
pub mod task;
pub mod user;

pub use company::{Company, CompanyId};
pub use membership::CompanyMembership;
pub use task::{NewTask, Task, TaskDraft, TaskId, TaskStatus, Visibility};
pub use user::{NewUser, Role, User, UserId};
