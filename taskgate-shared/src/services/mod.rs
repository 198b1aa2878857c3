/// Application services
///
/// - [`tasks`]: the task scoping engine behind every task endpoint
/// - [`users`]: registration of a user with its company memberships
/// - [`auth`]: username/password login issuing bearer tokens
///
/// Services take an [`crate::auth::AuthContext`] (or nothing, for the public
/// operations) and return [`crate::error::ServiceResult`].

pub mod auth;
pub mod tasks;
pub mod users;

pub use auth::AuthService;
pub use tasks::{PageQuery, PaginationPolicy, TaskService};
pub use users::{RegisterUser, UserService};
