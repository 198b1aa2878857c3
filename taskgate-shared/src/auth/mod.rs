/// Authentication and authorization
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing
/// - [`jwt`]: HS256 bearer token issuing and verification
/// - [`identity`]: Resolves a bearer credential to an [`identity::Identity`]
/// - [`gate`]: The admin gate and the company membership gate
///
/// # Flow
///
/// ```text
/// Authorization header ─▶ IdentityResolver ─▶ is_admin ─┬─▶ Scope::Unscoped
///                                                        └─▶ MembershipGate ─▶ Scope::CompanyScoped
/// ```

pub mod gate;
pub mod identity;
pub mod jwt;
pub mod password;

pub use gate::{is_admin, require_admin, AuthContext, MembershipGate, Scope};
pub use identity::{Identity, IdentityResolver};
pub use jwt::TokenSigner;
