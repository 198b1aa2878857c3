/// User registration
///
/// A user is created together with one membership per requested company.
/// The memberships are written by [`AccountStore::register_user`] in the
/// same atomic step as the user, so a half-registered user never exists.

use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{ServiceError, ServiceResult, StoreError};
use crate::models::{CompanyId, NewUser, Role, User};
use crate::store::SharedStore;

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 255, message = "username must be 1 to 255 characters"))]
    pub username: String,

    #[validate(
        email(message = "email must be a valid address"),
        length(max = 255, message = "email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub role: Role,

    /// At least one; every id must be positive and refer to a company
    #[validate(length(min = 1, message = "at least one company is required"))]
    pub company_ids: Vec<CompanyId>,
}

#[derive(Clone)]
pub struct UserService {
    store: SharedStore,
}

impl UserService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Registers a user and its memberships
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a malformed request or an unknown company
    /// - `AlreadyExists` when the username is taken
    pub async fn register(&self, request: RegisterUser) -> ServiceResult<User> {
        request.validate()?;
        if let Some(bad) = request.company_ids.iter().find(|id| **id <= 0) {
            return Err(ServiceError::invalid(format!("invalid company id: {}", bad)));
        }
        for company_id in &request.company_ids {
            if self.store.find_company(*company_id).await?.is_none() {
                return Err(ServiceError::invalid(format!(
                    "company {} does not exist",
                    company_id
                )));
            }
        }

        let password_hash =
            hash_password(&request.password).map_err(|e| ServiceError::Internal(e.to_string()))?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
        };

        match self.store.register_user(new_user, &request.company_ids).await {
            Ok(user) => {
                info!(
                    user_id = user.id,
                    role = user.role.as_str(),
                    companies = request.company_ids.len(),
                    "User registered"
                );
                Ok(user)
            }
            Err(StoreError::Conflict(constraint)) if constraint == "users_username_key" => {
                warn!("Registration rejected: username taken");
                Err(ServiceError::AlreadyExists("username".to_string()))
            }
            Err(StoreError::Conflict(_)) => {
                Err(ServiceError::invalid("duplicate company id"))
            }
            Err(StoreError::MissingReference(_)) => {
                Err(ServiceError::invalid("company does not exist"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
