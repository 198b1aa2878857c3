/// Error taxonomy shared by the stores and the services
///
/// Two layers:
///
/// - [`StoreError`]: what a persistence backend reports. Backend-specific
///   errors (e.g. `sqlx::Error`) are converted into it at the store boundary.
/// - [`ServiceError`]: what the services report to their callers. Store
///   failures are wrapped into [`ServiceError::StoreFailure`] so callers never
///   match on persistence details.
///
/// # Information hiding
///
/// `NotFound` covers both "does not exist" and "exists but outside your
/// scope". Callers must not be able to tell the two apart.

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated (e.g. duplicate username)
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A referenced row does not exist (foreign key violation)
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),

    /// Any other backend failure
    #[error("Database error: {0}")]
    Database(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            if db_err.is_unique_violation() {
                return StoreError::Conflict(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint);
            }
        }
        StoreError::Database(err.to_string())
    }
}

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, malformed, expired or unverifiable credential
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Resource absent, or present but outside the caller's scope
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed identifiers, limit above cap, missing draft fields
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Resource already exists (e.g. duplicate username)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Underlying persistence error; never shown to clients verbatim
    #[error("Store failure: {0}")]
    StoreFailure(#[from] StoreError),

    /// Hashing or token signing failed
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(what: impl Into<String>) -> Self {
        ServiceError::NotFound(what.into())
    }

    pub fn invalid(what: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(what.into())
    }

    pub fn unauthenticated(what: impl Into<String>) -> Self {
        ServiceError::Unauthenticated(what.into())
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        ServiceError::InvalidArgument(format!("invalid fields: {}", fields.join(", ")))
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;
