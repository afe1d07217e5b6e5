use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// The API crate maps each variant onto an HTTP status and a machine-readable
/// error code; see `spectra-api`'s `AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id found nothing.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a domain-level validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state (e.g. duplicate unique value).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller is authenticated but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Something unexpected went wrong inside the domain layer.
    #[error("Internal error: {0}")]
    Internal(String),
}
