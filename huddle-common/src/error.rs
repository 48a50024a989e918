//! Common error types for Huddle services

use thiserror::Error;

/// Common result type for Huddle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types shared across the team-formation service
///
/// Variants map onto HTTP classes at the API boundary: `NotFound` is a
/// 404, `NotMember`/`Forbidden` are 403, the validation and
/// state-precondition variants are 400, everything else is 500.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not an active member of the team
    #[error("Not a member of this team: {0}")]
    NotMember(String),

    /// Caller lacks the required role for the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Submitted idea text is empty after trimming
    #[error("Idea cannot be empty")]
    EmptyContent,

    /// The jam session has ended
    #[error("This idea jam has ended")]
    SessionExpired,

    /// Record already exists for this key
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// State precondition not met for the operation
    #[error("Not ready: {0}")]
    NotReady(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
