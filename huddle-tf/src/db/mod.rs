//! Database queries for the team-formation service

pub mod jams;
pub mod profiles;
pub mod surveys;
pub mod teams;

/// Whether a sqlx error is a unique-constraint violation
///
/// Used where an existence check races an insert (duplicate survey,
/// concurrent jam start) and the constraint is the arbiter.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
