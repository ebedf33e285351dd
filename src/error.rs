//! Error types for the quotes service.

/// Database-related errors.
///
/// Lookups that simply miss return `Ok(None)` from the store; these
/// variants cover infrastructure and integrity failures only.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}
