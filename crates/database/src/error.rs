use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Failed to connect to the database")]
    ConnectionError(#[source] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("The client is not connected.")]
    NotConnected,

    #[error("The client is already connected.")]
    AlreadyConnected,

    #[error("The requested data was not found in the database.")]
    NotFound,

    #[error("More than one record matched a query that expects exactly one.")]
    AmbiguousMatch,

    #[error("A user with {0} already exists.")]
    UniqueViolation(String),

    /// Raised by the in-memory backend when a failure has been scripted.
    #[error("Injected failure: {0}")]
    Injected(String),
}
