use crate::error::DbError;
use crate::user::{NewUser, User, UserActions, UserWhereParam};
use async_trait::async_trait;

/// Connection lifecycle of a client.
///
/// Methods take `&self` so a session can hold the client while the body of
/// the session borrows it for queries.
#[async_trait]
pub trait Lifecycle: Send + Sync {
    /// Opens the connection. Connecting an already connected client is
    /// [`DbError::AlreadyConnected`].
    async fn connect(&self) -> Result<(), DbError>;

    /// Releases the connection. Disconnecting a client that is not connected
    /// is [`DbError::NotConnected`].
    async fn disconnect(&self) -> Result<(), DbError>;

    async fn is_connected(&self) -> bool;
}

/// The storage operations the fluent user builders are executed against.
///
/// Implemented by the Postgres [`Client`](crate::Client) and by
/// [`InMemoryClient`](crate::InMemoryClient); anything else that implements
/// it can stand in for either.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. `user.id` has already been resolved by the builder.
    async fn insert_user(&self, user: NewUser) -> Result<User, DbError>;

    /// Returns users matching every predicate, at most `limit` of them.
    async fn find_users(
        &self,
        filter: &[UserWhereParam],
        limit: Option<i64>,
    ) -> Result<Vec<User>, DbError>;

    fn user(&self) -> UserActions<'_, Self> {
        UserActions::new(self)
    }
}
