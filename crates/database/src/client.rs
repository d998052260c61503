use crate::connection::{connect, run_migrations};
use crate::error::DbError;
use crate::store::{Lifecycle, UserStore};
use crate::user::{NewUser, User, UserWhereParam};
use async_trait::async_trait;
use configuration::DatabaseSettings;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tokio::sync::RwLock;

/// The PostgreSQL-backed client.
///
/// Construction does no I/O; the pool is created by [`Lifecycle::connect`]
/// and closed by [`Lifecycle::disconnect`].
#[derive(Debug)]
pub struct Client {
    settings: DatabaseSettings,
    pool: RwLock<Option<PgPool>>,
}

impl Client {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            settings,
            pool: RwLock::new(None),
        }
    }

    async fn pool(&self) -> Result<PgPool, DbError> {
        self.pool.read().await.clone().ok_or(DbError::NotConnected)
    }
}

#[async_trait]
impl Lifecycle for Client {
    async fn connect(&self) -> Result<(), DbError> {
        let mut slot = self.pool.write().await;
        if slot.is_some() {
            return Err(DbError::AlreadyConnected);
        }

        let pool = connect(&self.settings).await?;
        if self.settings.run_migrations {
            run_migrations(&pool).await?;
        }
        *slot = Some(pool);

        tracing::info!("Connected to the database.");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DbError> {
        let pool = self.pool.write().await.take().ok_or(DbError::NotConnected)?;
        pool.close().await;
        tracing::info!("Disconnected from the database.");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.pool.read().await.is_some()
    }
}

#[async_trait]
impl UserStore for Client {
    async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let pool = self.pool().await?;

        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, name) VALUES ($1, $2, $3) RETURNING id, email, name",
        )
        .bind(user.id)
        .bind(user.email.clone())
        .bind(user.name)
        .fetch_one(&pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::UniqueViolation(format!("email `{}`", user.email))
            }
            other => other.into(),
        })
    }

    async fn find_users(
        &self,
        filter: &[UserWhereParam],
        limit: Option<i64>,
    ) -> Result<Vec<User>, DbError> {
        let pool = self.pool().await?;
        let mut query = select_users(filter, limit);
        let users = query.build_query_as::<User>().fetch_all(&pool).await?;
        Ok(users)
    }
}

/// Builds `SELECT ... FROM users` with one bound equality per predicate.
fn select_users(filter: &[UserWhereParam], limit: Option<i64>) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT id, email, name FROM users");

    for (i, param) in filter.iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        match param {
            UserWhereParam::Id(id) => {
                query.push("id = ").push_bind(id.clone());
            }
            UserWhereParam::Email(email) => {
                query.push("email = ").push_bind(email.clone());
            }
            UserWhereParam::Name(Some(name)) => {
                query.push("name = ").push_bind(name.clone());
            }
            UserWhereParam::Name(None) => {
                query.push("name IS NULL");
            }
        }
    }

    if let Some(limit) = limit {
        query.push(" LIMIT ").push_bind(limit);
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{email, name};

    #[test]
    fn select_without_filter_has_no_where_clause() {
        let query = select_users(&[], None);
        assert_eq!(query.sql(), "SELECT id, email, name FROM users");
    }

    #[test]
    fn select_binds_each_predicate() {
        let query = select_users(&[email::equals("a@example.com"), name::equals(None)], Some(2));
        assert_eq!(
            query.sql(),
            "SELECT id, email, name FROM users WHERE email = $1 AND name IS NULL LIMIT $2"
        );
    }

    #[tokio::test]
    async fn queries_before_connect_are_rejected() {
        let client = Client::new(DatabaseSettings::default());
        assert!(!client.is_connected().await);
        let result = client.user().find_first(vec![email::equals("a@example.com")]).exec().await;
        assert!(matches!(result, Err(DbError::NotConnected)));
    }

    #[tokio::test]
    async fn connect_without_url_is_a_config_error() {
        let client = Client::new(DatabaseSettings::default());
        assert!(matches!(client.connect().await, Err(DbError::ConnectionConfigError(_))));
        assert!(matches!(client.disconnect().await, Err(DbError::NotConnected)));
    }
}
