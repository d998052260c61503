use crate::error::DbError;
use crate::store::{Lifecycle, UserStore};
use crate::user::{NewUser, User, UserWhereParam};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A process-local client that keeps users in memory.
///
/// It enforces the same unique `id` and `email` constraints as the `users`
/// table, and it can be scripted to fail at any lifecycle step, which makes
/// it the stand-in client for tests as well as the `--in-memory` backend.
#[derive(Debug, Default)]
pub struct InMemoryClient {
    users: RwLock<Vec<User>>,
    connected: AtomicBool,
    connect_failure: Option<String>,
    disconnect_failure: Option<String>,
    insert_failure: Option<String>,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    insert_calls: AtomicUsize,
    find_calls: AtomicUsize,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `connect` fail with `message`.
    pub fn with_connect_failure(mut self, message: impl Into<String>) -> Self {
        self.connect_failure = Some(message.into());
        self
    }

    /// Makes every `disconnect` fail with `message`, after releasing the connection.
    pub fn with_disconnect_failure(mut self, message: impl Into<String>) -> Self {
        self.disconnect_failure = Some(message.into());
        self
    }

    /// Makes every insert fail with `message`.
    pub fn with_insert_failure(mut self, message: impl Into<String>) -> Self {
        self.insert_failure = Some(message.into());
        self
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Snapshot of all stored users, in insertion order.
    pub async fn users(&self) -> Vec<User> {
        self.users.read().await.clone()
    }

    fn ensure_connected(&self) -> Result<(), DbError> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DbError::NotConnected)
        }
    }
}

#[async_trait]
impl Lifecycle for InMemoryClient {
    async fn connect(&self) -> Result<(), DbError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.connect_failure {
            return Err(DbError::Injected(message.clone()));
        }
        if self.connected.swap(true, Ordering::SeqCst) {
            return Err(DbError::AlreadyConnected);
        }
        tracing::debug!("In-memory client connected.");
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DbError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if !self.connected.swap(false, Ordering::SeqCst) {
            return Err(DbError::NotConnected);
        }
        if let Some(message) = &self.disconnect_failure {
            return Err(DbError::Injected(message.clone()));
        }
        tracing::debug!("In-memory client disconnected.");
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InMemoryClient {
    async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_connected()?;
        if let Some(message) = &self.insert_failure {
            return Err(DbError::Injected(message.clone()));
        }

        let mut users = self.users.write().await;
        if users.iter().any(|existing| existing.id == user.id) {
            return Err(DbError::UniqueViolation(format!("id `{}`", user.id)));
        }
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(DbError::UniqueViolation(format!("email `{}`", user.email)));
        }

        let created = User::new(user.id, user.email, user.name);
        users.push(created.clone());
        Ok(created)
    }

    async fn find_users(
        &self,
        filter: &[UserWhereParam],
        limit: Option<i64>,
    ) -> Result<Vec<User>, DbError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_connected()?;

        let limit = limit.map_or(usize::MAX, |n| usize::try_from(n).unwrap_or(0));
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|user| filter.iter().all(|param| param.matches(user)))
            .take(limit)
            .cloned()
            .collect())
    }
}
