//! The `User` record, its field directives, and the fluent query builders.
//!
//! Queries read like a generated client:
//!
//! ```ignore
//! let created = client
//!     .user()
//!     .create_one(user::email::set("john.doe@example.com"), vec![user::name::set("John Doe")])
//!     .exec()
//!     .await?;
//!
//! let found = client
//!     .user()
//!     .find_one(vec![user::email::equals("john.doe@example.com")])
//!     .exec()
//!     .await?;
//! ```

use crate::error::DbError;
use crate::store::UserStore;
use sqlx::FromRow;
use uuid::Uuid;

/// A row of the `users` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name,
        }
    }

    /// The stored name, or `None` when the column is NULL.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The insert payload handed to [`UserStore::insert_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// A field assignment for `create_one`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserSetParam {
    Id(String),
    Name(Option<String>),
}

/// An equality predicate for `find_one` / `find_first`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserWhereParam {
    Id(String),
    Email(String),
    /// `None` matches rows whose name is NULL.
    Name(Option<String>),
}

impl UserWhereParam {
    /// Whether `user` satisfies this predicate.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserWhereParam::Id(id) => &user.id == id,
            UserWhereParam::Email(email) => &user.email == email,
            UserWhereParam::Name(name) => user.name == *name,
        }
    }
}

pub mod id {
    use super::{UserSetParam, UserWhereParam};

    pub fn set(value: impl Into<String>) -> UserSetParam {
        UserSetParam::Id(value.into())
    }

    pub fn equals(value: impl Into<String>) -> UserWhereParam {
        UserWhereParam::Id(value.into())
    }
}

pub mod email {
    use super::UserWhereParam;

    /// The required email assignment; `create_one` takes it positionally.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Set(pub(crate) String);

    pub fn set(value: impl Into<String>) -> Set {
        Set(value.into())
    }

    pub fn equals(value: impl Into<String>) -> UserWhereParam {
        UserWhereParam::Email(value.into())
    }
}

pub mod name {
    use super::{UserSetParam, UserWhereParam};

    pub fn set(value: impl Into<String>) -> UserSetParam {
        UserSetParam::Name(Some(value.into()))
    }

    pub fn set_null() -> UserSetParam {
        UserSetParam::Name(None)
    }

    pub fn equals(value: Option<String>) -> UserWhereParam {
        UserWhereParam::Name(value)
    }
}

/// Entry point for user queries, obtained from [`UserStore::user`].
pub struct UserActions<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: UserStore + ?Sized> UserActions<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Starts an insert. `email` is required; the optional `params` are
    /// applied in order, so a later directive for a field replaces an earlier one.
    pub fn create_one(self, email: email::Set, params: Vec<UserSetParam>) -> CreateOne<'a, S> {
        let mut create = CreateOne {
            store: self.store,
            id: None,
            email: email.0,
            name: None,
        };
        for param in params {
            match param {
                UserSetParam::Id(id) => create.id = Some(id),
                UserSetParam::Name(name) => create.name = name,
            }
        }
        create
    }

    /// Looks up exactly one user matching every predicate.
    pub fn find_one(self, filter: Vec<UserWhereParam>) -> FindOne<'a, S> {
        FindOne {
            store: self.store,
            filter,
        }
    }

    /// Looks up the first user matching every predicate, if any.
    pub fn find_first(self, filter: Vec<UserWhereParam>) -> FindFirst<'a, S> {
        FindFirst {
            store: self.store,
            filter,
        }
    }
}

#[must_use = "queries do nothing until `exec` is awaited"]
pub struct CreateOne<'a, S: ?Sized> {
    store: &'a S,
    id: Option<String>,
    email: String,
    name: Option<String>,
}

impl<S: UserStore + ?Sized> CreateOne<'_, S> {
    /// Inserts the user, generating a UUID v4 id if none was set.
    pub async fn exec(self) -> Result<User, DbError> {
        let data = NewUser {
            id: self.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            email: self.email,
            name: self.name,
        };
        tracing::debug!(id = %data.id, email = %data.email, "Inserting user.");
        self.store.insert_user(data).await
    }
}

#[must_use = "queries do nothing until `exec` is awaited"]
pub struct FindOne<'a, S: ?Sized> {
    store: &'a S,
    filter: Vec<UserWhereParam>,
}

impl<S: UserStore + ?Sized> FindOne<'_, S> {
    /// Resolves to the single matching user.
    ///
    /// Zero matches is [`DbError::NotFound`] and more than one is
    /// [`DbError::AmbiguousMatch`]; both are distinct from transport errors.
    pub async fn exec(self) -> Result<User, DbError> {
        let mut users = self.store.find_users(&self.filter, Some(2)).await?;
        match users.len() {
            0 => Err(DbError::NotFound),
            1 => Ok(users.remove(0)),
            _ => Err(DbError::AmbiguousMatch),
        }
    }
}

#[must_use = "queries do nothing until `exec` is awaited"]
pub struct FindFirst<'a, S: ?Sized> {
    store: &'a S,
    filter: Vec<UserWhereParam>,
}

impl<S: UserStore + ?Sized> FindFirst<'_, S> {
    pub async fn exec(self) -> Result<Option<User>, DbError> {
        let users = self.store.find_users(&self.filter, Some(1)).await?;
        Ok(users.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_accessor_distinguishes_null() {
        let named = User::new("1", "a@example.com", Some("A".to_string()));
        let nameless = User::new("2", "b@example.com", None);
        assert_eq!(named.name(), Some("A"));
        assert_eq!(nameless.name(), None);
    }

    #[test]
    fn name_predicate_matches_null_only_with_none() {
        let nameless = User::new("2", "b@example.com", None);
        assert!(name::equals(None).matches(&nameless));
        assert!(!name::equals(Some(String::new())).matches(&nameless));
    }
}
