use configuration::TourSettings;
use database::user::{email, name};
use database::{DbError, UserStore};
use thiserror::Error;

/// How the tour ended when every query succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TourOutcome {
    Named(String),
    /// The stored name was NULL; the tour stopped after logging that.
    NameAbsent,
}

#[derive(Error, Debug)]
pub enum TourError {
    #[error("could not create user")]
    Create(#[source] DbError),

    #[error("no user with email {0}")]
    NotFound(String),

    #[error("could not find user")]
    Find(#[source] DbError),
}

/// Creates the configured user, finds it again by email, and reads its name.
pub async fn run<S: UserStore + ?Sized>(
    store: &S,
    settings: &TourSettings,
) -> Result<TourOutcome, TourError> {
    let params = settings.name.iter().map(name::set).collect();
    let created = store
        .user()
        .create_one(email::set(settings.email.as_str()), params)
        .exec()
        .await
        .map_err(TourError::Create)?;
    tracing::info!("created user: {:?}", created);

    let user = store
        .user()
        .find_one(vec![email::equals(settings.email.as_str())])
        .exec()
        .await
        .map_err(|e| match e {
            DbError::NotFound => TourError::NotFound(settings.email.clone()),
            other => TourError::Find(other),
        })?;

    let Some(name) = user.name() else {
        tracing::info!("user's name is null");
        return Ok(TourOutcome::NameAbsent);
    };

    tracing::info!("The user's name is: {}", name);
    Ok(TourOutcome::Named(name.to_string()))
}
