use crate::error::DbError;
use crate::store::Lifecycle;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError<E> {
    #[error("could not connect")]
    Connect(#[source] DbError),

    #[error("could not disconnect")]
    Disconnect(#[source] DbError),

    #[error(transparent)]
    Body(E),
}

/// Runs `body` between a `connect` and a `disconnect` of `client`.
///
/// If `connect` fails the body is dropped unpolled and `disconnect` is not
/// called. Otherwise `disconnect` runs exactly once, whether the body returns
/// `Ok`, returns `Err`, or panics. A panic is resumed after the disconnect.
/// When both the body and the disconnect fail, the body's error is returned
/// and the disconnect error is logged.
pub async fn run_session<C, Fut, T, E>(client: &C, body: Fut) -> Result<T, SessionError<E>>
where
    C: Lifecycle + ?Sized,
    Fut: Future<Output = Result<T, E>>,
{
    client.connect().await.map_err(SessionError::Connect)?;

    let outcome = AssertUnwindSafe(body).catch_unwind().await;
    let disconnected = client.disconnect().await;

    match outcome {
        Err(panic) => {
            if let Err(e) = &disconnected {
                tracing::error!(error = %e, "Could not disconnect after a panic.");
            }
            std::panic::resume_unwind(panic)
        }
        Ok(Err(e)) => {
            if let Err(disconnect_err) = &disconnected {
                tracing::error!(error = %disconnect_err, "Could not disconnect after a failed session.");
            }
            Err(SessionError::Body(e))
        }
        Ok(Ok(value)) => {
            disconnected.map_err(SessionError::Disconnect)?;
            Ok(value)
        }
    }
}
