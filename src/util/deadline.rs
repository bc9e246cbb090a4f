//! Deadline wrapper for externally bound calls.
//!
//! [`with_deadline`] races an operation against a timer and reports which one finished
//! first as a [`Deadline`]. When the timer wins, the operation future is dropped, which
//! cancels the in-flight request.

use std::{future::Future, time::Duration};

use crate::error::Error;

/// Outcome of an operation run under a deadline.
#[derive(Debug)]
pub enum Deadline<T, E> {
    /// The operation completed successfully in time.
    Ok(T),
    /// The deadline elapsed first.
    TimedOut,
    /// The operation completed in time but failed.
    Failed(E),
}

/// Run `operation` and give up once `limit` has elapsed.
pub async fn with_deadline<T, E, F>(limit: Duration, operation: F) -> Deadline<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(Ok(value)) => Deadline::Ok(value),
        Ok(Err(err)) => Deadline::Failed(err),
        Err(_) => Deadline::TimedOut,
    }
}

impl<T, E> Deadline<T, E> {
    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut)
    }

    /// Convert into a `Result`, mapping a timeout to [`Error::Timeout`].
    pub fn into_result(self, operation: &'static str, limit: Duration) -> Result<T, Error>
    where
        Error: From<E>,
    {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Failed(err) => Err(Error::from(err)),
            Self::TimedOut => Err(Error::Timeout {
                operation,
                after: limit,
            }),
        }
    }
}
