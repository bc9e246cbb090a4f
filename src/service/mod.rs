//! Stateful services consumed by the front end.
//!
//! Each service owns its state in `tokio::sync::watch` channels and is cheap to clone.
//! Services that mirror a table start a change feed with `start_change_feed` and stop it
//! with `dispose`.

pub mod collection;
pub mod diagnostic;
pub mod history;
pub mod scan;
pub mod session;
pub mod usage;

use std::future::Future;

use dioxus_logger::tracing;
use tokio_util::sync::CancellationToken;

use crate::backend::realtime::{ChangeEvent, ChangeFeed};

/// Drive `handle` with every event from `feed` until the feed ends or `cancel` fires.
///
/// Events are handled one at a time, in receipt order.
pub(crate) fn spawn_change_loop<T, F, Fut>(
    mut feed: ChangeFeed<T>,
    cancel: CancellationToken,
    mut handle: F,
) where
    T: Send + 'static,
    F: FnMut(ChangeEvent<T>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = feed.recv() => event,
            };

            match event {
                Some(event) => handle(event).await,
                None => break,
            }
        }

        tracing::debug!(topic = feed.topic(), "Change loop stopped");
    });
}
