//! Realtime change-feed subscriptions.
//!
//! [`RealtimeClient::subscribe`] opens one websocket per feed, joins a channel for a
//! table and row filter, and spawns a reader task that decodes row changes into
//! [`ChangeEvent`]s delivered in receipt order over an unbounded channel. Dropping or
//! closing the [`ChangeFeed`] leaves the channel and closes the socket.
//!
//! Dropped sockets are not re-established; the feed ends and a warning is logged.

pub mod messages;

use std::{fmt, marker::PhantomData, time::Duration};

use dioxus_logger::tracing;
use futures::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use tokio::{sync::mpsc, time::Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use crate::{
    backend::{
        realtime::messages::{ChangeType, PostgresChange, ServerMessage},
        BackendClient,
    },
    error::backend::BackendError,
    model::Keyed,
};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
const PROTOCOL_VERSION: &str = "1.0.0";

/// Server-side row filter, e.g. `user_id=eq.7`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    column: String,
    value: String,
}

impl ChangeFilter {
    pub fn eq(column: &str, value: impl fmt::Display) -> Self {
        Self {
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ChangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=eq.{}", self.column, self.value)
    }
}

/// A decoded row change. Deletes only carry the primary key of the removed row.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent<T> {
    Insert(T),
    Update(T),
    Delete(i32),
}

impl<T> ChangeEvent<T>
where
    T: DeserializeOwned + Keyed,
{
    pub fn from_change(change: PostgresChange) -> Result<Self, BackendError> {
        match change.change_type {
            ChangeType::Insert => Ok(Self::Insert(decode_record(change.record)?)),
            ChangeType::Update => Ok(Self::Update(decode_record(change.record)?)),
            ChangeType::Delete => {
                let key = change
                    .old_record
                    .as_ref()
                    .and_then(|old| old.get(T::KEY_FIELD))
                    .and_then(|key| key.as_i64())
                    .and_then(|key| i32::try_from(key).ok())
                    .ok_or_else(|| {
                        BackendError::Realtime(format!(
                            "Delete event on {} is missing {}",
                            change.table,
                            T::KEY_FIELD
                        ))
                    })?;

                Ok(Self::Delete(key))
            }
        }
    }
}

fn decode_record<T: DeserializeOwned>(record: Option<serde_json::Value>) -> Result<T, BackendError> {
    let record = record
        .ok_or_else(|| BackendError::Realtime("Change event is missing its record".to_string()))?;

    Ok(serde_json::from_value(record)?)
}

/// A live subscription. Events arrive in the order the server sent them.
pub struct ChangeFeed<T> {
    topic: String,
    events: mpsc::UnboundedReceiver<ChangeEvent<T>>,
    cancel: CancellationToken,
}

impl<T> ChangeFeed<T> {
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Next change, or `None` once the feed has ended.
    pub async fn recv(&mut self) -> Option<ChangeEvent<T>> {
        self.events.recv().await
    }

    /// Leave the channel and close the socket.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Drop for ChangeFeed<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

pub struct RealtimeClient {
    client: BackendClient,
    heartbeat_interval: Duration,
}

impl RealtimeClient {
    /// Creates a new instance of [`RealtimeClient`]
    pub fn new(client: BackendClient) -> Self {
        Self {
            client,
            heartbeat_interval: HEARTBEAT_INTERVAL,
        }
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Websocket URL derived from the backend URL.
    pub fn socket_url(&self) -> String {
        let base = self.client.base_url();
        let base = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };

        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn={}",
            base,
            self.client.anon_key(),
            PROTOCOL_VERSION
        )
    }

    /// Subscribe to every change on `table` matching `filter`.
    ///
    /// Connection errors are returned; errors after the channel is joined end the feed
    /// and are logged.
    pub async fn subscribe<T>(
        &self,
        channel: &str,
        table: &str,
        filter: Option<ChangeFilter>,
    ) -> Result<ChangeFeed<T>, BackendError>
    where
        T: DeserializeOwned + Keyed + Send + 'static,
    {
        let (socket, _response) = connect_async(self.socket_url())
            .await
            .map_err(|e| BackendError::Realtime(format!("Failed to connect: {}", e)))?;
        let (mut sink, stream) = socket.split();

        let topic = messages::channel_topic(channel);
        let filter = filter.map(|f| f.to_string());
        let join = messages::join(
            &topic,
            table,
            filter.as_deref(),
            &self.client.access_token(),
            1,
        );
        let text = join.to_text()?;

        sink.send(Message::Text(text))
            .await
            .map_err(|e| BackendError::Realtime(format!("Failed to join {}: {}", topic, e)))?;

        tracing::debug!(topic = %topic, table, filter = ?filter, "Joined change feed");

        let (events_tx, events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let reader = FeedReader {
            topic: topic.clone(),
            heartbeat_interval: self.heartbeat_interval,
            events: events_tx,
            cancel: cancel.clone(),
            reference: 1,
            _row: PhantomData,
        };

        tokio::spawn(reader.run(sink, stream));

        Ok(ChangeFeed {
            topic,
            events,
            cancel,
        })
    }
}

struct FeedReader<T> {
    topic: String,
    heartbeat_interval: Duration,
    events: mpsc::UnboundedSender<ChangeEvent<T>>,
    cancel: CancellationToken,
    reference: u64,
    _row: PhantomData<fn() -> T>,
}

impl<T> FeedReader<T>
where
    T: DeserializeOwned + Keyed + Send + 'static,
{
    fn next_reference(&mut self) -> u64 {
        self.reference += 1;
        self.reference
    }

    async fn run<S, R>(mut self, mut sink: S, mut stream: R)
    where
        S: futures::Sink<Message> + Unpin,
        S::Error: fmt::Display,
        R: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
    {
        let mut heartbeat = tokio::time::interval_at(
            Instant::now() + self.heartbeat_interval,
            self.heartbeat_interval,
        );

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let reference = self.next_reference();
                    let leave = messages::leave(&self.topic, reference);
                    if let Ok(text) = leave.to_text() {
                        let _ = sink.send(Message::Text(text)).await;
                    }
                    let _ = sink.close().await;

                    tracing::debug!(topic = %self.topic, "Left change feed");
                    break;
                }
                _ = heartbeat.tick() => {
                    let frame = messages::heartbeat(self.next_reference());
                    let Ok(text) = frame.to_text() else { continue };

                    if let Err(e) = sink.send(Message::Text(text)).await {
                        tracing::warn!(topic = %self.topic, error = %e, "Failed to send heartbeat, live updates stopped");
                        break;
                    }
                }
                frame = stream.next() => {
                    match frame {
                        Some(Ok(Message::Text(text))) => {
                            if !self.handle_text(&text) {
                                break;
                            }
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::warn!(topic = %self.topic, ?frame, "Change feed closed by server, live updates stopped");
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            tracing::warn!(topic = %self.topic, error = %e, "Change feed socket error, live updates stopped");
                            break;
                        }
                        None => {
                            tracing::warn!(topic = %self.topic, "Change feed socket ended, live updates stopped");
                            break;
                        }
                    }
                }
            }
        }

        self.cancel.cancel();
    }

    /// Handle one text frame. Returns false when the feed should stop.
    fn handle_text(&self, text: &str) -> bool {
        let (topic, message) = match messages::parse_message(text) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(topic = %self.topic, error = %e, "Ignoring malformed realtime frame");
                return true;
            }
        };

        if topic != self.topic {
            return true;
        }

        match message {
            ServerMessage::Change(change) => match ChangeEvent::<T>::from_change(change) {
                Ok(event) => self.events.send(event).is_ok(),
                Err(e) => {
                    tracing::warn!(topic = %self.topic, error = %e, "Ignoring undecodable change event");
                    true
                }
            },
            ServerMessage::Reply { ok: false, response, .. } => {
                tracing::warn!(topic = %self.topic, %response, "Change feed request rejected");
                true
            }
            ServerMessage::System { ok: false, message } => {
                tracing::warn!(topic = %self.topic, reason = %message, "Change feed subscription error");
                true
            }
            ServerMessage::Error | ServerMessage::Close => {
                tracing::warn!(topic = %self.topic, "Change feed channel closed, live updates stopped");
                false
            }
            _ => true,
        }
    }
}
