//! A local stand-in for the realtime websocket endpoint.

use futures::{SinkExt, StreamExt};
use linkshield_test_utils::TestError;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::mpsc, task::JoinHandle};
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::util::SETTLE_TIMEOUT;

/// Accepts a single websocket connection, acknowledges joins, records the client's
/// channel frames and pushes frames on request.
pub struct FakeRealtime {
    url: String,
    pushes: mpsc::UnboundedSender<String>,
    frames: mpsc::UnboundedReceiver<Value>,
    handle: JoinHandle<()>,
}

impl FakeRealtime {
    pub async fn start() -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        let (pushes, mut outgoing) = mpsc::unbounded_channel::<String>();
        let (frame_tx, frames) = mpsc::unbounded_channel::<Value>();

        let handle = tokio::spawn(async move {
            let Ok((stream, _)) = listener.accept().await else { return };
            let Ok(socket) = accept_async(stream).await else { return };
            let (mut sink, mut stream) = socket.split();

            loop {
                tokio::select! {
                    frame = stream.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            let Ok(frame) = serde_json::from_str::<Value>(&text) else { continue };
                            if frame["topic"] == "phoenix" {
                                continue;
                            }
                            if frame["event"] != "phx_join" {
                                let _ = frame_tx.send(frame);
                                continue;
                            }

                            let reply = json!({
                                "topic": frame["topic"],
                                "event": "phx_reply",
                                "payload": { "status": "ok", "response": { "postgres_changes": [] } },
                                "ref": frame["ref"],
                            });
                            let _ = frame_tx.send(frame);
                            if sink.send(Message::Text(reply.to_string())).await.is_err() {
                                break;
                            }
                        }
                        Some(Ok(_)) => {}
                        _ => break,
                    },
                    push = outgoing.recv() => match push {
                        Some(text) => {
                            if sink.send(Message::Text(text)).await.is_err() {
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        Ok(Self {
            url: format!("http://{}", address),
            pushes,
            frames,
            handle,
        })
    }

    /// Base URL to configure the client with.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Wait for the client's join frame.
    ///
    /// # Panics
    /// Panics if no join arrives in time
    pub async fn next_join(&mut self) -> Value {
        self.next_frame("phx_join").await
    }

    /// Wait for the client's leave frame.
    ///
    /// # Panics
    /// Panics if no leave arrives in time
    pub async fn next_leave(&mut self) -> Value {
        self.next_frame("phx_leave").await
    }

    async fn next_frame(&mut self, event: &str) -> Value {
        let frames = &mut self.frames;
        let wait = async move {
            while let Some(frame) = frames.recv().await {
                if frame["event"] == event {
                    return Some(frame);
                }
            }
            None
        };

        tokio::time::timeout(SETTLE_TIMEOUT, wait)
            .await
            .unwrap_or_else(|_| panic!("Timed out waiting for {}", event))
            .expect("Realtime server stopped")
    }

    /// Push a row change on `topic`.
    ///
    /// # Arguments
    /// - `topic` - Channel topic, e.g. `realtime:scans_7`
    /// - `change_type` - `INSERT`, `UPDATE` or `DELETE`
    /// - `table` - Table the change happened on
    /// - `record` / `old_record` - New and previous row images
    pub fn push_change(
        &self,
        topic: &str,
        change_type: &str,
        table: &str,
        record: Option<Value>,
        old_record: Option<Value>,
    ) {
        let frame = json!({
            "topic": topic,
            "event": "postgres_changes",
            "payload": {
                "ids": [1],
                "data": {
                    "type": change_type,
                    "table": table,
                    "schema": "public",
                    "record": record,
                    "old_record": old_record,
                    "commit_timestamp": "2025-03-01T12:00:00Z",
                },
            },
            "ref": null,
        });
        let _ = self.pushes.send(frame.to_string());
    }

    /// Push a raw text frame.
    pub fn push_text(&self, text: &str) {
        let _ = self.pushes.send(text.to_string());
    }

    /// Close the channel from the server side.
    pub fn close_channel(&self, topic: &str) {
        let frame = json!({ "topic": topic, "event": "phx_close", "payload": {}, "ref": null });
        let _ = self.pushes.send(frame.to_string());
    }
}

impl Drop for FakeRealtime {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
