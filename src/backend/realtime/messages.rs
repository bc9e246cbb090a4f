//! Phoenix channel frames used by the realtime change feed.
//!
//! Every frame is a JSON object `{"topic", "event", "payload", "ref"}`. Outgoing frames
//! are built with [`join`], [`heartbeat`] and [`leave`]; incoming frames are classified by
//! [`parse_message`].

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const PHOENIX_TOPIC: &str = "phoenix";
pub const EVENT_JOIN: &str = "phx_join";
pub const EVENT_LEAVE: &str = "phx_leave";
pub const EVENT_REPLY: &str = "phx_reply";
pub const EVENT_ERROR: &str = "phx_error";
pub const EVENT_CLOSE: &str = "phx_close";
pub const EVENT_HEARTBEAT: &str = "heartbeat";
pub const EVENT_POSTGRES_CHANGES: &str = "postgres_changes";
pub const EVENT_SYSTEM: &str = "system";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoenixMessage {
    pub topic: String,
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl PhoenixMessage {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Channel topic for a named subscription.
pub fn channel_topic(channel: &str) -> String {
    format!("realtime:{}", channel)
}

/// Join a channel listening for every change on `table` matching `filter`.
pub fn join(
    topic: &str,
    table: &str,
    filter: Option<&str>,
    access_token: &str,
    reference: u64,
) -> PhoenixMessage {
    let mut change = json!({ "event": "*", "schema": "public", "table": table });
    if let Some(filter) = filter {
        change["filter"] = Value::String(filter.to_string());
    }

    PhoenixMessage {
        topic: topic.to_string(),
        event: EVENT_JOIN.to_string(),
        payload: json!({
            "config": {
                "broadcast": { "self": false },
                "presence": { "key": "" },
                "postgres_changes": [change],
            },
            "access_token": access_token,
        }),
        reference: Some(reference.to_string()),
    }
}

pub fn heartbeat(reference: u64) -> PhoenixMessage {
    PhoenixMessage {
        topic: PHOENIX_TOPIC.to_string(),
        event: EVENT_HEARTBEAT.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

pub fn leave(topic: &str, reference: u64) -> PhoenixMessage {
    PhoenixMessage {
        topic: topic.to_string(),
        event: EVENT_LEAVE.to_string(),
        payload: json!({}),
        reference: Some(reference.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// A row change pushed by the database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PostgresChange {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub table: String,
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub old_record: Option<Value>,
    #[serde(default)]
    pub commit_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChangesPayload {
    data: PostgresChange,
}

#[derive(Debug, Deserialize)]
struct ReplyPayload {
    status: String,
    #[serde(default)]
    response: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Reply to a frame we sent, matched by reference.
    Reply {
        reference: Option<String>,
        ok: bool,
        response: Value,
    },
    Change(PostgresChange),
    /// Server-side status notice, e.g. the subscription being ready or failing.
    System { ok: bool, message: String },
    /// The channel crashed on the server.
    Error,
    /// The server closed the channel.
    Close,
    /// Any other event (presence, broadcast) not used by the change feed.
    Other(String),
}

/// Parse a text frame into its topic and classified message.
///
/// Returns `Err` for malformed JSON or a malformed payload of a known event.
pub fn parse_message(text: &str) -> Result<(String, ServerMessage), serde_json::Error> {
    let frame: PhoenixMessage = serde_json::from_str(text)?;

    let message = match frame.event.as_str() {
        EVENT_REPLY => {
            let reply: ReplyPayload = serde_json::from_value(frame.payload)?;
            ServerMessage::Reply {
                reference: frame.reference,
                ok: reply.status == "ok",
                response: reply.response,
            }
        }
        EVENT_POSTGRES_CHANGES => {
            let changes: ChangesPayload = serde_json::from_value(frame.payload)?;
            ServerMessage::Change(changes.data)
        }
        EVENT_SYSTEM => ServerMessage::System {
            ok: frame.payload["status"].as_str() == Some("ok"),
            message: frame.payload["message"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        },
        EVENT_ERROR => ServerMessage::Error,
        EVENT_CLOSE => ServerMessage::Close,
        other => ServerMessage::Other(other.to_string()),
    };

    Ok((frame.topic, message))
}
