//! Socket.IO v4 text frames over Engine.IO
//!
//! | Frame | Meaning |
//! |-------|---------|
//! | `0{..}` | Engine.IO open, JSON handshake |
//! | `1` | Engine.IO close |
//! | `2` / `3` | ping / pong |
//! | `40{..}` | Socket.IO connect (client sends auth, server sends sid) |
//! | `41` | Socket.IO disconnect |
//! | `42[..]` | Socket.IO event `["name", payload]` |
//! | `44{..}` | Socket.IO connect error |
//!
//! Namespaced (`42/admin,[..]`) and acknowledged (`4217[..]`) events are
//! accepted; the namespace and ack id are ignored.

use serde::Deserialize;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Engine.IO open handshake
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Handshake {
    pub sid: String,
    pub ping_interval: u64,
    pub ping_timeout: u64,
}

/// Decoded text frame
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Connect,
    Disconnect,
    Event { name: String, payload: Value },
    ConnectError(String),
    /// Anything the console does not act on (upgrade, noop, acks, binary)
    Ignored,
}

/// Decode one text frame
pub fn decode(text: &str) -> ClientResult<Frame> {
    let mut chars = text.chars();
    let frame = match chars.next() {
        Some('0') => Frame::Open(parse_json(chars.as_str(), "handshake")?),
        Some('1') => Frame::Close,
        Some('2') => Frame::Ping,
        Some('3') => Frame::Pong,
        Some('4') => decode_packet(chars.as_str())?,
        Some(_) => Frame::Ignored,
        None => return Err(ClientError::Push("empty frame".into())),
    };
    Ok(frame)
}

fn decode_packet(packet: &str) -> ClientResult<Frame> {
    let mut chars = packet.chars();
    let kind = chars.next();
    let body = strip_ack_id(strip_namespace(chars.as_str()));

    let frame = match kind {
        Some('0') => Frame::Connect,
        Some('1') => Frame::Disconnect,
        Some('2') => decode_event(body)?,
        Some('4') => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| "connection refused".to_string());
            Frame::ConnectError(message)
        }
        _ => Frame::Ignored,
    };
    Ok(frame)
}

fn decode_event(body: &str) -> ClientResult<Frame> {
    let Value::Array(mut items) = parse_json::<Value>(body, "event")? else {
        return Err(ClientError::Push("event body is not an array".into()));
    };
    if items.is_empty() {
        return Err(ClientError::Push("event without name".into()));
    }
    let Value::String(name) = items.remove(0) else {
        return Err(ClientError::Push("event name is not a string".into()));
    };
    let payload = if items.is_empty() {
        Value::Null
    } else {
        items.remove(0)
    };
    Ok(Frame::Event { name, payload })
}

/// `/admin,rest` -> `rest`
fn strip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        return body.split_once(',').map(|(_, rest)| rest).unwrap_or("");
    }
    body
}

/// `17[...]` -> `[...]`
fn strip_ack_id(body: &str) -> &str {
    body.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn parse_json<T: serde::de::DeserializeOwned>(body: &str, what: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|e| ClientError::Push(format!("bad {what} frame: {e}")))
}

/// `40{"token":..}`: join the default namespace with the session token
pub fn encode_connect(token: &str) -> String {
    format!("40{}", serde_json::json!({ "token": token }))
}

pub const PONG: &str = "3";
pub const DISCONNECT: &str = "41";
