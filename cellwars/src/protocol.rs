use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::{ChangeRecord, ProtocolError};

/// The outcome of one player's action, as replayed by both peers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Name of the [action](crate::PlayerAction) that was played. Informational only.
    pub action_name: String,
    /// The cell the action was started on.
    pub grid_x: i32,
    pub grid_y: i32,
    /// Every change in replay order, starting with the picked cell itself.
    pub changes: Vec<ChangeRecord>,
}

/// A message exchanged between two peers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    ActionResult(ActionResult),
}

impl WireMessage {
    /// The values of the `"type"` field that this version understands.
    pub const KNOWN_TYPES: &'static [&'static str] = &["action_result"];

    /// Serializes the message as UTF-8 JSON.
    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Parses a payload.
    ///
    /// A well-formed message of an unknown type is logged and yields
    /// `Ok(None)`, so that a newer peer cannot break an older one.
    pub fn decode(payload: &[u8]) -> Result<Option<WireMessage>, ProtocolError> {
        let text = std::str::from_utf8(payload).map_err(ProtocolError::NotUtf8)?;
        let value: Value = serde_json::from_str(text).map_err(ProtocolError::NotJson)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_owned();
        if !Self::KNOWN_TYPES.contains(&kind.as_str()) {
            warn!(%kind, "Discarding message of unknown type");
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|err| ProtocolError::MalformedMessage { kind, err })
    }
}

/// A connection to the other peer, as seen by the
/// [coordinator](crate::TurnCoordinator).
///
/// None of these methods block.
pub trait Transport {
    /// Returns false if the message could not be sent, in which case the
    /// link is considered disconnected.
    fn send(&mut self, message: &WireMessage) -> bool;
    /// Takes the oldest received message, if any.
    fn poll_next_message(&mut self) -> Option<WireMessage>;
    fn is_connected(&self) -> bool;
    /// Closes the link. Calling this more than once has no further effect.
    fn disconnect(&mut self);
}
