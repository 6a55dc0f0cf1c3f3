/// An owner id that does not name a [cell state](crate::CellState).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCellState(pub u8);

impl std::error::Error for InvalidCellState {}

impl std::fmt::Display for InvalidCellState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Owner id {} is not one of 0, 1 or 2", self.0)
    }
}

/// The error type for decoding a [`WireMessage`](crate::WireMessage) payload.
#[derive(Debug)]
pub enum ProtocolError {
    NotUtf8(std::str::Utf8Error),
    NotJson(serde_json::Error),
    MissingType,
    MalformedMessage {
        kind: String,
        err: serde_json::Error,
    },
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::NotUtf8(err) => Some(err),
            ProtocolError::NotJson(err) => Some(err),
            ProtocolError::MalformedMessage { err, .. } => Some(err),
            ProtocolError::MissingType => None,
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::NotUtf8(_) => write!(f, "Message payload is not valid UTF-8"),
            ProtocolError::NotJson(_) => write!(f, "Message payload is not valid JSON"),
            ProtocolError::MissingType => {
                write!(f, "Message payload has no string \"type\" field")
            }
            ProtocolError::MalformedMessage { kind, .. } => {
                write!(f, "Message of type \"{}\" has an invalid body", kind)
            }
        }
    }
}
