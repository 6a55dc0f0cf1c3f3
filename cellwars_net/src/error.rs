use cellwars::ProtocolError;

#[derive(Debug)]
/// Error type for reading or writing one length-prefixed frame.
pub enum FrameError {
    Io(std::io::Error),
    /// The stream ended in the middle of a frame.
    Truncated {
        expected: usize,
        received: usize,
    },
    TooLarge {
        len: usize,
    },
    Encode(serde_json::Error),
    Protocol(ProtocolError),
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(err) => Some(err),
            FrameError::Encode(err) => Some(err),
            FrameError::Protocol(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Io(_) => write!(f, "I/O error on the peer connection"),
            FrameError::Truncated { expected, received } => write!(
                f,
                "Connection closed after {} of {} bytes of a frame",
                received, expected
            ),
            FrameError::TooLarge { len } => {
                write!(f, "Frame of {} bytes exceeds the size limit", len)
            }
            FrameError::Encode(_) => write!(f, "Could not serialize message"),
            FrameError::Protocol(_) => write!(f, "Received an invalid message"),
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        FrameError::Io(err)
    }
}

impl From<ProtocolError> for FrameError {
    fn from(err: ProtocolError) -> Self {
        FrameError::Protocol(err)
    }
}
