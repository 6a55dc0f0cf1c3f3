//! Length-prefixed framing: every message is a 4-byte big-endian payload
//! length followed by that many bytes of UTF-8 JSON.

use std::io::{ErrorKind, Read, Write};

use cellwars::WireMessage;

use crate::FrameError;

/// Frames announcing a longer payload are rejected before anything is allocated.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const HEADER_LEN: usize = 4;

/// Serializes `message` into a complete frame, header included.
pub fn encode_frame(message: &WireMessage) -> Result<Vec<u8>, FrameError> {
    let payload = message.encode().map_err(FrameError::Encode)?;
    let len = u32::try_from(payload.len())
        .ok()
        .filter(|&len| len as usize <= MAX_FRAME_LEN)
        .ok_or(FrameError::TooLarge { len: payload.len() })?;
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Writes one frame with a single `write_all`, so that the header and
/// payload are never interleaved with another writer's output.
pub fn write_frame<W: Write>(writer: &mut W, message: &WireMessage) -> Result<(), FrameError> {
    let frame = encode_frame(message)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Reads the payload of the next frame.
///
/// Returns `Ok(None)` if the stream ends cleanly before the first byte of a
/// frame. Ending anywhere else is an error.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError> {
    let mut header = [0u8; HEADER_LEN];
    let received = read_until_full(reader, &mut header)?;
    if received == 0 {
        return Ok(None);
    }
    if received < HEADER_LEN {
        return Err(FrameError::Truncated {
            expected: HEADER_LEN,
            received,
        });
    }

    let len = u32::from_be_bytes(header) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge { len });
    }
    let mut payload = vec![0u8; len];
    let received = read_until_full(reader, &mut payload)?;
    if received < len {
        return Err(FrameError::Truncated {
            expected: len,
            received,
        });
    }
    Ok(Some(payload))
}

/// Like `read_exact`, but reports how much was read when the stream ends early.
fn read_until_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use cellwars::{ActionResult, CellState, ChangeRecord};

    use super::*;

    fn message(x: i32) -> WireMessage {
        WireMessage::ActionResult(ActionResult {
            action_name: String::from("Diamond Bomb"),
            grid_x: x,
            grid_y: 0,
            changes: vec![ChangeRecord::new(x, 0, CellState::Player1)],
        })
    }

    #[test]
    fn header_is_big_endian_length() {
        let frame = encode_frame(&message(1)).unwrap();
        let payload = message(1).encode().unwrap();
        assert_eq!(&frame[..4], &(payload.len() as u32).to_be_bytes());
        assert_eq!(&frame[4..], &payload[..]);
    }

    #[test]
    fn consecutive_frames() {
        let mut buf = Vec::new();
        write_frame(&mut buf, &message(1)).unwrap();
        write_frame(&mut buf, &message(2)).unwrap();

        let mut reader = Cursor::new(buf);
        for x in [1, 2] {
            let payload = read_frame(&mut reader).unwrap().unwrap();
            assert_eq!(WireMessage::decode(&payload).unwrap(), Some(message(x)));
        }
        assert!(read_frame(&mut reader).unwrap().is_none());
    }

    #[test]
    fn truncated_frames() {
        let frame = encode_frame(&message(1)).unwrap();

        let mut reader = Cursor::new(frame[..2].to_vec());
        assert!(matches!(
            read_frame(&mut reader),
            Err(FrameError::Truncated {
                expected: 4,
                received: 2
            })
        ));

        let mut reader = Cursor::new(frame[..frame.len() - 1].to_vec());
        assert!(matches!(
            read_frame(&mut reader),
            Err(FrameError::Truncated { .. })
        ));
    }

    #[test]
    fn oversized_length_is_rejected() {
        let mut buf = ((MAX_FRAME_LEN + 1) as u32).to_be_bytes().to_vec();
        buf.extend_from_slice(b"{}");
        assert!(matches!(
            read_frame(&mut Cursor::new(buf)),
            Err(FrameError::TooLarge { .. })
        ));
    }
}
