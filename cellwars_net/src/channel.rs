use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use cellwars::WireMessage;
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, trace, warn};

use crate::{read_frame, write_frame, FrameError};

/// A framed message stream over one TCP connection.
///
/// A background thread reads frames and queues decoded messages, so that
/// [`Self::poll_next_message()`] never blocks. Sends happen on the caller's
/// thread.
pub struct MessageChannel {
    // Write half. The receive thread owns a clone of the same socket.
    stream: TcpStream,
    inbound: Receiver<WireMessage>,
    connected: Arc<AtomicBool>,
    receive_thread: Option<JoinHandle<()>>,
}

enum Received {
    Message(WireMessage),
    Skipped,
    Closed,
}

impl MessageChannel {
    pub fn new(stream: TcpStream) -> std::io::Result<Self> {
        let reader = stream.try_clone()?;
        let (sender, inbound) = unbounded();
        let connected = Arc::new(AtomicBool::new(true));
        let thread_connected = Arc::clone(&connected);
        let receive_thread = thread::Builder::new()
            .name(String::from("cellwars-receive"))
            .spawn(move || receive_loop(reader, sender, thread_connected))?;
        Ok(Self {
            stream,
            inbound,
            connected,
            receive_thread: Some(receive_thread),
        })
    }

    /// Returns false if the channel is closed or the write failed. A failed
    /// write closes the channel.
    pub fn send(&mut self, message: &WireMessage) -> bool {
        if !self.is_connected() {
            debug!("Not sending, channel is closed");
            return false;
        }
        match write_frame(&mut self.stream, message) {
            Ok(()) => {
                trace!(?message, "Sent message");
                true
            }
            Err(err) => {
                warn!(%err, "Sending to peer failed");
                self.disconnect();
                false
            }
        }
    }

    /// Messages that arrived before the channel closed can still be taken.
    pub fn poll_next_message(&mut self) -> Option<WireMessage> {
        self.inbound.try_recv().ok()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn disconnect(&mut self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            info!("Closing connection to peer");
        }
        // Fails if the socket is already shut down, which is fine.
        let _ = self.stream.shutdown(Shutdown::Both);
        if let Some(handle) = self.receive_thread.take() {
            if handle.join().is_err() {
                warn!("Receive thread panicked");
            }
        }
    }
}

impl Drop for MessageChannel {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn receive_next(reader: &mut TcpStream) -> Result<Received, FrameError> {
    let Some(payload) = read_frame(reader)? else {
        return Ok(Received::Closed);
    };
    Ok(match WireMessage::decode(&payload)? {
        Some(message) => Received::Message(message),
        None => Received::Skipped,
    })
}

fn receive_loop(mut reader: TcpStream, sender: Sender<WireMessage>, connected: Arc<AtomicBool>) {
    loop {
        match receive_next(&mut reader) {
            Ok(Received::Message(message)) => {
                trace!(?message, "Received message");
                if sender.send(message).is_err() {
                    break;
                }
            }
            Ok(Received::Skipped) => {}
            Ok(Received::Closed) => {
                if connected.load(Ordering::SeqCst) {
                    info!("Peer closed the connection");
                }
                break;
            }
            Err(err) => {
                if connected.load(Ordering::SeqCst) {
                    let mut err_dyn = &err as &dyn std::error::Error;
                    while let Some(src_err) = err_dyn.source() {
                        warn!("{}", err_dyn);
                        err_dyn = src_err;
                    }
                    warn!("{}", err_dyn);
                }
                break;
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
    let _ = reader.shutdown(Shutdown::Both);
}
