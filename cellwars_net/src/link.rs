use std::net::{SocketAddr, TcpListener, TcpStream};

use anyhow::Context;
use cellwars::{Player, Transport, WireMessage};
use tracing::info;

use crate::MessageChannel;

pub const DEFAULT_PORT: u16 = 5555;

/// Which end of the connection this peer is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    /// Listens for the other peer and plays first.
    Host,
    Client,
}

impl Role {
    pub fn local_player(self) -> Player {
        match self {
            Role::Host => Player::One,
            Role::Client => Player::Two,
        }
    }
}

/// A listening socket waiting for exactly one peer.
pub struct HostListener {
    listener: TcpListener,
}

impl HostListener {
    /// Binds on all interfaces. Port 0 picks a free port.
    pub fn bind(port: u16) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .with_context(|| format!("Could not listen on port {}", port))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Blocks until a peer connects. The listener is closed afterwards.
    pub fn accept(self) -> anyhow::Result<PeerLink> {
        let (stream, addr) = self.listener.accept()?;
        info!(%addr, "Peer joined");
        PeerLink::from_stream(Role::Host, stream)
    }
}

/// The connection to the other peer of a networked game.
pub struct PeerLink {
    role: Role,
    peer_addr: SocketAddr,
    channel: MessageChannel,
}

impl PeerLink {
    /// Listens on `port` and waits for the other peer.
    pub fn host(port: u16) -> anyhow::Result<Self> {
        let listener = HostListener::bind(port)?;
        info!(port, "Waiting for a peer to join");
        listener.accept()
    }

    /// Connects to a peer hosting on `address:port`.
    pub fn join(address: &str, port: u16) -> anyhow::Result<Self> {
        let stream = TcpStream::connect((address, port))
            .with_context(|| format!("Could not connect to {}:{}", address, port))?;
        info!(address, port, "Joined game");
        Self::from_stream(Role::Client, stream)
    }

    /// Wraps an already connected stream.
    pub fn from_stream(role: Role, stream: TcpStream) -> anyhow::Result<Self> {
        stream.set_nodelay(true)?;
        let peer_addr = stream.peer_addr()?;
        let channel = MessageChannel::new(stream)?;
        Ok(Self {
            role,
            peer_addr,
            channel,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn send(&mut self, message: &WireMessage) -> bool {
        self.channel.send(message)
    }

    pub fn poll_next_message(&mut self) -> Option<WireMessage> {
        self.channel.poll_next_message()
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    pub fn disconnect(&mut self) {
        self.channel.disconnect();
    }
}

impl Transport for PeerLink {
    fn send(&mut self, message: &WireMessage) -> bool {
        PeerLink::send(self, message)
    }

    fn poll_next_message(&mut self) -> Option<WireMessage> {
        PeerLink::poll_next_message(self)
    }

    fn is_connected(&self) -> bool {
        PeerLink::is_connected(self)
    }

    fn disconnect(&mut self) {
        PeerLink::disconnect(self)
    }
}
