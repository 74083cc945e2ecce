//! Stream Transports
//!
//! The daemon listens on either a Unix domain socket or a TCP socket; this
//! module abstracts over the two so the rest of the server never matches on
//! the transport family. Slots own their transport handle outright; there is
//! no descriptor arithmetic anywhere.

use std::io;
use std::net::SocketAddr;
use std::task::{Context, Poll};

use tokio::net::{TcpListener, TcpSocket, TcpStream, UnixListener, UnixStream};
use tracing::debug;

use crate::config::Endpoint;

/// Listen backlog for TCP endpoints.
const TCP_BACKLOG: u32 = 128;

/// A bound, listening stream endpoint.
#[derive(Debug)]
pub enum Listener {
    Tcp(TcpListener),
    Unix(UnixListener),
}

impl Listener {
    /// Binds and listens on the configured endpoint.
    ///
    /// TCP listeners enable address reuse and bind all interfaces. For Unix
    /// endpoints, `force_unlink` removes a stale socket file before binding.
    pub fn bind(endpoint: &Endpoint, force_unlink: bool) -> io::Result<Self> {
        match endpoint {
            Endpoint::Tcp(port) => {
                let socket = TcpSocket::new_v4()?;
                socket.set_reuseaddr(true)?;
                socket.bind(SocketAddr::from(([0, 0, 0, 0], *port)))?;
                Ok(Listener::Tcp(socket.listen(TCP_BACKLOG)?))
            }
            Endpoint::Unix(path) => {
                if force_unlink {
                    match std::fs::remove_file(path) {
                        Ok(()) => {
                            debug!(path = %path.display(), "Removed stale socket file")
                        }
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(Listener::Unix(UnixListener::bind(path)?))
            }
        }
    }

    /// Accepts one connection.
    ///
    /// Accepted TCP streams get TCP_NODELAY so the daemon's one-byte replies
    /// are never coalesced behind a timer.
    pub async fn accept(&self) -> io::Result<Stream> {
        match self {
            Listener::Tcp(listener) => {
                let (stream, _) = listener.accept().await?;
                stream.set_nodelay(true)?;
                Ok(Stream::Tcp(stream))
            }
            Listener::Unix(listener) => {
                let (stream, _) = listener.accept().await?;
                Ok(Stream::Unix(stream))
            }
        }
    }
}

/// One accepted client transport, owned by its connection-table slot.
///
/// All I/O is non-blocking: the event loop polls for readiness, then the
/// protocol handler makes a single `try_read`/`try_write` attempt.
#[derive(Debug)]
pub enum Stream {
    Tcp(TcpStream),
    Unix(UnixStream),
}

impl Stream {
    /// Polls read readiness without consuming any bytes. The event loop uses
    /// this to build its readable-interest set.
    pub fn poll_read_ready(&self, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self {
            Stream::Tcp(stream) => stream.poll_read_ready(cx),
            Stream::Unix(stream) => stream.poll_read_ready(cx),
        }
    }

    /// Non-blocking read. `Err(WouldBlock)` means the readiness indication
    /// was spurious; `Ok(0)` on a non-empty buffer means the peer closed.
    pub fn try_read(&self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(stream) => stream.try_read(buf),
            Stream::Unix(stream) => stream.try_read(buf),
        }
    }

    /// Non-blocking write.
    pub fn try_write(&self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Tcp(stream) => stream.try_write(buf),
            Stream::Unix(stream) => stream.try_write(buf),
        }
    }
}
