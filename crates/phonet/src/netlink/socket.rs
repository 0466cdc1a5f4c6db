//! Blocking NETLINK_ROUTE socket for one-shot transactions.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use bytes::{Bytes, BytesMut};
use netlink_sys::{Socket, SocketAddr, protocols};

use super::error::{Error, Result};

/// Smallest socket buffer accepted by [`ChannelConfig`].
pub const MIN_BUFFER: usize = 2048;

/// Default socket buffer size.
pub const DEFAULT_BUFFER: usize = 32 * 1024;

/// Socket options for a transaction channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    /// `SO_SNDBUF` value.
    pub send_buffer: usize,
    /// `SO_RCVBUF` value, which is also the size of each receive buffer.
    pub recv_buffer: usize,
    /// Request extended ACK error reporting when the kernel supports it.
    pub ext_ack: bool,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            send_buffer: DEFAULT_BUFFER,
            recv_buffer: DEFAULT_BUFFER,
            ext_ack: true,
        }
    }
}

impl ChannelConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the send buffer size, clamped to [`MIN_BUFFER`].
    pub fn send_buffer(mut self, size: usize) -> Self {
        self.send_buffer = size.max(MIN_BUFFER);
        self
    }

    /// Set the receive buffer size, clamped to [`MIN_BUFFER`].
    pub fn recv_buffer(mut self, size: usize) -> Self {
        self.recv_buffer = size.max(MIN_BUFFER);
        self
    }

    /// Enable or disable extended ACKs.
    pub fn ext_ack(mut self, enabled: bool) -> Self {
        self.ext_ack = enabled;
        self
    }
}

/// The send/receive seam a transaction runs over.
///
/// [`NetlinkSocket`] is the real implementation; tests script one in memory.
pub trait Transport {
    /// Send one complete request.
    fn send(&mut self, request: &[u8]) -> Result<()>;

    /// Block until the next datagram arrives.
    ///
    /// Fails with [`Error::Interrupted`] on signal delivery,
    /// [`Error::PeerClosed`] on a zero-length read and
    /// [`Error::Truncated`] when the datagram did not fit.
    fn receive(&mut self) -> Result<Bytes>;

    /// Port id used as the sender of requests.
    fn pid(&self) -> u32;
}

/// Raw netlink socket bound with no multicast groups.
pub struct NetlinkSocket {
    socket: Socket,
    pid: u32,
    recv_buffer: usize,
}

impl NetlinkSocket {
    /// Open a socket with the default configuration.
    pub fn new() -> Result<Self> {
        Self::open(ChannelConfig::default())
    }

    /// Open a socket configured by `config`.
    pub fn open(config: ChannelConfig) -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;

        let send_buffer = config.send_buffer.max(MIN_BUFFER);
        let recv_buffer = config.recv_buffer.max(MIN_BUFFER);
        set_buffer(socket.as_raw_fd(), libc::SO_SNDBUF, send_buffer)?;
        set_buffer(socket.as_raw_fd(), libc::SO_RCVBUF, recv_buffer)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        if config.ext_ack {
            socket.set_ext_ack(true).ok(); // Ignore if not supported
        }

        tracing::debug!(pid, send_buffer, recv_buffer, "netlink socket open");

        Ok(Self {
            socket,
            pid,
            recv_buffer,
        })
    }
}

impl Transport for NetlinkSocket {
    fn send(&mut self, request: &[u8]) -> Result<()> {
        let sent = self.socket.send(request, 0).map_err(Error::Send)?;
        if sent != request.len() {
            return Err(Error::ShortSend {
                sent,
                expected: request.len(),
            });
        }
        tracing::debug!(bytes = sent, "sent request");
        Ok(())
    }

    fn receive(&mut self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.recv_buffer);

        // MSG_TRUNC makes recv report the full datagram length even when
        // only part of it was copied.
        let received = self.socket.recv(&mut buf, libc::MSG_TRUNC);
        let n = check_received(received, buf.len())?;

        tracing::debug!(bytes = n, "received datagram");
        Ok(buf.freeze())
    }

    fn pid(&self) -> u32 {
        self.pid
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

/// Classify a `MSG_TRUNC` receive that reported `received` bytes and copied
/// `copied` of them.
fn check_received(received: io::Result<usize>, copied: usize) -> Result<usize> {
    let n = match received {
        Ok(n) => n,
        Err(e) if e.kind() == io::ErrorKind::Interrupted => return Err(Error::Interrupted),
        Err(e) => return Err(Error::Io(e)),
    };

    if n == 0 {
        return Err(Error::PeerClosed);
    }
    if n > copied {
        return Err(Error::Truncated {
            expected: n,
            actual: copied,
        });
    }
    Ok(n)
}

fn set_buffer(fd: RawFd, option: libc::c_int, size: usize) -> Result<()> {
    let value = libc::c_int::try_from(size).unwrap_or(libc::c_int::MAX);

    // SAFETY: fd is an open socket owned by the caller, and value outlives
    // the call; the length passed matches the pointed-to c_int.
    let ret = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            option,
            &value as *const libc::c_int as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if ret < 0 {
        return Err(Error::Io(io::Error::last_os_error()));
    }
    Ok(())
}
