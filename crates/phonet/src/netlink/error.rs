//! Error types for Phonet netlink operations.

use std::io;

/// Result type for Phonet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or inspecting Phonet state.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket setup or `/proc` access.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Sending the request failed at the socket level.
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    /// The socket accepted fewer bytes than the request holds.
    #[error("short send: sent {sent} of {expected} bytes")]
    ShortSend {
        /// Bytes accepted by the socket.
        sent: usize,
        /// Length of the request.
        expected: usize,
    },

    /// A blocking receive was interrupted by a signal.
    #[error("receive interrupted")]
    Interrupted,

    /// The peer closed the socket (zero-length read).
    #[error("netlink peer closed the socket")]
    PeerClosed,

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Kernel error with operation context.
    #[error("{operation}: {message} (errno {errno})")]
    KernelWithContext {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Message was truncated.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// Not enough room left in a request buffer.
    #[error("buffer overflow: need {needed} bytes, {available} available")]
    BufferOverflow {
        /// Bytes the write needed.
        needed: usize,
        /// Bytes left before the buffer limit.
        available: usize,
    },

    /// A request was finalized before an operation was selected.
    #[error("request operation not set")]
    OperationUnset,

    /// Invalid message format.
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// Invalid attribute format.
    #[error("invalid attribute: {0}")]
    InvalidAttribute(String),

    /// Malformed Phonet address on the command line.
    #[error("invalid address `{input}': {reason}")]
    InvalidAddress {
        /// The text that was rejected.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Interface not found.
    #[error("interface not found: {name}")]
    InterfaceNotFound {
        /// The interface name that was not found.
        name: String,
    },

    /// Interface name that cannot name any device.
    #[error("invalid interface name: {0}")]
    InvalidInterfaceName(String),

    /// Parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a kernel error from a netlink status code (negated errno).
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Create a kernel error with operation context.
    pub fn from_errno_with_context(errno: i32, operation: impl Into<String>) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::KernelWithContext {
            operation: operation.into(),
            errno: -errno,
            message,
        }
    }

    /// Add context to this error.
    ///
    /// Wraps kernel errors with operation context. Other errors are returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            _ => None,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV, etc.).
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::ENOENT | libc::ENODEV | libc::EADDRNOTAVAIL)
            }
            Self::InterfaceNotFound { .. } => true,
            _ => false,
        }
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => {
                matches!(*errno, libc::EPERM | libc::EACCES)
            }
            Self::Io(e) => e.kind() == io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }

    /// Check if this is a "already exists" error (EEXIST).
    pub fn is_already_exists(&self) -> bool {
        self.errno() == Some(libc::EEXIST)
    }

    /// Check if this error comes from bad user input rather than the system.
    ///
    /// Usage errors are detected before any socket is opened.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress { .. }
                | Self::InterfaceNotFound { .. }
                | Self::InvalidInterfaceName(_)
        )
    }

    /// Process exit code for this error: 2 for usage errors, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() { 2 } else { 1 }
    }
}
