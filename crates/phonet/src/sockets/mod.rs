//! Phonet socket table from `/proc`.
//!
//! The kernel lists every Phonet socket in `/proc/net/phonet`. Owning
//! processes are found by matching socket inodes against the links under
//! `/proc/<pid>/fd`.

mod entry;
mod process;

pub use entry::{SocketEntry, parse_sockets, read_sockets};
pub use process::{Owner, ProcessTable, SocketInfo};

/// Default location of the Phonet socket table.
pub const PROC_NET_PHONET: &str = "/proc/net/phonet";

/// Default procfs mount point.
pub const PROC_ROOT: &str = "/proc";

/// Datagram socket protocol.
pub const PN_PROTO_PHONET: u8 = 1;
/// Pipe end point protocol.
pub const PN_PROTO_PIPE: u8 = 2;

/// Short protocol name as printed by `pnstat`.
pub fn protocol_name(protocol: u8) -> &'static str {
    match protocol {
        PN_PROTO_PHONET => "PN",
        PN_PROTO_PIPE => "PEP",
        _ => "?",
    }
}

/// Socket state name. Phonet reuses the TCP state numbering.
pub fn state_name(state: u8) -> &'static str {
    match state {
        1 => "ESTABLISHED",
        2 => "SYN_SENT",
        3 => "SYN_RECV",
        4 => "FIN_WAIT1",
        5 => "FIN_WAIT2",
        6 => "TIME_WAIT",
        7 => "CLOSE",
        8 => "CLOSE_WAIT",
        9 => "LAST_ACK",
        10 => "LISTEN",
        11 => "CLOSING",
        _ => "?",
    }
}
