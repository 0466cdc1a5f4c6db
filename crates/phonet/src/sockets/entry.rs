//! Records of `/proc/net/phonet`.

use std::path::Path;

use winnow::ascii::{dec_uint, hex_uint, space0, space1};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::literal;

use crate::netlink::{Error, Result};

/// Result type for winnow parsers.
type PResult<T> = core::result::Result<T, winnow::error::ErrMode<ContextError>>;

/// One Phonet socket.
///
/// Records look like `pt loc:rem:res st tx:rx uid inode ref pointer drops`
/// with addresses, queues and state in hexadecimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketEntry {
    /// Protocol (1 = datagram, 2 = pipe).
    pub protocol: u8,
    /// Local device and object.
    pub local: u16,
    /// Remote device and object.
    pub remote: u16,
    /// Bound resource, 0 for none.
    pub resource: u8,
    /// Socket state.
    pub state: u8,
    /// Send queue bytes.
    pub tx_queue: u32,
    /// Receive queue bytes.
    pub rx_queue: u32,
    /// Owner uid.
    pub uid: u32,
    /// Socket inode.
    pub inode: u64,
}

impl SocketEntry {
    /// Parse one record. Fields after the inode are ignored.
    pub fn parse(line: &str) -> Result<Self> {
        record
            .parse_next(&mut &*line)
            .map_err(|_| Error::Parse(format!("cannot parse socket record: {}", line.trim_end())))
    }

    /// Short protocol name.
    pub fn protocol_name(&self) -> &'static str {
        super::protocol_name(self.protocol)
    }

    /// Socket state name.
    pub fn state_name(&self) -> &'static str {
        super::state_name(self.state)
    }

    /// Check if the socket is bound to a resource.
    pub fn has_resource(&self) -> bool {
        self.resource != 0
    }
}

fn record(input: &mut &str) -> PResult<SocketEntry> {
    space0.parse_next(input)?;
    let protocol = dec_uint.parse_next(input)?;
    space1.parse_next(input)?;

    let local = hex_uint.parse_next(input)?;
    literal(":").parse_next(input)?;
    let remote = hex_uint.parse_next(input)?;
    literal(":").parse_next(input)?;
    let resource = hex_uint.parse_next(input)?;
    space1.parse_next(input)?;

    let state = hex_uint.parse_next(input)?;
    space1.parse_next(input)?;

    let tx_queue = hex_uint.parse_next(input)?;
    literal(":").parse_next(input)?;
    let rx_queue = hex_uint.parse_next(input)?;
    space1.parse_next(input)?;

    let uid = dec_uint.parse_next(input)?;
    space1.parse_next(input)?;
    let inode = dec_uint.parse_next(input)?;

    Ok(SocketEntry {
        protocol,
        local,
        remote,
        resource,
        state,
        tx_queue,
        rx_queue,
        uid,
        inode,
    })
}

/// Parse the contents of `/proc/net/phonet`.
///
/// The first line is the column header. Records that fail to parse are
/// logged and skipped.
pub fn parse_sockets(text: &str) -> Vec<SocketEntry> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match SocketEntry::parse(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        })
        .collect()
}

/// Read and parse a socket table file.
pub fn read_sockets(path: impl AsRef<Path>) -> Result<Vec<SocketEntry>> {
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(parse_sockets(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
pt  loc  rem rs st tx_queue rx_queue  uid inode ref pointer drops
 2 0044:0000:00 0A 00000000:00000000     0 17752 2 0000000000000000 0
 1 0060:0034:E0 01 00000010:00000c80  1000 21036 2 0000000000000000 0
";

    #[test]
    fn parse_listening_pipe() {
        let entry = SocketEntry::parse(TABLE.lines().nth(1).unwrap()).unwrap();
        assert_eq!(entry.protocol, 2);
        assert_eq!(entry.protocol_name(), "PEP");
        assert_eq!(entry.local, 0x44);
        assert_eq!(entry.remote, 0);
        assert!(!entry.has_resource());
        assert_eq!(entry.state_name(), "LISTEN");
        assert_eq!(entry.inode, 17752);
    }

    #[test]
    fn parse_bound_datagram_socket() {
        let entry = SocketEntry::parse(TABLE.lines().nth(2).unwrap()).unwrap();
        assert_eq!(entry.protocol_name(), "PN");
        assert_eq!(entry.local, 0x60);
        assert_eq!(entry.remote, 0x34);
        assert_eq!(entry.resource, 0xe0);
        assert_eq!(entry.state_name(), "ESTABLISHED");
        assert_eq!(entry.tx_queue, 0x10);
        assert_eq!(entry.rx_queue, 0xc80);
        assert_eq!(entry.uid, 1000);
        assert_eq!(entry.inode, 21036);
    }

    #[test]
    fn fixed_width_padding_is_accepted() {
        let line = format!("{:<127}", TABLE.lines().nth(1).unwrap());
        assert_eq!(SocketEntry::parse(&line).unwrap().inode, 17752);
    }

    #[test]
    fn table_skips_header_and_bad_lines() {
        let text = format!("{TABLE}garbage line\n\n");
        let entries = parse_sockets(&text);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].inode, 17752);
        assert_eq!(entries[1].inode, 21036);
    }

    #[test]
    fn malformed_record() {
        let err = SocketEntry::parse(" 1 0060-0034 01").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }
}
