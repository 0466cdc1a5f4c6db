//! Route message types.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::AF_PHONET;
use crate::netlink::error::{Error, Result};

/// Destination attribute.
pub const RTA_DST: u16 = 1;
/// Output interface attribute.
pub const RTA_OIF: u16 = 4;

/// Main routing table.
pub const RT_TABLE_MAIN: u8 = 254;
/// Route installed by the administrator.
pub const RTPROT_STATIC: u8 = 4;
/// Global scope.
pub const RT_SCOPE_UNIVERSE: u8 = 0;
/// Gateway or direct route.
pub const RTN_UNICAST: u8 = 1;

/// Phonet routes always cover the six significant address bits.
pub const PHONET_DST_LEN: u8 = 6;

/// Route message (struct rtmsg).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct RtMsg {
    /// Address family.
    pub rtm_family: u8,
    /// Destination prefix length.
    pub rtm_dst_len: u8,
    /// Source prefix length.
    pub rtm_src_len: u8,
    /// TOS filter.
    pub rtm_tos: u8,
    /// Routing table ID.
    pub rtm_table: u8,
    /// Routing protocol (RTPROT_*).
    pub rtm_protocol: u8,
    /// Route scope (RT_SCOPE_*).
    pub rtm_scope: u8,
    /// Route type (RTN_*).
    pub rtm_type: u8,
    /// Route flags.
    pub rtm_flags: u32,
}

impl RtMsg {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a new route message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Body for a static Phonet unicast route in the main table.
    pub fn phonet() -> Self {
        Self::new()
            .with_family(AF_PHONET)
            .with_dst_len(PHONET_DST_LEN)
            .with_table(RT_TABLE_MAIN)
            .with_protocol(RTPROT_STATIC)
            .with_scope(RT_SCOPE_UNIVERSE)
            .with_type(RTN_UNICAST)
    }

    /// Set the address family.
    pub fn with_family(mut self, family: u8) -> Self {
        self.rtm_family = family;
        self
    }

    /// Set the destination prefix length.
    pub fn with_dst_len(mut self, len: u8) -> Self {
        self.rtm_dst_len = len;
        self
    }

    /// Set the routing table.
    pub fn with_table(mut self, table: u8) -> Self {
        self.rtm_table = table;
        self
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.rtm_protocol = protocol;
        self
    }

    /// Set the scope.
    pub fn with_scope(mut self, scope: u8) -> Self {
        self.rtm_scope = scope;
        self
    }

    /// Set the route type.
    pub fn with_type(mut self, rtype: u8) -> Self {
        self.rtm_type = rtype;
        self
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        Self::ref_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: Self::SIZE,
                actual: data.len(),
            })
    }
}
