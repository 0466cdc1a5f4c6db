//! Strongly-typed Phonet route message.

use super::FromPayload;
use crate::netlink::attr::{AttrIter, get};
use crate::netlink::error::Result;
use crate::netlink::types::AF_PHONET;
use crate::netlink::types::route::{RTA_DST, RTA_OIF, RtMsg};
use crate::util::PhonetAddr;

/// One route entry from a route dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonetRoute {
    /// Address family of the entry.
    pub family: u8,
    /// Destination (RTA_DST).
    pub dst: Option<PhonetAddr>,
    /// Output interface index (RTA_OIF).
    pub oif: Option<u32>,
    /// Routing table.
    pub table: u8,
    /// Routing protocol (RTPROT_*).
    pub protocol: u8,
    /// Route type (RTN_*).
    pub kind: u8,
}

impl PhonetRoute {
    /// Check if this entry belongs to the Phonet family.
    pub fn is_phonet(&self) -> bool {
        self.family == AF_PHONET
    }
}

impl FromPayload for PhonetRoute {
    fn from_payload(payload: &[u8]) -> Result<Self> {
        let header = RtMsg::from_bytes(payload)?;
        let mut route = Self {
            family: header.rtm_family,
            dst: None,
            oif: None,
            table: header.rtm_table,
            protocol: header.rtm_protocol,
            kind: header.rtm_type,
        };

        if !route.is_phonet() {
            // foreign attributes have foreign layouts
            return Ok(route);
        }

        for attr in AttrIter::new(&payload[RtMsg::SIZE..]) {
            match attr? {
                (RTA_DST, value) => route.dst = Some(PhonetAddr::from_kernel(get::u8(value)?)),
                (RTA_OIF, value) => route.oif = Some(get::u32_ne(value)?),
                _ => {}
            }
        }

        Ok(route)
    }
}
