//! Strongly-typed Phonet address message.

use super::FromPayload;
use crate::netlink::attr::{AttrIter, get};
use crate::netlink::error::{Error, Result};
use crate::netlink::types::AF_PHONET;
use crate::netlink::types::addr::{IFA_LOCAL, IfAddrMsg};
use crate::util::PhonetAddr;

/// A Phonet address assigned to a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonetAddress {
    /// Interface index.
    pub ifindex: u32,
    /// Address (IFA_LOCAL).
    pub addr: PhonetAddr,
    /// Address flags (IFA_F_*).
    pub flags: u8,
    /// Address scope.
    pub scope: u8,
}

impl PhonetAddress {
    /// Decode an `RTM_NEWADDR` payload.
    ///
    /// Returns `Ok(None)` for other families and for entries without a
    /// local address.
    pub fn parse(payload: &[u8]) -> Result<Option<Self>> {
        let header = IfAddrMsg::from_bytes(payload)?;
        if header.ifa_family != AF_PHONET {
            return Ok(None);
        }

        let mut addr = None;
        for attr in AttrIter::new(&payload[IfAddrMsg::SIZE..]) {
            let (kind, value) = attr?;
            if kind == IFA_LOCAL {
                addr = Some(PhonetAddr::from_kernel(get::u8(value)?));
            }
        }

        Ok(addr.map(|addr| Self {
            ifindex: header.ifa_index,
            addr,
            flags: header.ifa_flags,
            scope: header.ifa_scope,
        }))
    }
}

impl FromPayload for PhonetAddress {
    fn from_payload(payload: &[u8]) -> Result<Self> {
        Self::parse(payload)?
            .ok_or_else(|| Error::InvalidMessage("address without IFA_LOCAL".into()))
    }
}
