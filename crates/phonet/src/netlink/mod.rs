//! Minimal RTNetlink client for Phonet addresses and routes.
//!
//! Every operation is one blocking transaction: build a request, send it,
//! then dispatch replies until an ACK, an error or `NLMSG_DONE` ends it.
//!
//! # Quick Start
//!
//! ```ignore
//! use phonet::netlink::Connection;
//! use phonet::util::{PhonetAddr, name_to_index};
//!
//! let ifindex = name_to_index("phonet0")?;
//! let mut conn = Connection::new()?;
//! conn.add_address(ifindex, "0x6c".parse()?)?;
//!
//! for route in conn.get_routes()? {
//!     println!("{:?} via {:?}", route.dst, route.oif);
//! }
//! ```
//!
//! Datagrams are expected to hold complete messages. A message that runs
//! past the end of a datagram is reported as [`Error::Truncated`] and is
//! never stitched together with the next read.

pub mod attr;
pub mod buffer;
pub mod builder;
pub mod connection;
pub mod dispatch;
mod error;
pub mod message;
pub mod messages;
pub mod socket;
pub mod types;

#[cfg(test)]
pub mod fixtures;

pub use attr::{AttrIter, NlAttr};
pub use buffer::MessageBuffer;
pub use builder::{Operation, Request, RequestBuilder};
pub use connection::{Connection, Outcome};
pub use dispatch::{Dispatcher, State};
pub use error::{Error, Result};
pub use message::{MessageIter, NlMsgError, NlMsgHdr, NlMsgType};
pub use messages::{FromPayload, PhonetAddress, PhonetRoute};
pub use socket::{ChannelConfig, NetlinkSocket, Transport};
