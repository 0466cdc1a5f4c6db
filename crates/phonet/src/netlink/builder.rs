//! Request builder for Phonet address and route messages.

use zerocopy::{Immutable, IntoBytes};

use super::attr;
use super::buffer::MessageBuffer;
use super::error::{Error, Result};
use super::message::{
    NLM_F_ACK, NLM_F_DUMP, NLM_F_REQUEST, NLM_F_ROOT, NLMSG_HDRLEN, NlMsgHdr, NlMsgType,
    nlmsg_align,
};

// Byte offsets of the header fields patched after construction.
const LEN_OFFSET: usize = 0;
const TYPE_OFFSET: usize = 4;
const FLAGS_OFFSET: usize = 6;
const SEQ_OFFSET: usize = 8;
const PID_OFFSET: usize = 12;

/// The request kinds these tools send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Assign an address to a device.
    NewAddr,
    /// Remove an address from a device.
    DelAddr,
    /// Dump all addresses.
    GetAddr,
    /// Install a route.
    NewRoute,
    /// Remove a route.
    DelRoute,
    /// Dump all routes.
    GetRoute,
}

impl Operation {
    /// Netlink message type for this operation.
    pub fn msg_type(self) -> u16 {
        match self {
            Self::NewAddr => NlMsgType::RTM_NEWADDR,
            Self::DelAddr => NlMsgType::RTM_DELADDR,
            Self::GetAddr => NlMsgType::RTM_GETADDR,
            Self::NewRoute => NlMsgType::RTM_NEWROUTE,
            Self::DelRoute => NlMsgType::RTM_DELROUTE,
            Self::GetRoute => NlMsgType::RTM_GETROUTE,
        }
    }

    /// Header flags for this operation.
    ///
    /// Mutations ask for an ACK; listings ask for a dump instead. The route
    /// listing only sets `NLM_F_ROOT`, which is what `pnroute` has always sent.
    pub fn flags(self) -> u16 {
        NLM_F_REQUEST
            | match self {
                Self::NewAddr | Self::DelAddr | Self::NewRoute | Self::DelRoute => NLM_F_ACK,
                Self::GetAddr => NLM_F_DUMP,
                Self::GetRoute => NLM_F_ROOT,
            }
    }

    /// Message type carried by data replies, if the operation produces any.
    pub fn reply_type(self) -> Option<u16> {
        match self {
            Self::GetAddr => Some(NlMsgType::RTM_NEWADDR),
            Self::GetRoute => Some(NlMsgType::RTM_NEWROUTE),
            _ => None,
        }
    }
}

/// A finalized request ready for transmission.
#[derive(Debug, Clone)]
pub struct Request {
    bytes: Vec<u8>,
    operation: Operation,
    seq: u32,
}

impl Request {
    /// The exact bytes to send.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Total length on the wire.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A request always holds at least a header.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The operation this request performs.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Sequence number stamped into the header.
    pub fn seq(&self) -> u32 {
        self.seq
    }
}

/// Builder for one netlink request: header, fixed family body, attributes.
///
/// The header's length field is kept current as attributes are appended,
/// counting each attribute at its aligned on-wire size.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    buf: MessageBuffer,
    operation: Option<Operation>,
}

impl RequestBuilder {
    /// Start a request whose payload begins with `body`.
    pub fn new<B: IntoBytes + Immutable>(body: &B) -> Result<Self> {
        Self::with_buffer(MessageBuffer::new(), body)
    }

    /// Start a request in a caller-supplied buffer.
    pub fn with_buffer<B: IntoBytes + Immutable>(mut buf: MessageBuffer, body: &B) -> Result<Self> {
        let body = body.as_bytes();
        let mut header = NlMsgHdr::new(NlMsgType::UNSET, NLM_F_REQUEST);
        header.nlmsg_len = (NLMSG_HDRLEN + body.len()) as u32;

        buf.ensure(NLMSG_HDRLEN + nlmsg_align(body.len()))?;
        buf.put_slice(header.as_bytes())?;
        buf.put_slice(body)?;
        buf.put_zeroes(nlmsg_align(body.len()) - body.len())?;

        Ok(Self {
            buf,
            operation: None,
        })
    }

    /// Choose the operation, setting the message type and flags.
    pub fn select(&mut self, operation: Operation) -> &mut Self {
        self.buf.set_u16(TYPE_OFFSET, operation.msg_type());
        self.buf.set_u16(FLAGS_OFFSET, operation.flags());
        self.operation = Some(operation);
        self
    }

    /// Append one attribute, growing the logical length by its aligned size.
    ///
    /// The attribute starts at the aligned end of the message, so an
    /// unaligned body length is rounded up first.
    pub fn add_attribute(&mut self, attr_type: u16, value: &[u8]) -> Result<&mut Self> {
        let written = attr::encode(&mut self.buf, attr_type, value)?;
        let len = nlmsg_align(self.len()) + written;
        self.buf.set_u32(LEN_OFFSET, len as u32);
        Ok(self)
    }

    /// Current logical length recorded in the header.
    pub fn len(&self) -> usize {
        let bytes = self.buf.as_bytes();
        u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize
    }

    /// A builder always holds at least a header.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Stamp sequence number and sender id and hand out the request bytes.
    pub fn finalize(mut self, seq: u32, pid: u32) -> Result<Request> {
        let operation = self.operation.ok_or(Error::OperationUnset)?;
        self.buf.set_u32(SEQ_OFFSET, seq);
        self.buf.set_u32(PID_OFFSET, pid);

        let len = self.len();
        let mut bytes = self.buf.into_vec();
        bytes.truncate(len);

        Ok(Request {
            bytes,
            operation,
            seq,
        })
    }
}
