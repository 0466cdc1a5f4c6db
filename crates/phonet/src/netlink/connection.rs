//! One-shot netlink transactions and the Phonet operations built on them.

use std::time::{SystemTime, UNIX_EPOCH};

use super::builder::{Operation, Request, RequestBuilder};
use super::dispatch::{Dispatcher, State};
use super::error::{Error, Result};
use super::message::NlMsgHdr;
use super::messages::{FromPayload, PhonetAddress, PhonetRoute};
use super::socket::{ChannelConfig, NetlinkSocket, Transport};
use super::types::addr::{IFA_LOCAL, IfAddrMsg};
use super::types::route::{RTA_DST, RTA_OIF, RtMsg};
use crate::util::PhonetAddr;

/// How a transaction ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The kernel sent an ACK or `NLMSG_DONE`.
    Done,
    /// The socket was closed before a terminator arrived.
    PeerClosed,
}

/// Netlink connection running one transaction at a time.
pub struct Connection<T: Transport = NetlinkSocket> {
    transport: T,
    seq: u32,
}

impl Connection<NetlinkSocket> {
    /// Open a connection with the default socket configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ChannelConfig::default())
    }

    /// Open a connection with a custom socket configuration.
    pub fn with_config(config: ChannelConfig) -> Result<Self> {
        Ok(Self::from_transport(NetlinkSocket::open(config)?))
    }
}

impl<T: Transport> Connection<T> {
    /// Wrap an existing transport.
    ///
    /// The first sequence number is the current Unix time in seconds.
    pub fn from_transport(transport: T) -> Self {
        let seq = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(1);
        Self::with_seq(transport, seq)
    }

    /// Wrap an existing transport, starting at sequence number `seq`.
    pub fn with_seq(transport: T, seq: u32) -> Self {
        Self { transport, seq }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sequence number the next request will carry.
    pub fn next_seq(&self) -> u32 {
        self.seq
    }

    /// Stamp `builder` with the next sequence number and our port id.
    pub fn finalize(&mut self, builder: RequestBuilder) -> Result<Request> {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        builder.finalize(seq, self.transport.pid())
    }

    /// Send `request` and dispatch replies until the transaction ends.
    ///
    /// Data replies of the request's operation go to `decoder`. Interrupted
    /// receives are retried. A closed peer ends the transaction early.
    pub fn transaction<F>(&mut self, request: &Request, mut decoder: F) -> Result<Outcome>
    where
        F: FnMut(&NlMsgHdr, &[u8]) -> Result<()>,
    {
        self.transport.send(request.as_bytes())?;

        let expected = request.operation().reply_type();
        let mut dispatcher = Dispatcher::new(request.seq(), expected);
        loop {
            let buffer = match self.transport.receive() {
                Ok(buffer) => buffer,
                Err(Error::Interrupted) => {
                    tracing::trace!("receive interrupted, retrying");
                    continue;
                }
                Err(Error::PeerClosed) => {
                    tracing::warn!(
                        seq = request.seq(),
                        state = ?dispatcher.state(),
                        "netlink socket closed before the transaction ended"
                    );
                    return Ok(Outcome::PeerClosed);
                }
                Err(e) => return Err(e),
            };

            if dispatcher.feed(&buffer, &mut decoder)? == State::Done {
                return Ok(Outcome::Done);
            }
        }
    }

    /// Run a request answered by an ACK.
    fn request_ack(&mut self, builder: RequestBuilder, context: String) -> Result<()> {
        let request = self.finalize(builder)?;
        self.transaction(&request, |_, _| Ok(()))
            .map(|_| ())
            .map_err(|e| e.with_context(context))
    }

    /// Run a dump request and decode every data message.
    fn dump<M: FromPayload>(&mut self, builder: RequestBuilder, context: &str) -> Result<Vec<M>> {
        let request = self.finalize(builder)?;
        let mut items = Vec::new();
        self.transaction(&request, |_, payload| {
            items.push(M::from_payload(payload)?);
            Ok(())
        })
        .map_err(|e| e.with_context(context))?;
        Ok(items)
    }

    // ========================================================================
    // Addresses
    // ========================================================================

    /// Assign `addr` to the device `ifindex`.
    pub fn add_address(&mut self, ifindex: u32, addr: PhonetAddr) -> Result<()> {
        let builder = address_request(Operation::NewAddr, ifindex, Some(addr))?;
        self.request_ack(builder, format!("adding address {addr:#04x}"))
    }

    /// Remove `addr` from the device `ifindex`.
    pub fn del_address(&mut self, ifindex: u32, addr: PhonetAddr) -> Result<()> {
        let builder = address_request(Operation::DelAddr, ifindex, Some(addr))?;
        self.request_ack(builder, format!("deleting address {addr:#04x}"))
    }

    /// List the Phonet addresses of the device `ifindex`.
    pub fn get_addresses(&mut self, ifindex: u32) -> Result<Vec<PhonetAddress>> {
        let builder = address_request(Operation::GetAddr, ifindex, None)?;
        let request = self.finalize(builder)?;

        let mut addresses = Vec::new();
        self.transaction(&request, |_, payload| {
            // Dumps cover every device and family; keep ours only.
            if let Some(address) = PhonetAddress::parse(payload)?
                && address.ifindex == ifindex
            {
                addresses.push(address);
            }
            Ok(())
        })
        .map_err(|e| e.with_context("listing addresses"))?;

        Ok(addresses)
    }

    // ========================================================================
    // Routes
    // ========================================================================

    /// Route `dst` through the device `ifindex`.
    pub fn add_route(&mut self, dst: PhonetAddr, ifindex: u32) -> Result<()> {
        let builder = route_request(Operation::NewRoute, Some((dst, ifindex)))?;
        self.request_ack(builder, format!("adding route {dst:#04x}"))
    }

    /// Remove the route to `dst` through the device `ifindex`.
    pub fn del_route(&mut self, dst: PhonetAddr, ifindex: u32) -> Result<()> {
        let builder = route_request(Operation::DelRoute, Some((dst, ifindex)))?;
        self.request_ack(builder, format!("deleting route {dst:#04x}"))
    }

    /// List all Phonet routes, in the order the kernel reports them.
    ///
    /// Kernels without Phonet routing answer with other families; those
    /// entries are dropped.
    pub fn get_routes(&mut self) -> Result<Vec<PhonetRoute>> {
        let builder = route_request(Operation::GetRoute, None)?;
        let routes: Vec<PhonetRoute> = self.dump(builder, "listing routes")?;
        Ok(routes.into_iter().filter(PhonetRoute::is_phonet).collect())
    }
}

fn address_request(
    operation: Operation,
    ifindex: u32,
    addr: Option<PhonetAddr>,
) -> Result<RequestBuilder> {
    let mut builder = RequestBuilder::new(&IfAddrMsg::phonet(ifindex))?;
    builder.select(operation);
    if let Some(addr) = addr {
        builder.add_attribute(IFA_LOCAL, &[addr.value()])?;
    }
    Ok(builder)
}

fn route_request(operation: Operation, target: Option<(PhonetAddr, u32)>) -> Result<RequestBuilder> {
    let mut builder = RequestBuilder::new(&RtMsg::phonet())?;
    builder.select(operation);
    if let Some((dst, ifindex)) = target {
        builder.add_attribute(RTA_DST, &[dst.value()])?;
        builder.add_attribute(RTA_OIF, &ifindex.to_ne_bytes())?;
    }
    Ok(builder)
}
