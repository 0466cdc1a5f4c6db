//! Netlink message fixtures for testing.
//!
//! Payload fixtures are captured replies written out byte by byte.
//! The framing helpers wrap a payload in a header with a chosen sequence
//! number so that dispatch can be tested without a kernel.

use zerocopy::IntoBytes;

use crate::netlink::message::{
    NLM_F_MULTI, NLMSG_HDRLEN, NlMsgError, NlMsgHdr, NlMsgType, nlmsg_align,
};

/// Address payload for 0x6c on ifindex 5.
/// Captured from: phonet list --dev phonet0 (ISI modem over USB)
pub fn addr_phonet0() -> Vec<u8> {
    vec![
        // ifaddrmsg: family=AF_PHONET, prefixlen=0, flags=0x80 (IFA_F_PERMANENT), scope=0, index=5
        0x23, // family = AF_PHONET (35)
        0x00, // prefixlen = 0
        0x80, // flags = IFA_F_PERMANENT
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x05, 0x00, 0x00, 0x00, // index = 5
        // IFA_LOCAL = 0x6c
        0x05, 0x00, // len = 5
        0x02, 0x00, // type = IFA_LOCAL (2)
        0x6c, 0x00, 0x00, 0x00, // 0x6c + padding
    ]
}

/// Route payload for 0x10 via ifindex 5.
/// Captured from: pnroute
pub fn route_phonet0() -> Vec<u8> {
    vec![
        // rtmsg: family=AF_PHONET, dst_len=6, table=main, protocol=static, type=unicast
        0x23, // family = AF_PHONET (35)
        0x06, // dst_len = 6
        0x00, // src_len = 0
        0x00, // tos = 0
        0xfe, // table = RT_TABLE_MAIN (254)
        0x04, // protocol = RTPROT_STATIC
        0x00, // scope = RT_SCOPE_UNIVERSE
        0x01, // type = RTN_UNICAST
        0x00, 0x00, 0x00, 0x00, // flags = 0
        // RTA_DST = 0x10
        0x05, 0x00, // len = 5
        0x01, 0x00, // type = RTA_DST (1)
        0x10, 0x00, 0x00, 0x00, // 0x10 + padding
        // RTA_OIF = 5
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = RTA_OIF (4)
        0x05, 0x00, 0x00, 0x00, // oif = 5
    ]
}

/// IPv4 route payload, as returned on kernels without Phonet routing.
pub fn route_inet_local() -> Vec<u8> {
    vec![
        // rtmsg: family=AF_INET, dst_len=32, table=local, protocol=kernel, scope=host, type=local
        0x02, // family = AF_INET
        0x20, // dst_len = 32
        0x00, // src_len = 0
        0x00, // tos = 0
        0xff, // table = RT_TABLE_LOCAL (255)
        0x02, // protocol = RTPROT_KERNEL
        0xfe, // scope = RT_SCOPE_HOST
        0x02, // type = RTN_LOCAL
        0x00, 0x00, 0x00, 0x00, // flags = 0
        // RTA_DST = 127.0.0.1
        0x08, 0x00, // len = 8
        0x01, 0x00, // type = RTA_DST (1)
        0x7f, 0x00, 0x00, 0x01, // 127.0.0.1
        // RTA_OIF = 1
        0x08, 0x00, // len = 8
        0x04, 0x00, // type = RTA_OIF (4)
        0x01, 0x00, 0x00, 0x00, // oif = 1
    ]
}

/// Frame `payload` as one message of `msg_type` with sequence `seq`.
pub fn message(seq: u32, msg_type: u16, payload: &[u8]) -> Vec<u8> {
    framed(seq, msg_type, 0, payload)
}

fn framed(seq: u32, msg_type: u16, flags: u16, payload: &[u8]) -> Vec<u8> {
    let mut header = NlMsgHdr::new(msg_type, flags);
    header.nlmsg_len = (NLMSG_HDRLEN + payload.len()) as u32;
    header.nlmsg_seq = seq;
    let mut data = header.as_bytes().to_vec();
    data.extend_from_slice(payload);
    data.resize(nlmsg_align(data.len()), 0);
    data
}

/// `NLMSG_ERROR` carrying `status` and an echoed request header.
pub fn ack(seq: u32, status: i32) -> Vec<u8> {
    let mut msg = NlMsgHdr::new(NlMsgType::RTM_NEWADDR, 0);
    msg.nlmsg_seq = seq;
    let error = NlMsgError { error: status, msg };
    framed(seq, NlMsgType::ERROR, 0, error.as_bytes())
}

/// `NLMSG_DONE` closing a dump.
pub fn done(seq: u32) -> Vec<u8> {
    framed(seq, NlMsgType::DONE, NLM_F_MULTI, &0i32.to_ne_bytes())
}

/// One `RTM_NEWROUTE` dump entry for `dst` via `oif`.
pub fn new_route(seq: u32, dst: u8, oif: u32) -> Vec<u8> {
    let mut payload = route_phonet0();
    payload[16] = dst;
    payload[24..28].copy_from_slice(&oif.to_ne_bytes());
    framed(seq, NlMsgType::RTM_NEWROUTE, NLM_F_MULTI, &payload)
}

/// One `RTM_NEWADDR` dump entry for `addr` on `ifindex`.
pub fn new_addr(seq: u32, ifindex: u32, addr: u8) -> Vec<u8> {
    let mut payload = addr_phonet0();
    payload[4..8].copy_from_slice(&ifindex.to_ne_bytes());
    payload[12] = addr;
    framed(seq, NlMsgType::RTM_NEWADDR, NLM_F_MULTI, &payload)
}
