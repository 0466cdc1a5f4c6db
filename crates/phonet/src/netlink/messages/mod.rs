//! Strongly-typed decoded data messages.

pub mod address;
pub mod route;

pub use address::PhonetAddress;
pub use route::PhonetRoute;

use super::error::Result;

/// A data message decoded from one netlink payload.
pub trait FromPayload: Sized {
    /// Decode the fixed body and attributes of `payload`.
    fn from_payload(payload: &[u8]) -> Result<Self>;
}
