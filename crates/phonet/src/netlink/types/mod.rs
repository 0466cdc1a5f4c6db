//! Fixed-size family bodies carried by Phonet requests and replies.

pub mod addr;
pub mod route;

/// Phonet address family.
pub const AF_PHONET: u8 = 35;
