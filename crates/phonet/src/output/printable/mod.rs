//! Printable implementations for Phonet types.

mod address;
mod route;
mod socket;

pub use socket::write_socket_header;
