//! Netlink and `/proc` plumbing for the Linux Phonet address family.
//!
//! The crate backs three small tools: `phonet` assigns device addresses,
//! `pnroute` manages routes and `pnstat` lists Phonet sockets.
//!
//! # Features
//!
//! - `output` - JSON/text output formatting
//! - `integration` - tests that talk to a live kernel
//!
//! # Example
//!
//! ```ignore
//! use phonet::{Connection, PhonetAddr};
//!
//! fn main() -> phonet::Result<()> {
//!     let mut conn = Connection::new()?;
//!     for route in conn.get_routes()? {
//!         println!("{:?}", route);
//!     }
//!     Ok(())
//! }
//! ```

// Core modules (always available)
pub mod netlink;
pub mod sockets;
pub mod util;

// Feature-gated modules
#[cfg(feature = "output")]
pub mod output;

// Re-export common types at crate root for convenience
pub use netlink::{Connection, Error, Result};
pub use util::PhonetAddr;
