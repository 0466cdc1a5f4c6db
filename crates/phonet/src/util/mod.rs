//! Shared utilities for the Phonet tools.

pub mod addr;
pub mod ifname;

pub use addr::PhonetAddr;
pub use ifname::{index_to_name, name_to_index};
