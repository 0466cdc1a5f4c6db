//! Printable implementation for PhonetAddress.

use std::io::Write;

use crate::netlink::PhonetAddress;
use crate::output::{OutputOptions, Printable, ifname_or_index};

impl Printable for PhonetAddress {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        writeln!(w, "  phonet addr: {}", self.addr)
    }

    fn to_json(&self, opts: &OutputOptions) -> serde_json::Value {
        serde_json::json!({
            "dev": ifname_or_index(self.ifindex, opts),
            "ifindex": self.ifindex,
            "addr": format!("{:#04x}", self.addr),
            "flags": self.flags,
            "scope": self.scope,
        })
    }
}
