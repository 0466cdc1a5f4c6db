//! Printable implementation for PhonetRoute.

use std::io::Write;

use crate::netlink::PhonetRoute;
use crate::output::{OutputOptions, Printable, ifname_or_index};

/// Printed for a route without a destination attribute.
const NO_DST: u8 = 0xff;

impl Printable for PhonetRoute {
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()> {
        let dst = self.dst.map_or(NO_DST, |d| d.value());
        let dev = self
            .oif
            .map(|oif| ifname_or_index(oif, opts))
            .unwrap_or_default();
        writeln!(w, " {:02X} {}", dst, dev)
    }

    fn to_json(&self, opts: &OutputOptions) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "table": self.table,
            "protocol": self.protocol,
            "type": self.kind,
        });

        if let Some(dst) = self.dst {
            obj["dst"] = serde_json::json!(format!("{:#04x}", dst));
        }

        if let Some(oif) = self.oif {
            obj["dev"] = serde_json::json!(ifname_or_index(oif, opts));
        }

        obj
    }
}
