//! Printable implementation for the socket table.

use std::io::Write;

use crate::output::{OutputOptions, Printable};
use crate::sockets::SocketInfo;

/// Write the `pnstat` banner and column header.
pub fn write_socket_header<W: Write>(w: &mut W) -> std::io::Result<()> {
    writeln!(w, "Active Phonet connections")?;
    writeln!(
        w,
        "Proto Recv-Q Send-Q Local  Remote Res State       PID/Program"
    )
}

impl Printable for SocketInfo {
    fn print_text<W: Write>(&self, w: &mut W, _opts: &OutputOptions) -> std::io::Result<()> {
        let e = &self.entry;
        write!(
            w,
            "{:>5} {:>6} {:>6}   {:04X}:  {:04X}:",
            e.protocol_name(),
            e.rx_queue,
            e.tx_queue,
            e.local,
            e.remote
        )?;

        if e.has_resource() {
            write!(w, " {:02X}", e.resource)?;
        } else {
            write!(w, " --")?;
        }

        write!(w, " {:<11} ", e.state_name())?;

        if let Some(owner) = &self.owner {
            write!(w, "{:>5}/{}", owner.pid, owner.program)?;
        }

        writeln!(w)
    }

    fn to_json(&self, _opts: &OutputOptions) -> serde_json::Value {
        let e = &self.entry;
        let mut obj = serde_json::json!({
            "proto": e.protocol_name(),
            "recv_q": e.rx_queue,
            "send_q": e.tx_queue,
            "local": format!("{:04X}", e.local),
            "remote": format!("{:04X}", e.remote),
            "state": e.state_name(),
            "uid": e.uid,
            "inode": e.inode,
        });

        if e.has_resource() {
            obj["resource"] = serde_json::json!(format!("{:02X}", e.resource));
        }

        if let Some(owner) = &self.owner {
            obj["pid"] = serde_json::json!(owner.pid);
            obj["program"] = serde_json::json!(owner.program);
        }

        obj
    }
}
