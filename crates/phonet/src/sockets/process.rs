//! Socket inode to process lookup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::SocketEntry;
use crate::netlink::Result;

/// Process holding a socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Process id.
    pub pid: u32,
    /// Executable basename, empty when unreadable.
    pub program: String,
}

/// A socket record joined with its owning process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketInfo {
    /// The `/proc/net/phonet` record.
    pub entry: SocketEntry,
    /// Owning process, if any process holds the inode.
    pub owner: Option<Owner>,
}

/// Map from socket inode to the pid holding it, built once per run.
#[derive(Debug, Clone, Default)]
pub struct ProcessTable {
    root: PathBuf,
    owners: BTreeMap<u64, u32>,
}

impl ProcessTable {
    /// Walk `<proc_root>/<pid>/fd` for every process.
    ///
    /// Processes are visited in pid order and the first one seen holding a
    /// socket owns it. Processes that vanish or cannot be read are skipped.
    pub fn scan(proc_root: impl AsRef<Path>) -> Result<Self> {
        let root = proc_root.as_ref().to_path_buf();

        let mut pids: Vec<u32> = std::fs::read_dir(&root)?
            .flatten()
            .filter_map(|entry| entry.file_name().to_str()?.parse().ok())
            .collect();
        pids.sort_unstable();

        let mut owners = BTreeMap::new();
        for pid in pids {
            let Ok(fds) = std::fs::read_dir(root.join(pid.to_string()).join("fd")) else {
                continue;
            };
            for fd in fds.flatten() {
                let Ok(target) = std::fs::read_link(fd.path()) else {
                    continue;
                };
                if let Some(inode) = target.to_str().and_then(socket_inode) {
                    owners.entry(inode).or_insert(pid);
                }
            }
        }

        tracing::debug!(sockets = owners.len(), "scanned process table");
        Ok(Self { root, owners })
    }

    /// Pid holding the socket `inode`.
    pub fn owner(&self, inode: u64) -> Option<u32> {
        self.owners.get(&inode).copied()
    }

    /// Basename of the executable of `pid`, empty when unreadable.
    pub fn program(&self, pid: u32) -> String {
        std::fs::read_link(self.root.join(pid.to_string()).join("exe"))
            .ok()
            .and_then(|exe| exe.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_default()
    }

    /// Join `entry` with the process holding its inode.
    pub fn resolve(&self, entry: SocketEntry) -> SocketInfo {
        let owner = self.owner(entry.inode).map(|pid| Owner {
            pid,
            program: self.program(pid),
        });
        SocketInfo { entry, owner }
    }

    /// Number of sockets found.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Check if no sockets were found.
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Inode of a `socket:[N]` link target.
fn socket_inode(target: &str) -> Option<u64> {
    target
        .strip_prefix("socket:[")?
        .strip_suffix(']')?
        .parse()
        .ok()
}
