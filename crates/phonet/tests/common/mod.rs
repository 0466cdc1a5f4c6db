//! Common test utilities for integration tests.
//!
//! Provides `TestDevice`, a dummy interface removed on drop, and helper
//! macros for conditional test execution.

use std::process::Command;
use std::sync::atomic::{AtomicU32, Ordering};

use phonet::{Error, Result};

/// Global counter for unique device names.
static DEVICE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Generate a unique device name for this test.
///
/// Interface names are limited to 15 characters, so the prefix is cut.
fn unique_dev_name(prefix: &str) -> String {
    let id = DEVICE_COUNTER.fetch_add(1, Ordering::SeqCst);
    let pid = std::process::id() % 10_000;
    let prefix: String = prefix.chars().take(4).collect();
    format!("pn{}{}{}", prefix, pid, id)
}

/// A dummy network device with automatic cleanup.
pub struct TestDevice {
    name: String,
    index: u32,
}

impl TestDevice {
    /// Create and bring up a dummy device.
    pub fn new(prefix: &str) -> Result<Self> {
        let name = unique_dev_name(prefix);

        ip(&["link", "add", &name, "type", "dummy"])?;
        // removed on drop even if the steps below fail
        let mut device = Self {
            index: 0,
            name: name.clone(),
        };
        ip(&["link", "set", &name, "up"])?;

        device.index = phonet::util::name_to_index(&name)?;
        Ok(device)
    }

    /// Get the device name.
    #[allow(dead_code)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the device index.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl Drop for TestDevice {
    fn drop(&mut self) {
        let _ = Command::new("ip")
            .args(["link", "del", &self.name])
            .status();
    }
}

fn ip(args: &[&str]) -> Result<()> {
    let output = Command::new("ip").args(args).output()?;
    if !output.status.success() {
        return Err(Error::InvalidMessage(format!(
            "ip {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(())
}

/// Check if running as root.
pub fn is_root() -> bool {
    // SAFETY: geteuid has no preconditions.
    unsafe { libc::geteuid() == 0 }
}

/// Check if the phonet module is loaded.
pub fn has_phonet() -> bool {
    std::path::Path::new(phonet::sockets::PROC_NET_PHONET).exists()
}

/// Skip the test unless running as root with Phonet available.
#[macro_export]
macro_rules! require_phonet {
    () => {
        if !$crate::common::is_root() {
            eprintln!("Skipping test: requires root");
            return Ok(());
        }
        if !$crate::common::has_phonet() {
            eprintln!("Skipping test: phonet module not loaded");
            return Ok(());
        }
    };
}
