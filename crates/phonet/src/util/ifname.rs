//! Interface name and index utilities.

use crate::netlink::{Error, Result};

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// Validate an interface name.
pub fn validate(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidInterfaceName("empty name".to_string()));
    }

    if name.len() >= IFNAMSIZ {
        return Err(Error::InvalidInterfaceName(format!(
            "{name}: too long (max {} chars)",
            IFNAMSIZ - 1
        )));
    }

    if name.contains('/') || name.contains('\0') || name.chars().any(char::is_whitespace) {
        return Err(Error::InvalidInterfaceName(format!(
            "{name}: contains invalid characters"
        )));
    }

    Ok(())
}

/// Convert an interface name to index.
pub fn name_to_index(name: &str) -> Result<u32> {
    validate(name)?;

    let path = format!("{SYS_CLASS_NET}/{name}/ifindex");
    let not_found = || Error::InterfaceNotFound {
        name: name.to_string(),
    };
    let content = std::fs::read_to_string(&path).map_err(|_| not_found())?;

    content.trim().parse().map_err(|_| not_found())
}

/// Convert an interface index to name.
pub fn index_to_name(index: u32) -> Result<String> {
    let not_found = || Error::InterfaceNotFound {
        name: format!("index {index}"),
    };
    if index == 0 {
        return Err(not_found());
    }

    for entry in std::fs::read_dir(SYS_CLASS_NET)?.flatten() {
        let path = entry.path().join("ifindex");
        if let Ok(content) = std::fs::read_to_string(&path)
            && let Ok(idx) = content.trim().parse::<u32>()
            && idx == index
        {
            return Ok(entry.file_name().to_string_lossy().to_string());
        }
    }

    Err(not_found())
}
