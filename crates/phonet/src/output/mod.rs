//! Output formatting (JSON/text) for the Phonet tools.

mod printable;

pub use printable::write_socket_header;

use std::io::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Don't resolve names (show interface indexes).
    pub numeric: bool,
    /// Pretty print (for JSON).
    pub pretty: bool,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Pick the format from a `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Trait for types that can be printed.
pub trait Printable {
    /// Print as plain text.
    fn print_text<W: Write>(&self, w: &mut W, opts: &OutputOptions) -> std::io::Result<()>;

    /// Convert to JSON value.
    fn to_json(&self, opts: &OutputOptions) -> serde_json::Value;
}

/// Print a list of Printable items to `w`.
///
/// Text output is one item after another; JSON output is a single array.
pub fn print_all<T: Printable, W: Write>(
    w: &mut W,
    items: &[T],
    format: OutputFormat,
    opts: &OutputOptions,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => {
            for item in items {
                item.print_text(w, opts)?;
            }
        }
        OutputFormat::Json => {
            let json: Vec<_> = items.iter().map(|i| i.to_json(opts)).collect();
            if opts.pretty {
                serde_json::to_writer_pretty(&mut *w, &json)?;
            } else {
                serde_json::to_writer(&mut *w, &json)?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

/// Interface name for `index`, or the bare index when it cannot be resolved.
pub(crate) fn ifname_or_index(index: u32, opts: &OutputOptions) -> String {
    if opts.numeric {
        return index.to_string();
    }
    crate::util::index_to_name(index).unwrap_or_else(|_| index.to_string())
}
