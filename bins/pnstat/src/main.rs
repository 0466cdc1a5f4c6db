//! pnstat command - list active Phonet sockets.
//!
//! Reads the kernel socket table and joins each socket with the process
//! holding it, found by walking the per-process file descriptor links.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use phonet::output::{OutputFormat, OutputOptions, print_all, write_socket_header};
use phonet::sockets::{PROC_ROOT, ProcessTable, SocketInfo, read_sockets};

#[derive(Parser)]
#[command(name = "pnstat", version, about = "Active Phonet sockets")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Root of the proc filesystem.
    #[arg(long, default_value = PROC_ROOT, hide = true)]
    proc_root: PathBuf,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pnstat: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let table = cli.proc_root.join("net").join("phonet");
    let entries =
        read_sockets(&table).with_context(|| format!("cannot read {}", table.display()))?;
    let processes = ProcessTable::scan(&cli.proc_root)
        .with_context(|| format!("cannot scan {}", cli.proc_root.display()))?;

    let sockets: Vec<SocketInfo> = entries
        .into_iter()
        .map(|entry| processes.resolve(entry))
        .collect();

    let format = OutputFormat::from_json_flag(cli.json);
    let opts = OutputOptions {
        numeric: false,
        pretty: cli.pretty,
    };

    let mut stdout = io::stdout().lock();
    if format == OutputFormat::Text {
        write_socket_header(&mut stdout)?;
    }
    print_all(&mut stdout, &sockets, format, &opts)?;
    stdout.flush()?;

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<phonet::Error>())
        .map_or(1, phonet::Error::exit_code)
}
