//! phonet command - Phonet device address configuration.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use phonet::netlink::Connection;
use phonet::output::{OutputFormat, OutputOptions, print_all};
use phonet::util::{PhonetAddr, name_to_index};

#[derive(Parser)]
#[command(name = "phonet", version, about = "Phonet address configuration tool")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assign a Phonet address to a device.
    #[command(visible_alias = "a")]
    Add(AddrArgs),

    /// Remove a Phonet address from a device.
    #[command(visible_alias = "del", visible_alias = "d")]
    Delete(AddrArgs),

    /// List the Phonet addresses of a device.
    #[command(visible_alias = "l", visible_alias = "ls")]
    List(DevArgs),
}

#[derive(Args)]
struct AddrArgs {
    /// Address in hexadecimal (e.g. 0x6c); the low two bits must be zero.
    address: String,

    #[command(flatten)]
    dev: DevArgs,
}

#[derive(Args)]
struct DevArgs {
    /// Device name.
    #[arg(long, short = 'i', visible_alias = "interface")]
    dev: String,
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
            eprintln!("phonet: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::from_json_flag(cli.json);
    let opts = OutputOptions {
        numeric: false,
        pretty: cli.pretty,
    };

    match cli.command {
        Command::Add(args) => {
            let (ifindex, addr) = args.resolve()?;
            let mut conn = Connection::new().context("opening netlink socket")?;
            conn.add_address(ifindex, addr)
                .with_context(|| format!("cannot add address on {}", args.dev.dev))?;
        }
        Command::Delete(args) => {
            let (ifindex, addr) = args.resolve()?;
            let mut conn = Connection::new().context("opening netlink socket")?;
            conn.del_address(ifindex, addr)
                .with_context(|| format!("cannot delete address on {}", args.dev.dev))?;
        }
        Command::List(args) => {
            let ifindex = args.resolve()?;
            let mut conn = Connection::new().context("opening netlink socket")?;
            let addresses = conn
                .get_addresses(ifindex)
                .with_context(|| format!("cannot list addresses of {}", args.dev))?;

            let mut stdout = io::stdout().lock();
            print_all(&mut stdout, &addresses, format, &opts)?;
        }
    }

    Ok(())
}

impl AddrArgs {
    /// Validate the address and device before any socket is opened.
    fn resolve(&self) -> anyhow::Result<(u32, PhonetAddr)> {
        let addr = PhonetAddr::parse_hex(&self.address)?;
        let ifindex = self.dev.resolve()?;
        Ok((ifindex, addr))
    }
}

impl DevArgs {
    fn resolve(&self) -> anyhow::Result<u32> {
        Ok(name_to_index(&self.dev)?)
    }
}

/// 2 when the root cause is bad input, 1 otherwise.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<phonet::Error>())
        .map_or(1, phonet::Error::exit_code)
}
