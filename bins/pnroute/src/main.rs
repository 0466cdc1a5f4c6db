//! pnroute command - Phonet routing table configuration.
//!
//! Without a subcommand the routing table is listed, one route per line:
//! the destination in hexadecimal followed by the output device.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use phonet::netlink::Connection;
use phonet::output::{OutputFormat, OutputOptions, print_all};
use phonet::util::{PhonetAddr, name_to_index};

#[derive(Parser)]
#[command(name = "pnroute", version, about = "Phonet routing table tool")]
struct Cli {
    /// Output JSON.
    #[arg(short = 'j', long)]
    json: bool,

    /// Pretty print JSON.
    #[arg(short = 'p', long)]
    pretty: bool,

    /// Don't resolve device names.
    #[arg(short = 'n', long)]
    numeric: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a route.
    Add(RouteArgs),

    /// Delete a route.
    #[command(visible_alias = "delete")]
    Del(RouteArgs),
}

#[derive(Args)]
struct RouteArgs {
    /// Destination address: decimal, 0x hexadecimal or 0 octal, low two bits zero.
    dest: String,

    /// Output device name.
    dev: String,
}

impl RouteArgs {
    /// Validate destination and device before any socket is opened.
    fn resolve(&self) -> anyhow::Result<(PhonetAddr, u32)> {
        let dst = PhonetAddr::parse_auto(&self.dest)?;
        let ifindex = name_to_index(&self.dev)?;
        Ok((dst, ifindex))
    }
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
            eprintln!("pnroute: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = OutputFormat::from_json_flag(cli.json);
    let opts = OutputOptions {
        numeric: cli.numeric,
        pretty: cli.pretty,
    };

    match cli.command {
        None => {
            let mut conn = Connection::new().context("opening netlink socket")?;
            let routes = conn.get_routes().context("cannot list routes")?;

            let mut stdout = io::stdout().lock();
            print_all(&mut stdout, &routes, format, &opts)?;
        }
        Some(Command::Add(args)) => {
            let (dst, ifindex) = args.resolve()?;
            let mut conn = Connection::new().context("opening netlink socket")?;
            conn.add_route(dst, ifindex)
                .with_context(|| format!("cannot add route via {}", args.dev))?;
        }
        Some(Command::Del(args)) => {
            let (dst, ifindex) = args.resolve()?;
            let mut conn = Connection::new().context("opening netlink socket")?;
            conn.del_route(dst, ifindex)
                .with_context(|| format!("cannot delete route via {}", args.dev))?;
        }
    }

    Ok(())
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<phonet::Error>())
        .map_or(1, phonet::Error::exit_code)
}
