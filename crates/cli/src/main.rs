//! flitsim command-line driver.
//!
//! This binary runs a single interconnect command end to end. It performs:
//! 1. **Setup:** Load a JSON config file (or use defaults) and install logging.
//! 2. **Run:** Dispatch one data or control command and step until it is received.
//! 3. **Report:** Print the completion cycle and, on request, the statistics.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use flitsim_core::config::{Config, HandoffMode};
use flitsim_core::icnt::{InterconnectCommand, InterconnectWrapper};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "flitsim",
    author,
    version,
    about = "Flit-level network-on-chip traffic engine",
    long_about = "Send one packet through the interconnect and report when it arrives.\n\nExamples:\n  flitsim run\n  flitsim run --config noc.json --src 3 --dst 12 --data --write --size 8 --stats\n  RUST_LOG=flitsim_core=debug flitsim run --config watch.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine activity (repeat for the per-cycle trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch one command and step until it is received.
    Run(RunArgs),
}

#[derive(clap::Args, Debug)]
struct RunArgs {
    /// JSON configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source node.
    #[arg(long, default_value_t = 0)]
    src: usize,

    /// Destination node.
    #[arg(long, default_value_t = 1)]
    dst: usize,

    /// Subnet to send on.
    #[arg(long, default_value_t = 0)]
    subnet: usize,

    /// Payload size in flits.
    #[arg(long, default_value_t = 10)]
    size: usize,

    /// Send a data packet instead of a control packet.
    #[arg(long)]
    data: bool,

    /// Data write instead of read (with `--data`).
    #[arg(long)]
    write: bool,

    /// Send a response instead of a request.
    #[arg(long)]
    response: bool,

    /// Give up after this many cycles.
    #[arg(long, default_value_t = 1000)]
    max_cycles: u64,

    /// Print the statistics report.
    #[arg(long)]
    stats: bool,

    /// Print the statistics as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => cmd_run(&args),
    };
    if let Err(e) = result {
        eprintln!("[!] {e}");
        process::exit(1);
    }
}

/// Installs the `tracing` subscriber. `RUST_LOG` overrides the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "warn,flitsim_core=debug",
        _ => "warn,flitsim_core=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Runs one command to completion or until `max_cycles`.
///
/// Returns an error message for configuration or fatal engine errors.
fn cmd_run(args: &RunArgs) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => Config::from_file(path).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    let mut icnt = InterconnectWrapper::new(&config).map_err(|e| e.to_string())?;

    let cmd = if args.data {
        InterconnectCommand::data_packet(
            args.src,
            args.dst,
            args.subnet,
            args.size,
            args.write,
            args.response,
        )
    } else {
        InterconnectCommand::control_packet(args.src, args.dst, args.subnet, args.size, args.response)
    };

    println!(
        "Network: {} nodes, {} subnet(s), {} VCs x {} slots, latency {}",
        config.network.nodes,
        config.network.subnets,
        config.network.num_vcs,
        config.network.vc_buf_size,
        config.network.latency
    );
    println!(
        "[*] {} packet {} -> {} on subnet {}: {} flit(s), expected {} cycle(s)",
        if args.data { "Data" } else { "Control" },
        args.src,
        args.dst,
        args.subnet,
        cmd.descriptor().packet_size,
        cmd.expected_cycles()
    );

    if !icnt.dispatch_command(&cmd) {
        return Err("interconnect rejected the command".to_string());
    }

    let mut received_at = None;
    while icnt.time() < args.max_cycles {
        icnt.cycle_step().map_err(|e| format!("FATAL at cycle {}: {e}", icnt.time()))?;
        if cmd.is_received() {
            received_at = Some(icnt.time());
            break;
        }
    }

    match received_at {
        Some(cycle) => {
            println!("[*] Received at cycle {cycle}");
            if config.traffic.handoff == HandoffMode::Deferred {
                let _ = icnt.handle_received_command(&cmd);
            }
            println!("[*] Handled: {}", cmd.is_handled());
        }
        None => println!("[!] Not received within {} cycles", args.max_cycles),
    }

    if args.stats {
        icnt.stats().print();
    }
    if args.json {
        let text = serde_json::to_string_pretty(icnt.stats()).map_err(|e| e.to_string())?;
        println!("{text}");
    }
    Ok(())
}
