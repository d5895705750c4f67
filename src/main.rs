//! nodexpd - minimal host-metrics exporter.
//!
//! With `-p <port>` runs an HTTP server exposing `/metrics`; without a
//! port renders the metric stream once to standard output and exits.

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use nodexpd::collector::{Exporter, RealFs};
use nodexpd::server;

/// Minimal host-metrics exporter for pull-based monitoring collectors.
#[derive(Parser)]
#[command(name = "nodexpd", about = "Minimal host-metrics exporter", version)]
struct Args {
    /// TCP port to listen on (all interfaces). When omitted, render the
    /// metric stream once to stdout and exit.
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to /proc filesystem (for testing against a snapshot tree).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Increase logging verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Initializes the tracing subscriber with the appropriate log level.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(format!("nodexpd={}", level).parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let mut exporter = Exporter::new(RealFs::new(), &args.proc_path);

    match args.port {
        Some(port) => {
            info!("nodexpd {} starting", env!("CARGO_PKG_VERSION"));
            info!("Config: port={}, proc={}", port, args.proc_path);

            if let Err(e) = ctrlc::set_handler(|| {
                info!("Received shutdown signal");
                std::process::exit(0);
            }) {
                warn!("Failed to set Ctrl-C handler: {}", e);
            }

            server::serve(port, &mut exporter)
        }
        None => {
            print!("{}", exporter.render());
            Ok(())
        }
    }
}
