//! Command line front end: build solver input decks from a JSON network
//! description or from the built-in coil generator.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod coil;
mod netfile;

#[derive(Parser)]
#[command(name = "hank")]
#[command(about = "Generate FastHenry-style inductance solver input decks", long_about = None)]
#[command(version)]
struct Cli {
    /// Log model construction at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a deck from a JSON network description
    Build {
        /// Path to the network description
        #[arg(value_name = "NETWORK")]
        network: PathBuf,

        #[command(flatten)]
        out: OutputArgs,
    },

    /// Generate a square planar spiral coil and write its deck
    Coil {
        #[command(flatten)]
        coil: coil::CoilArgs,

        #[command(flatten)]
        out: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Destination path for the generated deck
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Overwrite the destination if it already exists
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Build { network, out } => {
            let model = netfile::load(&network)?;
            model
                .write_file(&out.output, out.force)
                .with_context(|| format!("failed to write {}", out.output.display()))?;
        }
        Commands::Coil { coil, out } => {
            let model = coil.build()?;
            model
                .write_file(&out.output, out.force)
                .with_context(|| format!("failed to write {}", out.output.display()))?;
        }
    }

    Ok(())
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("hank_model=debug,hank=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("hank_model=info,hank=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
