//! CLI frontend for the Realpolitik country simulation.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use rp_simulation::LootPolicy;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rp",
    about = "Realpolitik: a multi-agent country simulation",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless simulation for a fixed number of ticks
    Simulate {
        /// Number of countries to generate
        #[arg(short, long, default_value = "5")]
        countries: usize,

        /// Number of ticks to simulate
        #[arg(short, long, default_value = "100")]
        ticks: u64,

        /// RNG seed for deterministic simulation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Show all events (not just summary)
        #[arg(short, long)]
        verbose: bool,

        /// Equipment transfer on annihilation: overwrite or add
        #[arg(long, default_value = "overwrite")]
        loot: LootPolicy,
    },

    /// Run the real-time scheduler and stream messages as JSON lines
    Run {
        /// Number of countries to generate
        #[arg(short, long, default_value = "5")]
        countries: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Wall-clock run time before stopping
        #[arg(long, default_value = "5")]
        seconds: u64,

        /// Milliseconds between ticks
        #[arg(long, default_value = "200")]
        interval_ms: u64,

        /// Also stream per-tick updates for this country
        #[arg(short, long)]
        follow: Option<String>,

        /// Force a war at start-up, as ATTACKER:DEFENDER (repeatable)
        #[arg(long = "war", value_name = "ATTACKER:DEFENDER")]
        wars: Vec<String>,

        /// Credit funds at start-up, as NAME=AMOUNT (repeatable)
        #[arg(long = "fund", value_name = "NAME=AMOUNT")]
        funds: Vec<String>,
    },

    /// Generate a world and print it without simulating
    Inspect {
        /// Number of countries to generate
        #[arg(short, long, default_value = "5")]
        countries: usize,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Print the countries as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            countries,
            ticks,
            seed,
            verbose,
            loot,
        } => commands::simulate::run(countries, ticks, seed, verbose, loot),
        Commands::Run {
            countries,
            seed,
            seconds,
            interval_ms,
            follow,
            wars,
            funds,
        } => commands::run::run(&commands::run::RunOptions {
            countries,
            seed,
            seconds,
            interval_ms,
            follow,
            wars,
            funds,
        }),
        Commands::Inspect {
            countries,
            seed,
            json,
        } => commands::inspect::run(countries, seed, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
