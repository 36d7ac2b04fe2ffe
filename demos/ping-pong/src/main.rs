//! ergo demo programs
//!
//! Small clients of the process API:
//!
//! - `ping-pong`: a pong process answers every ping; a ping process linked to
//!   it sends a number of pings and then finishes.
//! - `counter`: a counter process accumulates additions and reports its total.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin ping-pong -- --pings 5
//! cargo run --bin ping-pong -- --program counter --count 10
//! RUST_LOG=trace cargo run --bin ping-pong
//! ```

mod counter;
mod ping_pong;

use clap::{Parser, ValueEnum};
use ergo_process::global;
use std::env;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Which demo program to run.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Program {
    /// Ping/pong between two linked processes
    PingPong,
    /// A counter process fed by a client
    Counter,
}

/// ergo demo programs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Program to run
    #[arg(long, value_enum, default_value = "ping-pong")]
    program: Program,

    /// Number of pings sent by the ping process
    #[arg(short, long, default_value = "3")]
    pings: usize,

    /// Number of additions sent to the counter
    #[arg(short, long, default_value = "10")]
    count: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,ergo_runtime=debug,ergo_process=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    global::init();
    tracing::info!(program = ?args.program, "starting");

    match args.program {
        Program::PingPong => ping_pong::run(args.pings).await?,
        Program::Counter => counter::run(args.count).await?,
    }

    let remaining = serde_json::to_string(&global::list_processes())?;
    tracing::info!(%remaining, "all processes finished");

    Ok(())
}
