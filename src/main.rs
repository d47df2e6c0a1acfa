use anyhow::Result;
use clap::Parser;
use log::info;
use pulsar::uci::{UciEngine, ENGINE_NAME};
use std::io;

#[derive(Parser, Debug)]
#[command(author, version, about = "UCI chess engine: speaks the protocol on stdin/stdout", long_about = None)]
struct Args {
    /// Log level when RUST_LOG is unset (logs go to stderr)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level.as_str())).init();
    info!("{ENGINE_NAME} {} ready", env!("CARGO_PKG_VERSION"));

    let mut engine = UciEngine::new(io::stdout());
    engine.run_loop(io::stdin().lock());
    Ok(())
}
