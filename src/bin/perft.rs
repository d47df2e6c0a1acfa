use anyhow::{Context, Result};
use pulsar::board::Position;
use pulsar::perft::{divide, perft, perft_parallel};

#[derive(clap::Parser, Debug)]
#[command(name = "perft", about = "Perft driver for Pulsar")]
struct Args {
    /// Search depth
    #[arg(value_name = "DEPTH")]
    depth: u32,
    /// FEN string or "startpos"
    #[arg(value_name = "FEN", default_value = "startpos")]
    fen: String,
    /// Number of threads for root-split
    #[arg(long, default_value_t = 1)]
    threads: usize,
    /// Report elapsed time and NPS
    #[arg(long, default_value_t = false)]
    nps: bool,
    /// Print node counts per root move
    #[arg(long, default_value_t = false)]
    divide: bool,
}

fn main() -> Result<()> {
    use clap::Parser;
    use std::time::Instant;

    env_logger::init();
    let args = Args::parse();
    let mut base = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).with_context(|| format!("invalid FEN '{}'", args.fen))?
    };

    if args.divide {
        let mut total = 0;
        for (mv, nodes) in divide(&mut base, args.depth) {
            println!("{mv}: {nodes}");
            total += nodes;
        }
        println!("nodes: {total}");
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads.max(1)).build().context("thread pool")?;
    let (nodes, dt) = pool.install(|| {
        let t0 = Instant::now();
        let nodes = if args.threads <= 1 { perft(&mut base, args.depth) } else { perft_parallel(&base, args.depth) };
        (nodes, t0.elapsed().as_secs_f64())
    });

    if args.nps { println!("nodes: {nodes} elapsed: {:.3}s nps: {:.1}", dt, nodes as f64 / dt.max(f64::EPSILON)); }
    else { println!("nodes: {nodes}"); }
    Ok(())
}
