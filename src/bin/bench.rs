use anyhow::{Context, Result};
use clap::Parser;
use pulsar::board::Position;
use pulsar::search::{Search, SearchEvent, SearchMode};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "pulsar-bench", version, about = "Benchmark Pulsar search NPS")]
struct Args {
    /// FEN string or 'startpos'
    #[arg(long, default_value = "startpos")]
    fen: String,

    /// Movetime in milliseconds (ignored if depth is set)
    #[arg(long, default_value_t = 1000)]
    movetime: u64,

    /// Fixed search depth (overrides movetime when > 0)
    #[arg(long, default_value_t = 0)]
    depth: u32,

    /// Emit the result and every search report as JSON lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct BenchResult {
    fen: String,
    bestmove: Option<String>,
    ponder: Option<String>,
    depth: u32,
    nodes: u64,
    elapsed_ms: u128,
    nps: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let pos = if args.fen == "startpos" {
        Position::startpos()
    } else {
        Position::from_fen(&args.fen).with_context(|| format!("invalid FEN '{}'", args.fen))?
    };
    let fen = pos.to_fen();
    let mode = if args.depth > 0 { SearchMode::Depth(args.depth) } else { SearchMode::Time(Duration::from_millis(args.movetime)) };

    let (tx, rx) = crossbeam_channel::unbounded::<SearchEvent>();
    let t0 = Instant::now();
    let outcome = Search::new(pos, mode).run(tx);
    let dt = t0.elapsed();

    if args.json {
        for event in rx.try_iter() { println!("{}", serde_json::to_string(&event)?); }
    }
    let best = outcome.best;
    let nps = if dt.as_secs_f64() > 0.0 { best.nodes as f64 / dt.as_secs_f64() } else { 0.0 };
    let result = BenchResult {
        fen,
        bestmove: best.best.map(|m| m.to_string()),
        ponder: best.ponder.map(|m| m.to_string()),
        depth: best.depth,
        nodes: best.nodes,
        elapsed_ms: dt.as_millis(),
        nps,
    };
    if args.json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!(
            "bestmove={} depth={} nodes={} elapsed={:.3}s nps={:.1}",
            result.bestmove.as_deref().unwrap_or("(none)"), result.depth, result.nodes, dt.as_secs_f64(), nps
        );
    }
    Ok(())
}
