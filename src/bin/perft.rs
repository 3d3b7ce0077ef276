//! Perft divide driver: counts leaf nodes per root move for a position,
//! for validating the move generator against reference engines.
//!
//! Usage: `perft [depth] [fen]` - defaults to depth 5 from the initial
//! position.

use std::env;
use std::process::ExitCode;
use std::time::Instant;

use skewer::board::Position;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let depth: u32 = match args.first().map(|s| s.parse()) {
        Some(Ok(depth)) => depth,
        None => 5,
        Some(Err(_)) => {
            eprintln!("usage: perft [depth] [fen]");
            return ExitCode::FAILURE;
        }
    };

    let mut pos = if args.len() > 1 {
        match Position::from_fen(&args[1..].join(" ")) {
            Ok(pos) => pos,
            Err(err) => {
                eprintln!("bad FEN: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        Position::new_initial()
    };

    println!("perft {} of {}", depth, pos.to_fen());
    let start = Instant::now();
    let mut total = 0u64;
    for (mv, nodes) in pos.perft_divide(depth) {
        println!("  {mv}: {nodes}");
        total += nodes;
    }
    let elapsed = start.elapsed();
    let nps = (total as f64 / elapsed.as_secs_f64()) as u64;
    println!("total {total} in {elapsed:.2?} ({nps} nodes/s)");
    ExitCode::SUCCESS
}
