//! Headless simulation: `headless [--seed N] [--frames N] [--policy idle|random]`
//!
//! Prints the final observation as one JSON line on stdout and a summary
//! on stderr.

use anyhow::Result;

use srs_tetris::config::parse_headless_args;
use srs_tetris::headless::run_headless;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_headless_args(&args)?;

    eprintln!(
        "[Headless] seed={} frames={} policy={}",
        args.seed,
        args.frames,
        args.policy.as_str()
    );

    let report = run_headless(&args);
    let obs = &report.observation;
    println!("{}", obs.to_json()?);

    eprintln!(
        "[Headless] ran {} frames, {} actions applied; score={} lines={} level={}{}",
        report.frames,
        report.actions_applied,
        obs.score,
        obs.lines,
        obs.level,
        if obs.game_over { " (game over)" } else { "" }
    );
    Ok(())
}
