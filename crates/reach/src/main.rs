#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions, clippy::missing_const_for_fn)]
#![forbid(unsafe_code)]

use clap::Parser;
use config::Args;
use reach_core::Builder;
use report::Reporter;
use std::process;

mod config;
mod report;

fn main() {
    let args = Args::parse();
    configure_logging(&args);
    if let Err(err) = run(&args) {
        eprintln!("ping error: {err}");
        process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    tracing::debug!(?args);
    let pinger = Builder::new(&args.host)
        .count(args.count)
        .interval(args.interval)
        .timeout(args.timeout)
        .payload_size(args.size)
        .build()?;
    let mut reporter = Reporter::new(pinger.host());
    let stats = pinger.run_with(|outcome| reporter.on_probe(outcome))?;
    reporter.summary(&stats);
    Ok(())
}

fn configure_logging(args: &Args) {
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("reach=trace,reach_core=trace,reach_dns=trace")
            .compact()
            .init();
    }
}
