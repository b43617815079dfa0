use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use parascan::{ScanConfig, ScanEngine};

#[derive(Parser, Debug)]
#[command(name = "parascan", about = "Parallel prefix-sum demonstration driver")]
struct Cli {
    /// Number of input elements.
    #[arg(long, default_value_t = 100_000_000)]
    len: usize,

    /// Fan-out cutoff: tree levels below this depth fork a task for
    /// their left subtree (at most 2^depth concurrent tasks).
    #[arg(long, default_value_t = ScanConfig::DEFAULT_PARALLEL_DEPTH)]
    parallel_depth: usize,

    /// Verify element by element against a sequential scan instead of
    /// the closed form (allocates a second pass over the output).
    #[arg(long)]
    sequential_check: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = ScanConfig {
        parallel_depth: cli.parallel_depth,
    };

    // Demonstration workload: [10, 1, 1, ...], whose prefix sums are
    // the arithmetic sequence 10, 11, 12, ...
    let mut data = vec![1u64; cli.len];
    if let Some(first) = data.first_mut() {
        *first = 10;
    }
    let mut prefix = vec![0u64; cli.len];

    let start = Instant::now();
    let engine = ScanEngine::with_config(&data, config).context("building the scan tree failed")?;
    engine.compute(&mut prefix).context("down-sweep failed")?;
    let elapsed = start.elapsed();

    if cli.sequential_check {
        verify_sequential(&data, &prefix)?;
    } else {
        verify_closed_form(&prefix)?;
    }

    println!(
        "scanned {} elements with up to {} tasks in {:.3} ms (total = {})",
        cli.len,
        config.max_tasks(),
        elapsed.as_secs_f64() * 1e3,
        engine.total(),
    );

    Ok(())
}

fn verify_closed_form(prefix: &[u64]) -> Result<()> {
    let mut expected = 10u64;
    for (idx, &value) in prefix.iter().enumerate() {
        ensure!(
            value == expected,
            "mismatch at index {idx}: got {value}, expected {expected}"
        );
        expected += 1;
    }
    Ok(())
}

fn verify_sequential(data: &[u64], prefix: &[u64]) -> Result<()> {
    let mut running = 0u64;
    for (idx, (&x, &scanned)) in data.iter().zip(prefix).enumerate() {
        running += x;
        ensure!(
            scanned == running,
            "mismatch at index {idx}: got {scanned}, expected {running}"
        );
    }
    Ok(())
}
