use anyhow::{bail, Context};
use clap::Parser;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use perf_mastermind::{
    BaselineChoice, CandidateOrder, Code, FallbackTrigger, Oracle, SecretCode, Solver,
    SolverConfig, MAX_LEN,
};

use std::cmp::Reverse;
use std::io::{self, BufRead, Write};
use std::time::Instant;

/// Filter used when `RUST_LOG` is unset; shows the oracle's notice for every
/// solved secret.
const DEFAULT_LOG: &str = "info";

/// Measure how many oracle queries each way of solving needs.
///
/// Secrets are read from stdin, one per line, unless `--random` is given.
/// Logging defaults to `RUST_LOG=info`; `RUST_LOG=warn` keeps only failures.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// Solve N random secrets instead of reading stdin.
    #[clap(long, value_name = "N")]
    random: Option<usize>,
    /// Length of random secrets; random in 1..=18 when omitted.
    #[clap(long)]
    length: Option<usize>,
    /// Seed for random secrets.
    #[clap(long, default_value = "0")]
    seed: u64,
    /// Strategy to run; may be repeated. Runs all of them by default.
    #[clap(long = "strategy", value_name = "NAME")]
    strategies: Vec<String>,
    /// Most arrangements the fallback may try.
    #[clap(long, default_value = "20")]
    fallback_cap: usize,
    /// Write `<strategy>.txt` listing secrets from hardest to easiest.
    #[clap(long)]
    report: bool,
}

/// Every named configuration the driver knows.
fn strategies(fallback_cap: usize) -> Vec<(&'static str, SolverConfig)> {
    let differential = SolverConfig {
        fallback_cap,
        ..SolverConfig::default()
    };
    vec![
        ("differential", differential),
        (
            "alphabet",
            SolverConfig {
                baseline: BaselineChoice::FirstSymbol,
                order: CandidateOrder::Alphabet,
                ..differential
            },
        ),
        (
            "multiset",
            SolverConfig {
                fallback: FallbackTrigger::MultisetFirst,
                ..differential
            },
        ),
    ]
}

fn describe_strategy(
    desc: &str,
    solver: &Solver,
    secrets: &[Code],
    report: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    println!("Strategy '{}':", desc);
    debug!("{:?}", solver.config());

    let mut scores = Vec::<(&Code, u64)>::new();
    let mut failures = 0;

    for secret in secrets {
        let mut oracle = SecretCode::from_code(secret)?;
        match solver.solve(&mut oracle) {
            Ok(found) if &found == secret => scores.push((secret, oracle.queries())),
            Ok(found) => {
                warn!("{}: answered {}", secret, found);
                failures += 1;
            }
            Err(err) => {
                warn!("{}: {}", secret, err);
                failures += 1;
            }
        }
    }

    if !scores.is_empty() {
        let total_queries: u64 = scores.iter().map(|&(_, queries)| queries).sum();
        println!(
            "  Average # of queries: {}",
            (total_queries as f64) / (scores.len() as f64)
        );
    }
    println!("  Failures: {}", failures);

    scores.sort_by_key(|&(_, queries)| Reverse(queries));
    if let Some((secret, queries)) = scores.first() {
        println!("  Hardest secret: {} ({} queries)", secret, queries);
    }

    if report {
        let path = format!("{}.txt", desc);
        let mut file = std::fs::File::create(&path)
            .with_context(|| format!("creating report '{}'", path))?;
        for (secret, queries) in &scores {
            writeln!(&mut file, "{} {}", queries, secret)?;
        }
        println!("  Wrote report to file '{}'.", path);
    }

    println!("  Completed in {:.3?}.", start.elapsed());
    Ok(())
}

fn read_secrets() -> anyhow::Result<Vec<Code>> {
    let stdin = io::stdin();
    let stdin = stdin.lock();

    let mut secrets = Vec::new();
    for (i, line) in stdin.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let secret = line
            .parse::<Code>()
            .with_context(|| format!("line {}", i + 1))?;
        secrets.push(secret);
    }
    Ok(secrets)
}

fn random_secrets(count: usize, length: Option<usize>, seed: u64) -> Vec<Code> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let len = length.unwrap_or_else(|| rng.gen_range(1, MAX_LEN + 1));
            SecretCode::random_code(len, &mut rng)
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG))
        .init();
    let args = Args::parse();

    if let Some(len) = args.length {
        if len == 0 || len > MAX_LEN {
            bail!("--length must be in 1..={}", MAX_LEN);
        }
    }

    let secrets = match args.random {
        Some(count) => random_secrets(count, args.length, args.seed),
        None => read_secrets()?,
    };

    let mut selected = strategies(args.fallback_cap);
    if !args.strategies.is_empty() {
        for name in &args.strategies {
            if !selected.iter().any(|(desc, _)| *desc == name.as_str()) {
                bail!("unknown strategy '{}'", name);
            }
        }
        selected.retain(|(desc, _)| args.strategies.iter().any(|name| name.as_str() == *desc));
    }

    for (desc, config) in selected {
        describe_strategy(desc, &Solver::new(config), &secrets, args.report)?;
    }
    Ok(())
}
