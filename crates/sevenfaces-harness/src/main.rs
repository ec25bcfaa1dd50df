#![forbid(unsafe_code)]

//! `sevenfaces-sim`: headless simulation and reproducibility runner.

use chrono::{SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use sevenfaces_harness::{
    reproducibility_report, run_session, PickPolicy, ReproReport, SessionReport,
    DEFAULT_TAP_COUNT,
};

fn main() {
    let exit_code = match run(std::env::args().skip(1).collect()) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error}");
            2
        }
    };
    std::process::exit(exit_code);
}

fn run(args: Vec<String>) -> Result<i32, String> {
    if args.is_empty() {
        return Err(usage());
    }

    match args[0].as_str() {
        "run" => run_sessions(&args[1..]),
        "repro" => run_repro(&args[1..]),
        "help" | "--help" | "-h" => {
            println!("{}", usage());
            Ok(0)
        }
        other => Err(format!("unknown subcommand '{other}'\n\n{}", usage())),
    }
}

fn usage() -> String {
    [
        "sevenfaces-sim usage:",
        "  sevenfaces-sim run --seed <u64> [--sessions <n>] [--taps <n>] [--policy favor-rank|driven]",
        "  sevenfaces-sim repro --seed <u64> [--runs <n>] [--taps <n>] [--policy favor-rank|driven]",
        "",
        "exit codes:",
        "  0   run complete / reproducibility verified",
        "  1   reproducibility check failed",
        "  2   usage error",
    ]
    .join("\n")
}

#[derive(Debug, Clone, Copy)]
struct SimOptions {
    seed: u64,
    count: u32,
    taps: usize,
    policy: PickPolicy,
}

fn parse_options(args: &[String], count_flag: &str) -> Result<SimOptions, String> {
    let mut seed: Option<u64> = None;
    let mut count: u32 = 1;
    let mut taps = DEFAULT_TAP_COUNT;
    let mut policy = PickPolicy::FavorRank;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value_for = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag.as_str() {
            "--seed" => {
                let raw = value_for("--seed")?;
                seed = Some(raw.parse().map_err(|_| format!("invalid seed '{raw}'"))?);
            }
            f if f == count_flag => {
                let raw = value_for(count_flag)?;
                count = raw.parse().map_err(|_| format!("invalid count '{raw}'"))?;
            }
            "--taps" => {
                let raw = value_for("--taps")?;
                taps = raw.parse().map_err(|_| format!("invalid tap count '{raw}'"))?;
            }
            "--policy" => {
                let raw = value_for("--policy")?;
                policy = PickPolicy::parse(&raw).ok_or_else(|| format!("unknown policy '{raw}'"))?;
            }
            other => return Err(format!("unknown flag '{other}'\n\n{}", usage())),
        }
    }

    let seed = seed.ok_or_else(|| format!("--seed is required\n\n{}", usage()))?;
    Ok(SimOptions {
        seed,
        count,
        taps,
        policy,
    })
}

#[derive(Debug, Serialize)]
struct RunArtifact {
    generated_at_utc: String,
    seed: u64,
    policy: PickPolicy,
    sessions: Vec<SessionReport>,
}

fn run_sessions(args: &[String]) -> Result<i32, String> {
    let options = parse_options(args, "--sessions")?;
    // One PRNG across sessions: session n depends on the seed and on how
    // much stream the first n-1 sessions consumed, and nothing else.
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut sessions = Vec::with_capacity(options.count as usize);
    for _ in 0..options.count {
        let report = run_session(&mut rng, options.taps, options.policy)
            .map_err(|error| error.to_string())?;
        sessions.push(report);
    }
    let artifact = RunArtifact {
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        seed: options.seed,
        policy: options.policy,
        sessions,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&artifact).map_err(|error| error.to_string())?
    );
    Ok(0)
}

#[derive(Debug, Serialize)]
struct ReproArtifact {
    generated_at_utc: String,
    seed: u64,
    policy: PickPolicy,
    taps: usize,
    report: ReproReport,
}

fn run_repro(args: &[String]) -> Result<i32, String> {
    let options = parse_options(args, "--runs")?;
    let report = reproducibility_report(
        || StdRng::seed_from_u64(options.seed),
        options.count.max(2),
        options.taps,
        options.policy,
    )
    .map_err(|error| error.to_string())?;

    let reproducible = report.reproducible;
    let artifact = ReproArtifact {
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        seed: options.seed,
        policy: options.policy,
        taps: options.taps,
        report,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&artifact).map_err(|error| error.to_string())?
    );
    Ok(if reproducible { 0 } else { 1 })
}
