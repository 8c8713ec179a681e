//! `golden-fuzz` command-line front end.
//!
//! Fuzzes a compiled candidate against a golden oracle, evaluates a single
//! hand-written instance, or prints counting tables. Logs go to stderr and
//! honour `RUST_LOG` (default `info`); results go to stdout.

use std::error::Error;
use std::fmt::{Debug, Write};
use std::io;
use std::process::ExitCode;

use clap::Parser;
use golden_fuzz::harness::{Comparator, Generator, Oracle, Protocol};
use golden_fuzz::problems::{boats, clones, radiation};
use golden_fuzz::{
    Candidate, CountingOracle, FuzzError, FuzzOutcome, Fuzzer, OracleError, RunConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;
use cli::{Cli, Commands, DemoInstance, ProblemKind};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot locate the candidate executable")]
    Locate(#[source] io::Error),
    #[error(transparent)]
    Fuzz(#[from] FuzzError),
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error("cannot render the report")]
    Report(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let mut message = format!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                let _ = write!(message, "\n  caused by: {cause}");
                source = cause.source();
            }
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Run one command; `Ok(false)` means the candidate was caught disagreeing.
fn run(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Fuzz {
            problem,
            run,
            candidate,
            json,
        } => {
            let config = run.config(problem);
            let candidate = candidate.candidate().map_err(CliError::Locate)?;
            match problem {
                ProblemKind::Boats => fuzz(boats::fuzzer(candidate), &config, json),
                ProblemKind::Clones => fuzz(clones::fuzzer(candidate), &config, json),
                ProblemKind::Radiation => fuzz(radiation::fuzzer(candidate), &config, json),
            }
        }
        Commands::Demo {
            instance:
                DemoInstance::Boats {
                    lengths,
                    positions,
                    candidate,
                },
        } => {
            let candidate = candidate.candidate().map_err(CliError::Locate)?;
            let evaluation =
                boats::fuzzer(candidate).evaluate(boats::Boats::new(lengths, positions))?;
            println!("{}", serde_json::to_string_pretty(&evaluation)?);
            Ok(evaluation.agrees)
        }
        Commands::Count {
            slots,
            max_total,
            ordered,
        } => {
            let oracle = if ordered {
                CountingOracle::ordered(slots)
            } else {
                CountingOracle::new(slots)
            };
            for (total, count) in oracle.table(max_total) {
                println!("{total}: {count}");
            }
            Ok(true)
        }
    }
}

fn fuzz<G, O, P, C, X>(
    mut fuzzer: Fuzzer<G, O, P, C, X>,
    config: &RunConfig,
    json: bool,
) -> Result<bool, CliError>
where
    G: Generator,
    G::Instance: Debug + Serialize,
    O: Oracle<G::Instance>,
    O::Output: Debug + Serialize,
    P: Protocol<G::Instance>,
    P::Answer: Debug + Serialize,
    C: Comparator<O::Output, P::Answer>,
    X: Candidate,
{
    let outcome = fuzzer.run(config)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome)?;
    }
    Ok(outcome.divergences.is_empty())
}

fn print_summary<I: Serialize, E: Serialize, A: Serialize>(
    outcome: &FuzzOutcome<I, E, A>,
) -> Result<(), CliError> {
    for divergence in &outcome.divergences {
        println!("{}", serde_json::to_string_pretty(divergence)?);
    }
    println!(
        "{} divergence(s) in {} trial(s), {} skipped, seed {}",
        outcome.divergences.len(),
        outcome.trials_run,
        outcome.skipped,
        outcome.seed
    );
    Ok(())
}
