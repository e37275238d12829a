mod common;
mod logic;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hammurabi_game::constants::DEFAULT_TERM_YEARS;
use hammurabi_game::{Game, Turn, TurnRequest, Uprising, seeded_rng};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Read, Write, stdin, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::split_csv;
use logic::seeds::parse_seed;
use logic::{
    SimulationRecord, StrategyAggregate, aggregate_records, resolve_seed_inputs,
    resolve_strategies, run_matrix,
};
use shell::PlayOutcome;

#[derive(Debug, Parser)]
#[command(name = "hammurabi", version)]
#[command(about = "Rule ancient Samaria one year at a time, or let automated rulers do it")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a term interactively
    Play(PlayArgs),
    /// Let automated rulers play full terms and report on them
    Simulate(SimulateArgs),
    /// Resolve a single JSON turn request
    Step(StepArgs),
}

#[derive(Debug, clap::Args)]
struct PlayArgs {
    /// Length of the term in years
    #[arg(short, long, default_value_t = DEFAULT_TERM_YEARS)]
    years: u32,

    /// World seed (decimal, 0x hex, or "random")
    #[arg(long, default_value = "random")]
    seed: String,
}

#[derive(Debug, clap::Args)]
struct SimulateArgs {
    /// Rulers to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    strategies: String,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Length of each term in years
    #[arg(short, long, default_value_t = DEFAULT_TERM_YEARS)]
    years: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct StepArgs {
    /// File holding the request; stdin when absent
    #[arg(long)]
    input: Option<PathBuf>,

    /// World seed (decimal, 0x hex, or "random")
    #[arg(long, default_value = "random")]
    seed: String,

    /// Optional path to write the response instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Play(play) => run_play(&play),
        Command::Simulate(simulate) => run_simulate(&simulate),
        Command::Step(step) => run_step(&step),
    }
}

fn run_play(args: &PlayArgs) -> Result<()> {
    let seed = parse_seed(&args.seed)?;
    let mut game = Game::new(args.years);
    let mut world = seeded_rng(seed);
    let mut input = stdin().lock();
    let mut output = stdout().lock();

    let outcome = shell::play(&mut game, &mut world, &mut input, &mut output)?;
    log::info!("term ended: {outcome:?} (seed {seed}, {} draws)", world.draws());
    if let PlayOutcome::Abandoned { year } = outcome {
        writeln!(output)?;
        writeln!(output, "You abandoned the throne in year {year}.")?;
    }
    Ok(())
}

fn run_simulate(args: &SimulateArgs) -> Result<()> {
    let start_time = Instant::now();
    let strategies = resolve_strategies(&split_csv(&args.strategies))?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;

    if args.report == "console" {
        announce_banner();
    }

    let records = run_matrix(&strategies, &seeds, args.years);
    let aggregates = aggregate_records(&records);
    write_reports(args, &records, &aggregates, start_time)
}

fn announce_banner() {
    println!("{}", "🌾 Hammurabi Automated Rulers".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn write_reports(
    args: &SimulateArgs,
    records: &[SimulationRecord],
    aggregates: &[StrategyAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(
                output_target.writer(),
                args.years,
                records,
                aggregates,
            )?;
        }
        "markdown" => {
            if records.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Hammurabi Simulation Results\n\n_No terms played._"
                )?;
            } else {
                logic::reports::generate_markdown_report(
                    output_target.writer(),
                    records,
                    aggregates,
                )?;
            }
        }
        _ => {
            if records.is_empty() {
                writeln!(&mut output_target, "No terms played.")?;
            } else {
                logic::reports::generate_console_report(
                    output_target.writer(),
                    records,
                    aggregates,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

/// Wire form of a `step` answer: `{"ok": turn}` or `{"error": {...}}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum StepResponse {
    Ok(Turn),
    Error(StepFailure),
}

#[derive(Debug, Serialize)]
struct StepFailure {
    kind: &'static str,
    message: String,
    retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    uprising: Option<Uprising>,
}

fn resolve_step(raw: &str, seed: u64) -> Result<StepResponse> {
    let request: TurnRequest =
        serde_json::from_str(raw).context("failed to parse turn request")?;
    let mut world = seeded_rng(seed);
    let response = match request.resolve(&mut world) {
        Ok(turn) => StepResponse::Ok(turn),
        Err(err) => StepResponse::Error(StepFailure {
            kind: err.kind(),
            message: err.to_string(),
            retryable: err.is_retryable(),
            uprising: err.uprising(),
        }),
    };
    Ok(response)
}

fn run_step(args: &StepArgs) -> Result<()> {
    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    let seed = parse_seed(&args.seed)?;
    let response = resolve_step(&raw, seed)?;

    let mut output_target = OutputTarget::new(args.output.clone())?;
    serde_json::to_writer(output_target.writer(), &response)?;
    writeln!(&mut output_target)?;
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
