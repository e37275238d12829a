use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::simulation::{RunOutcome, SimulationRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    years: u32,
    records: &'a [SimulationRecord],
    aggregates: &'a [StrategyAggregate],
}

fn outcome_label(outcome: RunOutcome) -> &'static str {
    match outcome {
        RunOutcome::Served => "served",
        RunOutcome::Overthrown => "overthrown",
        RunOutcome::Refused => "refused",
    }
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[SimulationRecord],
    aggregates: &[StrategyAggregate],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📜 Simulation Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;
    writeln!(out, "Total terms: {}", records.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for aggregate in aggregates {
        writeln!(out, "{}", aggregate.strategy.label().bold())?;
        writeln!(
            out,
            "   Served: {}  Overthrown: {}  Refused: {}",
            aggregate.served.to_string().green(),
            aggregate.overthrown.to_string().red(),
            aggregate.refused.to_string().yellow()
        )?;
        writeln!(
            out,
            "   Survival rate: {:.1}%",
            aggregate.survival_rate * 100.0
        )?;
        writeln!(
            out,
            "   Mean years ruled: {:.1}  population: {:.1}  acres: {:.1}  bushels: {:.1}",
            aggregate.mean_years_ruled,
            aggregate.mean_population,
            aggregate.mean_lands,
            aggregate.mean_bushels
        )?;
        writeln!(out)?;
    }

    let overthrown: Vec<&SimulationRecord> = records
        .iter()
        .filter(|r| r.outcome == RunOutcome::Overthrown)
        .collect();
    if !overthrown.is_empty() {
        writeln!(out, "{}", "🔥 Uprisings".bright_red().bold())?;
        for record in overthrown {
            if let Some(uprising) = record.uprising {
                writeln!(
                    out,
                    "   • {} seed {}: year {}, {} starved ({:.2}%)",
                    record.strategy,
                    record.seed,
                    uprising.year,
                    uprising.people_starved,
                    uprising.percentage
                )?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    years: u32,
    records: &[SimulationRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        years,
        records,
        aggregates,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[SimulationRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Hammurabi Simulation Results\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "| Strategy | Terms | Served | Overthrown | Refused | Survival | Mean population |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {:.1}% | {:.1} |",
            aggregate.strategy,
            aggregate.runs,
            aggregate.served,
            aggregate.overthrown,
            aggregate.refused,
            aggregate.survival_rate * 100.0,
            aggregate.mean_population
        )?;
    }

    writeln!(out, "\n## Terms\n")?;
    for record in records {
        let status = if record.outcome == RunOutcome::Served {
            "✅"
        } else {
            "❌"
        };
        writeln!(
            out,
            "- {status} **{}** seed `{}`: {} after {} years, {} people, {} acres, {} bushels",
            record.strategy,
            record.seed,
            outcome_label(record.outcome),
            record.years_ruled,
            record.final_state.population,
            record.final_state.lands,
            record.final_state.bushels
        )?;
    }
    Ok(())
}
