//! One-shot CLI commands over the same state the API serves.

use std::io::Write;

use uuid::Uuid;

use ozone_api::AppState;
use ozone_assistant::Conversation;
use ozone_core::error::{OzoneError, Result};
use ozone_core::types::{LifestyleInput, Tip};
use ozone_estimator::{compare, render_text_report};
use ozone_seasonal::{current_month, month_name, tips_for_month, Season};

use crate::cli::PlanAction;

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| OzoneError::InvalidInput(format!("Invalid history id: {}", raw)))
}

pub fn estimate(
    state: &AppState,
    device: &str,
    input: &LifestyleInput,
    save: bool,
    out: &mut impl Write,
) -> Result<()> {
    let result = state.estimator.estimate(input);
    write!(out, "{}", render_text_report(&result))?;

    let comparison = compare(&result);
    writeln!(out, "\nAnnualized: {} kg CO2", comparison.annual_kg)?;
    for benchmark in &comparison.benchmarks {
        writeln!(
            out,
            "  {:.0}% of the {} average ({} t/year)",
            benchmark.ratio * 100.0,
            benchmark.region,
            benchmark.average_kg_per_year / 1000.0
        )?;
    }

    if save {
        let entry = state.history.append(device, &result)?;
        writeln!(out, "\nSaved as {}", entry.id)?;
    }
    Ok(())
}

pub fn history(
    state: &AppState,
    device: &str,
    delete: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    if let Some(raw) = delete {
        let id = parse_id(raw)?;
        if !state.history.remove(device, id)? {
            return Err(OzoneError::NotFound(format!("History entry {}", id)));
        }
        writeln!(out, "Deleted {}", id)?;
        return Ok(());
    }

    let entries = state.history.load(device)?;
    if entries.is_empty() {
        writeln!(out, "No saved calculations.")?;
        return Ok(());
    }
    for entry in entries {
        writeln!(
            out,
            "{}  {}  {:>8} kg CO2",
            entry.id,
            entry.result.timestamp.format("%Y-%m-%d %H:%M"),
            entry.result.total
        )?;
    }
    Ok(())
}

pub fn report(state: &AppState, device: &str, raw_id: &str, out: &mut impl Write) -> Result<()> {
    let id = parse_id(raw_id)?;
    let entry = state
        .history
        .get(device, id)?
        .ok_or_else(|| OzoneError::NotFound(format!("History entry {}", id)))?;
    write!(out, "{}", render_text_report(&entry.result))?;
    Ok(())
}

fn write_tip(out: &mut impl Write, tip: &Tip) -> Result<()> {
    writeln!(
        out,
        "[{}] {} ({}, {:?} priority)\n    {}",
        tip.id, tip.title, tip.category, tip.priority, tip.description
    )?;
    Ok(())
}

pub fn tips(month: Option<u32>, out: &mut impl Write) -> Result<()> {
    let month = month.unwrap_or_else(current_month);
    let tips = tips_for_month(month)?;
    writeln!(
        out,
        "{} tips for {}:",
        Season::from_month(month)?,
        month_name(month)?
    )?;
    for tip in &tips {
        write_tip(out, tip)?;
    }
    Ok(())
}

pub fn plan(
    state: &AppState,
    device: &str,
    action: Option<PlanAction>,
    out: &mut impl Write,
) -> Result<()> {
    match action.unwrap_or(PlanAction::List) {
        PlanAction::List => {
            let tips = state.plan.list(device)?;
            if tips.is_empty() {
                writeln!(out, "Your plan is empty.")?;
            }
            for tip in &tips {
                write_tip(out, tip)?;
            }
        }
        PlanAction::Add { tip_id } => {
            if state.plan.add(device, &tip_id)? {
                writeln!(out, "Added {} to your plan.", tip_id)?;
            } else {
                writeln!(out, "{} is already in your plan.", tip_id)?;
            }
        }
        PlanAction::Remove { tip_id } => {
            if !state.plan.remove(device, &tip_id)? {
                return Err(OzoneError::NotFound(format!("Tip {} in plan", tip_id)));
            }
            writeln!(out, "Removed {} from your plan.", tip_id)?;
        }
    }
    Ok(())
}

pub async fn chat(state: &AppState, message: &str, out: &mut impl Write) -> Result<()> {
    let mut conversation = Conversation::new(state.config.assistant.greeting.clone());
    let Some(reply) = conversation.ask(&state.assistant, message).await else {
        return Err(OzoneError::InvalidInput("message is empty".to_string()));
    };

    if reply.is_degraded() {
        tracing::warn!(source = ?reply.source, "Assistant answered offline");
    }
    writeln!(out, "{}", reply.text)?;
    Ok(())
}
