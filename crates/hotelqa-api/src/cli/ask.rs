//! `hotelqa ask` and `hotelqa retrieve`.

use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use hotelqa_core::answer::AnswerKind;

use crate::state::AppState;

fn thinking_spinner(message: &str, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    Ok(spinner)
}

/// Answer a question and print the result.
pub async fn ask(
    state: &AppState,
    question: &str,
    top_k: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let question = question.trim();
    anyhow::ensure!(!question.is_empty(), "question must not be empty");
    let top_k = top_k.unwrap_or(state.config.retrieval.ask_top_k).max(1);

    let spinner = thinking_spinner("thinking...", json || quiet)?;
    let (answer, retrieval) = state.ask(question, top_k).await?;
    spinner.finish_and_clear();

    if json {
        let out = serde_json::json!({
            "question": question,
            "answer": answer.text,
            "kind": answer.kind,
            "retrieved": retrieval.len(),
            "filter_key": retrieval.filter_key,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if quiet {
        println!("{}", answer.text);
        return Ok(());
    }

    let label = match answer.kind {
        AnswerKind::Direct(intent) => style(format!("direct: {intent}")).green(),
        AnswerKind::Generated => style("generated".to_string()).cyan(),
        AnswerKind::NoData | AnswerKind::NoPeriodData => style("no data".to_string()).yellow(),
        AnswerKind::SchemaError | AnswerKind::GenerationFailed => {
            style("error".to_string()).red()
        }
    };

    println!();
    println!("  {}", answer.text);
    println!();
    println!(
        "  {}",
        style(format!("[{label}] from {} retrieved records", retrieval.len())).dim()
    );
    println!();

    Ok(())
}

/// Print the records retrieved for a query.
pub async fn retrieve(state: &AppState, query: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let top_k = top_k.unwrap_or(state.config.retrieval.default_top_k).max(1);

    let retrieval = state.retrieve(query, top_k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&retrieval)?);
        return Ok(());
    }

    if retrieval.is_empty() {
        println!();
        println!("  {}", style("No records retrieved.").dim());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").fg(Color::White),
            Cell::new("Hotel").fg(Color::White),
            Cell::new("Month").fg(Color::White),
            Cell::new("Room").fg(Color::White),
            Cell::new("Country").fg(Color::White),
            Cell::new("ADR").fg(Color::White),
            Cell::new("Revenue").fg(Color::White),
        ]);

    for (rank, record) in retrieval.records.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1).fg(Color::DarkGrey),
            Cell::new(&record.hotel).fg(Color::Cyan),
            Cell::new(&record.year_month),
            Cell::new(&record.reserved_room_type),
            Cell::new(&record.country),
            Cell::new(format!("{:.2}", record.adr)),
            Cell::new(format!("{:.2}", record.revenue)),
        ]);
    }

    println!();
    println!("{table}");
    if let Some(key) = &retrieval.filter_key {
        let note = if retrieval.fell_back {
            format!("  filtered to {key} (full-corpus fallback)")
        } else {
            format!("  filtered to {key}")
        };
        println!("{}", style(note).dim());
    }
    println!();

    Ok(())
}
