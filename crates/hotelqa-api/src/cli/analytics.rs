//! `hotelqa analytics`: import, set, list, and query precomputed values.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use hotelqa_types::analytics::AnalyticsKey;

use crate::http::handlers::analytics::QUERY_NOT_RECOGNIZED;
use crate::state::AppState;

/// Flatten a JSON object into opaque string values.
///
/// Strings are stored verbatim; numbers and other values keep their JSON
/// rendering.
pub fn flatten_values(value: serde_json::Value) -> Result<BTreeMap<String, String>> {
    let serde_json::Value::Object(map) = value else {
        anyhow::bail!("analytics file must contain a JSON object of key/value pairs");
    };
    Ok(map
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

pub async fn import(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let raw = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let parsed: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", file.display()))?;

    let summary = state.analytics_service.import(flatten_values(parsed)?).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Imported {} analytics values",
        style("✓").green().bold(),
        style(summary.stored).bold()
    );
    if !summary.skipped.is_empty() {
        println!(
            "  {} Skipped unknown keys: {}",
            style("!").yellow().bold(),
            summary.skipped.join(", ")
        );
    }
    println!();
    Ok(())
}

pub async fn set(state: &AppState, key: &str, value: &str, json: bool) -> Result<()> {
    let key: AnalyticsKey = key.parse().map_err(|e: String| {
        let valid: Vec<&str> = AnalyticsKey::ALL.iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!("{e} (expected one of: {})", valid.join(", "))
    })?;

    let entry = state.analytics_service.set(key, value).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entry)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} = {}",
        style("✓").green().bold(),
        style(&entry.key).cyan(),
        entry.value
    );
    println!();
    Ok(())
}

pub async fn list(state: &AppState, json: bool) -> Result<()> {
    if json {
        let snapshot = state.analytics_service.snapshot().await?;
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let entries = state.analytics_service.entries().await?;
    if entries.is_empty() {
        println!();
        println!(
            "  {} Run {} to load values.",
            style("No analytics stored.").dim(),
            style("hotelqa analytics import <file>").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Key").fg(Color::White),
            Cell::new("Value").fg(Color::White),
            Cell::new("Updated").fg(Color::White),
        ]);

    for entry in &entries {
        table.add_row(vec![
            Cell::new(&entry.key).fg(Color::Cyan),
            Cell::new(&entry.value),
            Cell::new(entry.updated_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

pub async fn query(state: &AppState, question: &str, json: bool) -> Result<()> {
    let Some((key, value)) = state.analytics_service.query(question).await? else {
        anyhow::bail!(QUERY_NOT_RECOGNIZED);
    };

    if json {
        let out = BTreeMap::from([(key.as_str(), value)]);
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!("  {}  {}", style(format!("{key}:")).bold(), value);
    println!();
    Ok(())
}
