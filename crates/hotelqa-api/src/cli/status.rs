//! System status command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display data directory, dataset, index, database, and model settings.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let dataset = state.dataset_path();
    let dataset_present = tokio::fs::try_exists(&dataset).await.unwrap_or(false);
    let index_present = state.index_store.exists();
    let database_ok = state.db_pool.ping().await.is_ok();
    let analytics_count = state
        .analytics_service
        .entries()
        .await
        .map(|entries| entries.len())
        .unwrap_or(0);

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "dataset": {
                "path": dataset.display().to_string(),
                "present": dataset_present,
            },
            "index": {
                "dir": state.index_store.dir().display().to_string(),
                "present": index_present,
            },
            "database": if database_ok { "connected" } else { "unreachable" },
            "analytics_values": analytics_count,
            "llm": {
                "provider": state.config.llm.provider_name,
                "base_url": state.config.llm.base_url,
                "model": state.composer.model(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    let check = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };

    println!();
    println!(
        "  {} hotelqa v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    println!("  {}", style("── Data ──").dim());
    println!("  {} Dataset  {}", check(dataset_present), style(dataset.display()).dim());
    println!(
        "  {} Index    {}",
        check(index_present),
        style(state.index_store.dir().display()).dim()
    );
    if !index_present {
        println!("    Run {} to create it.", style("hotelqa build-index").yellow());
    }
    println!();

    println!("  {}", style("── Analytics ──").dim());
    println!("  {} Database (SQLite, WAL mode)", check(database_ok));
    println!("  Stored values: {}", style(analytics_count).bold());
    println!();

    println!("  {}", style("── Generation ──").dim());
    println!("  Provider: {}", state.config.llm.provider_name);
    println!("  Endpoint: {}", style(&state.config.llm.base_url).dim());
    println!("  Model:    {}", state.composer.model());
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir: {}", style(state.data_dir.display()).dim());
    println!();

    Ok(())
}
