//! `hotelqa build-index`: embed the dataset and persist the index.

use std::time::{Duration, Instant};

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state::AppState;

pub async fn build_index(state: &AppState, json: bool, quiet: bool) -> Result<()> {
    let start = Instant::now();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Loading dataset and embedding model...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let corpus = state.load_dataset().await?;
    state.embedder().await?;
    spinner.finish_and_clear();

    let bar = if json || quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(corpus.len() as u64)
    };
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} records ({eta})")?
            .progress_chars("=> "),
    );

    let kb = state
        .rebuild_index_from(corpus, |done| bar.set_position(done as u64))
        .await?;
    bar.finish_and_clear();

    if json {
        let out = serde_json::json!({
            "records": kb.len(),
            "dimension": kb.index().dimension(),
            "index_dir": state.index_store.dir().display().to_string(),
            "elapsed_ms": start.elapsed().as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    if quiet {
        return Ok(());
    }

    println!();
    println!("  {} Index built", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Records:").bold(), kb.len());
    println!("  {}  {}", style("Dimension:").bold(), kb.index().dimension());
    println!(
        "  {}  {}",
        style("Stored in:").bold(),
        style(state.index_store.dir().display()).dim()
    );
    println!(
        "  {}  {:.1}s",
        style("Elapsed:").bold(),
        start.elapsed().as_secs_f64()
    );
    println!();

    Ok(())
}
