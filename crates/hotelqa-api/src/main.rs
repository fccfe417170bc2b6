//! hotelqa CLI and REST API entry point.
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the appropriate command handler or starts the REST API
//! server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{AnalyticsCommand, Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,hotelqa=debug",
        _ => "trace",
    };
    hotelqa_observe::tracing_setup::init_tracing(cli.otel, filter)
        .map_err(|e| anyhow::anyhow!(e))?;

    let result = run(cli).await;
    hotelqa_observe::tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "hotelqa", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    match cli.command {
        Commands::BuildIndex => {
            cli::index::build_index(&state, cli.json, cli.quiet).await?;
        }

        Commands::Ask { question, top_k } => {
            cli::ask::ask(&state, &question, top_k, cli.json, cli.quiet).await?;
        }

        Commands::Retrieve { query, top_k } => {
            cli::ask::retrieve(&state, &query, top_k, cli.json).await?;
        }

        Commands::Analytics { action } => match action {
            AnalyticsCommand::Import { file } => {
                cli::analytics::import(&state, &file, cli.json).await?;
            }
            AnalyticsCommand::Set { key, value } => {
                cli::analytics::set(&state, &key, &value, cli.json).await?;
            }
            AnalyticsCommand::List => {
                cli::analytics::list(&state, cli.json).await?;
            }
            AnalyticsCommand::Query { question } => {
                cli::analytics::query(&state, &question, cli.json).await?;
            }
        },

        Commands::Status => {
            cli::status::status(&state, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            // Load the index up front so the first request is fast. The
            // server still starts without one; /ask reports it as not ready.
            match state.knowledge().await {
                Ok(kb) => tracing::info!(records = kb.len(), "knowledge base ready"),
                Err(e) => tracing::warn!(error = %e, "serving without a knowledge base"),
            }

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!(
                    "  {} hotelqa API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
