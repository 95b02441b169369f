//! Benefactor CLI and web server entry point.
//!
//! Binary name: `bnfc`
//!
//! Parses CLI arguments, initializes tracing, database and services, then
//! dispatches to the command handler or starts the web server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use benefactor_observe::tracing_setup::{init_tracing, otel_requested, shutdown_tracing, LogFormat};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn,benefactor=info,tower_http=info",
        1 => "info,benefactor=debug,tower_http=debug",
        _ => "trace",
    };
    let format = match &cli.command {
        Commands::Serve { json_logs: true, .. } => LogFormat::Json,
        _ => LogFormat::Pretty,
    };
    init_tracing(format, otel_requested(), filter)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "bnfc", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { port, host, .. } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(%addr, data_dir = %state.data_dir.display(), "server listening");
            if !cli.quiet {
                println!(
                    "  {} {} listening on {}",
                    console::style("⚡").bold(),
                    state.config.site_name,
                    console::style(format!("http://{addr}/donate")).cyan()
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

        Commands::Fields { email } => {
            cli::fields::show_fields(&state, email.as_deref(), cli.json).await?;
        }

        Commands::Donor { action } => {
            cli::donor::handle_donor_command(action, &state, cli.json).await?;
        }

        Commands::Session { action } => {
            cli::session::handle_session_command(action, &state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
