//! `trainwatch-trainer` -- simulated training run with metrics reporting.
//!
//! Runs a fixed number of synthetic epochs, pushes each epoch's metrics to
//! a Prometheus Pushgateway, and serves `GET /health` while the run is in
//! flight. See [`trainwatch_trainer::config`] for the environment
//! variables it reads.
//!
//! Exit codes: `0` completed, `1` failed or invalid configuration, `130`
//! interrupted by SIGINT/SIGTERM.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trainwatch_core::summary::RunSummary;
use trainwatch_trainer::{config, Trainer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "trainwatch_trainer=info,trainwatch_pushgateway=info,trainwatch_status=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model_name = %config.model_name,
        total_epochs = config.total_epochs,
        status_port = config.status_port,
        gateway_url = %config.gateway_url,
        "Loaded configuration",
    );

    let trainer = match Trainer::from_config(config) {
        Ok(trainer) => trainer,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up metrics gateway client");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    let summary = trainer.run(cancel).await;
    print_results(&summary);

    std::process::exit(summary.status.exit_code());
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
///
/// If a handler cannot be installed that signal is simply never observed.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
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
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), stopping run");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping run");
        }
    }
}

fn print_results(summary: &RunSummary) {
    let rule = "=".repeat(50);
    println!("\n{rule}");
    println!("TRAINING RESULTS");
    println!("{rule}");
    println!("MODEL_NAME: {}", summary.model_name);
    println!("STATUS: {}", summary.status.as_str());
    println!("TOTAL_EPOCHS: {}", summary.total_epochs);
    println!("EPOCHS_COMPLETED: {}", summary.epochs_completed);
    println!("TRAINING_TIME_SECONDS: {}", summary.training_time_seconds);
    if let Some(v) = summary.final_accuracy {
        println!("FINAL_ACCURACY: {v}");
    }
    if let Some(v) = summary.best_accuracy {
        println!("BEST_ACCURACY: {v}");
    }
    if let Some(v) = summary.final_loss {
        println!("FINAL_LOSS: {v}");
    }
    if let Some(e) = &summary.error {
        println!("ERROR: {e}");
    }
    println!("{rule}");
}
