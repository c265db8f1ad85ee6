use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_admin::{
    config::Config,
    dataset::Dataset,
    errors::{AppError, AppResult},
    persistence::PersistenceService,
    pipeline::{DatasetGate, PipelineCoordinator},
    report::{Pricing, render_html, render_printable, render_summary},
    utils::sample_dataset,
};

#[derive(Parser)]
#[command(name = "cinema-admin")]
#[command(version = "0.1.0")]
#[command(about = "Cinema administration records with a load/edit/report pipeline")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "cinema-admin.toml")]
    config: String,

    /// Data directory (overrides config file)
    #[arg(short = 'd', long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    /// Start from the built-in sample dataset
    #[arg(long, conflicts_with_all = ["from_text", "from_markup"])]
    seed: bool,

    /// Start from a delimited-text snapshot
    #[arg(long, value_name = "PATH", conflicts_with = "from_markup")]
    from_text: Option<PathBuf>,

    /// Start from the markup snapshot in the data directory
    #[arg(long)]
    from_markup: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the loader, editor and reporter stages and print the run report
    Pipeline,

    /// Write the dataset as a delimited-text snapshot
    ExportText {
        /// Output file (defaults to the configured text snapshot)
        path: Option<PathBuf>,
    },

    /// Write the dataset as markup snapshots, one file per record kind
    ExportMarkup,

    /// Render a report (HTML unless another format is chosen)
    Report {
        /// Render the printable PDF report
        #[arg(long, conflicts_with = "summary")]
        printable: bool,

        /// Print the plain-text summary instead of writing a file
        #[arg(long)]
        summary: bool,
    },

    /// Print per-kind record counts
    Counts,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("cinema_admin={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cinema-admin v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(data_dir) = cli.data_dir.clone() {
        config.storage.data_dir = data_dir;
    }

    let persistence = PersistenceService::new(config.storage.clone());
    let dataset = initial_dataset(&cli, &persistence).await?;
    info!("Dataset ready ({})", dataset.counts());

    match cli.command {
        Command::Pipeline => {
            let coordinator = PipelineCoordinator::new(DatasetGate::new(dataset), config);
            let handle = coordinator.start_pipeline()?;
            let cancel = handle_cancel_on_ctrl_c(&handle);

            let execution = handle.wait().await?;
            cancel.abort();

            println!("{}", serde_json::to_string_pretty(&execution)?);
            if !execution.is_success() {
                warn!("Pipeline run {} did not complete cleanly", execution.id);
            }
        }
        Command::ExportText { path } => {
            let path = path.unwrap_or_else(|| config.storage.text_snapshot_path());
            let counts = persistence.export_text(&dataset, &path).await?;
            println!("{counts}");
        }
        Command::ExportMarkup => {
            let counts = persistence.export_markup(&dataset).await?;
            println!("{counts}");
        }
        Command::Report { printable, summary } => {
            let pricing = Pricing::from(&config.report);
            let now = Utc::now();
            if summary {
                print!("{}", render_summary(&dataset, now, &pricing));
            } else if printable {
                let path = config.storage.printable_report_path();
                write_report(&path, render_printable(&dataset, now, &pricing)).await?;
            } else {
                let path = config.storage.html_report_path();
                write_report(&path, render_html(&dataset, now)).await?;
            }
        }
        Command::Counts => {
            println!("{}", dataset.counts());
        }
    }

    Ok(())
}

async fn initial_dataset(cli: &Cli, persistence: &PersistenceService) -> AppResult<Dataset> {
    let mut dataset = Dataset::new();

    if cli.seed {
        dataset = sample_dataset();
    } else if let Some(path) = &cli.from_text {
        let summary = persistence.import_text(path, &mut dataset).await?;
        if summary.skipped_lines > 0 {
            warn!("Skipped {} malformed line(s) in {}", summary.skipped_lines, path.display());
        }
    } else if cli.from_markup {
        persistence.import_markup(&mut dataset).await.into_result()?;
    }

    Ok(dataset)
}

async fn write_report(path: &Path, contents: impl AsRef<[u8]>) -> AppResult<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::report(format!("failed to write {}: {e}", path.display())))?;
    info!("Report written to {}", path.display());
    println!("{}", path.display());
    Ok(())
}

/// Cancel the run on Ctrl-C. The returned task is aborted once the run ends.
fn handle_cancel_on_ctrl_c(
    handle: &cinema_admin::pipeline::PipelineHandle,
) -> tokio::task::JoinHandle<()> {
    let run_id = handle.run_id();
    let token = handle.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling pipeline run {}", run_id);
            token.cancel();
        }
    })
}
