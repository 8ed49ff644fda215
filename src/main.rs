use chrono::NaiveDate;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payout_console::application::console::{ExportOutcome, PayoutConsole};
use payout_console::config::ConsoleConfig;
use payout_console::domain::export::{ExportFormat, default_filename};
use payout_console::domain::pagination::LoadBatch;
use payout_console::domain::ports::{ExporterBox, RequestStoreBox};
use payout_console::domain::query::{CriteriaUpdate, Filter, SortKey};
use payout_console::domain::request::{PayoutMethod, PayoutRequest, PayoutStatus};
use payout_console::infrastructure::file_exporter::FileExporter;
use payout_console::infrastructure::in_memory::{InMemoryExporter, InMemoryRequestStore};
use payout_console::infrastructure::seed::{REFERENCE_DATE, reference_requests};
use payout_console::interfaces::csv::request_reader::RequestReader;
use payout_console::interfaces::csv::request_writer::RequestWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payout requests CSV file. Uses the built-in reference dataset when omitted.
    input: Option<PathBuf>,

    /// Case-insensitive search over affiliate name, email and request id
    #[arg(long)]
    search: Option<String>,

    /// Status filter: all, pending, approved, processing, completed, rejected
    #[arg(long, default_value = "all")]
    status: Filter<PayoutStatus>,

    /// Method filter: all, bank, upi, paypal, crypto
    #[arg(long, default_value = "all")]
    method: Filter<PayoutMethod>,

    /// Sort key: date, amount, priority
    #[arg(long, default_value = "date")]
    sort: SortKey,

    /// Number of pages to reveal
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Reveal every matching request
    #[arg(long, conflicts_with = "pages")]
    all: bool,

    /// Rows per page
    #[arg(long, default_value_t = 5)]
    page_size: usize,

    /// Approve a pending request (repeatable)
    #[arg(long)]
    approve: Vec<String>,

    /// Reject a pending request (repeatable)
    #[arg(long)]
    reject: Vec<String>,

    /// Approve every pending request matching the filters
    #[arg(long)]
    bulk_approve: bool,

    /// Write a CSV export of the filtered view into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Export format: csv, excel, pdf
    #[arg(long, default_value = "csv")]
    export_format: ExportFormat,

    /// Export filename (defaults to payout-requests-<today>)
    #[arg(long)]
    export_name: Option<String>,

    /// Processing date for "today" stats (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Simulated backend latency in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Print the console view as JSON instead of CSV rows
    #[arg(long)]
    json: bool,
}

fn load_requests(input: Option<&PathBuf>) -> Result<Vec<PayoutRequest>> {
    let Some(path) = input else {
        return reference_requests().into_diagnostic();
    };
    let file = File::open(path).into_diagnostic()?;
    let mut requests = Vec::new();
    for result in RequestReader::new(file).requests() {
        match result {
            Ok(request) => requests.push(request),
            Err(e) => eprintln!("Error reading payout request: {}", e),
        }
    }
    Ok(requests)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "payout_console=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let requests = load_requests(cli.input.as_ref())?;
    let today = match (cli.today, &cli.input) {
        (Some(today), _) => today,
        (None, None) => REFERENCE_DATE,
        (None, Some(_)) => ConsoleConfig::default().today,
    };
    let config = ConsoleConfig::default()
        .with_page_size(cli.page_size)
        .with_latency(Duration::from_millis(cli.latency_ms))
        .with_today(today);

    let store: RequestStoreBox =
        Box::new(InMemoryRequestStore::with_requests(requests).into_diagnostic()?);
    let exporter: ExporterBox = match &cli.export_dir {
        Some(dir) => Box::new(FileExporter::new(dir)),
        None => Box::new(InMemoryExporter::new()),
    };
    let console = PayoutConsole::new(store, exporter, config);

    console
        .update_criteria(CriteriaUpdate {
            search_query: cli.search.clone(),
            status_filter: Some(cli.status),
            method_filter: Some(cli.method),
            sort_key: Some(cli.sort),
        })
        .await
        .into_diagnostic()?;

    for id in &cli.approve {
        console.request_approve(id).await.into_diagnostic()?;
        if let Err(e) = console.confirm().await {
            eprintln!("Error approving {}: {}", id, e);
        }
    }
    for id in &cli.reject {
        console.request_reject(id).await.into_diagnostic()?;
        if let Err(e) = console.confirm().await {
            eprintln!("Error rejecting {}: {}", id, e);
        }
    }
    if cli.bulk_approve && console.select_all().await.into_diagnostic()? > 0 {
        console.request_bulk_approve().await.into_diagnostic()?;
        let report = console.confirm().await.into_diagnostic()?;
        for skipped in report.skipped {
            eprintln!("Skipped {}: {:?}", skipped.id, skipped.reason);
        }
    }

    if cli.all {
        console.jump_to_end().await.into_diagnostic()?;
    } else {
        for _ in 1..cli.pages {
            console.load_more(LoadBatch::Five).await.into_diagnostic()?;
        }
    }

    let view = console.view().await.into_diagnostic()?;
    let stdout = io::stdout();
    if cli.json {
        serde_json::to_writer_pretty(stdout.lock(), &view).into_diagnostic()?;
        println!();
    } else {
        let mut writer = RequestWriter::new(stdout.lock());
        writer.write_requests(&view.visible).into_diagnostic()?;
    }

    if cli.export_dir.is_some() {
        let filename = cli
            .export_name
            .clone()
            .unwrap_or_else(|| default_filename(today));
        console
            .prepare_export(cli.export_format, &filename)
            .await
            .into_diagnostic()?;
        if let ExportOutcome::Delivered(receipt) =
            console.commit_export().await.into_diagnostic()?
        {
            eprintln!(
                "Exported {} payout requests to {}",
                receipt.record_count,
                receipt.location.display()
            );
        }
    }

    console.close().await;
    Ok(())
}
