//! `taxon-diff`: compare two IBDF exports and write the delta.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use uuid::Uuid;

use taxon_core::errors::TaxonErrorCode;
use taxon_core::models::Status;
use taxon_core::tracing_setup::init_tracing_with_config;
use taxon_core::TaxonConfig;
use taxon_differ::{DiffJob, DiffOptions};
use taxon_ibdf::ExternalStamp;

#[derive(Parser, Debug)]
#[command(name = "taxon-diff", about = "Diff two IBDF exports into an importable delta", version)]
struct Args {
    /// Baseline export
    old: PathBuf,

    /// Export to compare against the baseline
    new: PathBuf,

    /// Delta output file
    #[arg(short, long, default_value = "delta.ibdf")]
    out: PathBuf,

    /// Directory for summary and per-class UUID lists
    #[arg(long)]
    analysis_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "TAXON_CONFIG")]
    config: Option<PathBuf>,

    /// Time of the inactivating versions, epoch millis (default: now)
    #[arg(long)]
    retire_time: Option<i64>,

    #[arg(long, default_value_t = Uuid::nil())]
    retire_author: Uuid,

    #[arg(long, default_value_t = Uuid::nil())]
    retire_module: Uuid,

    #[arg(long, default_value_t = Uuid::nil())]
    retire_path: Uuid,

    #[arg(long)]
    ignore_status: bool,

    #[arg(long)]
    ignore_time: bool,

    #[arg(long)]
    ignore_author: bool,

    #[arg(long)]
    ignore_module: bool,

    #[arg(long)]
    ignore_path: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn options(&self) -> DiffOptions {
        let mut options = DiffOptions::new(ExternalStamp {
            status: Status::Inactive,
            time: self
                .retire_time
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
            author: self.retire_author,
            module: self.retire_module,
            path: self.retire_path,
        });
        if self.ignore_status {
            options = options.ignoring_status();
        }
        if self.ignore_time {
            options = options.ignoring_time();
        }
        if self.ignore_author {
            options = options.ignoring_author();
        }
        if self.ignore_module {
            options = options.ignoring_module();
        }
        if self.ignore_path {
            options = options.ignoring_path();
        }
        options
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match TaxonConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("taxon-diff: {e}");
                return ExitCode::from(2);
            }
        },
        None => TaxonConfig::default(),
    };
    config.observability.json |= args.json_logs;
    init_tracing_with_config(&config.observability);

    let job = DiffJob::new(config.differ.clone(), args.options());
    match job.run(&args.old, &args.new, &args.out, args.analysis_dir.as_deref()) {
        Ok(report) => {
            let s = report.summary;
            println!(
                "added {} retired {} modified {} unchanged {} records {} (written {}, skipped {}/{})",
                s.added,
                s.retired,
                s.modified,
                s.unchanged,
                s.records,
                report.written,
                report.skipped_old,
                report.skipped_new
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(code = e.error_code(), error = %e, "diff failed");
            eprintln!("taxon-diff: {e}");
            ExitCode::FAILURE
        }
    }
}
