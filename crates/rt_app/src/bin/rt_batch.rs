use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rt_core::session::EditorSession;

/// Headless checks and repairs for a source/destination resource pair.
#[derive(Debug, Parser)]
#[command(name = "rt_batch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PairArgs {
    /// Source language file (read-only)
    #[arg(long)]
    source: PathBuf,
    /// Destination language file
    #[arg(long)]
    destination: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the load report for a pair
    Stats {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// List records whose localized text still equals the source text
    Pending {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Load and save again, adding missing entries and dropping duplicates
    Sync {
        #[command(flatten)]
        pair: PairArgs,
        /// Write here instead of overwriting the destination
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    rt_app::logging::init_logging(if cli.verbose { "debug" } else { "info" });
    run(cli.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Stats { pair } => {
            let session = open(&pair)?;
            let report = session.report();
            println!(
                "source={} destination={}",
                report.source_code.as_deref().unwrap_or("-"),
                report.destination_code.as_deref().unwrap_or("-")
            );
            println!(
                "total={} not_translated={} missing={} duplicates={}",
                report.total_resources,
                report.not_translated,
                report.missing_in_destination,
                report.duplicate_destination_entries
            );
        }
        Command::Pending { pair } => {
            let session = open(&pair)?;
            for record in session.records().iter().filter(|r| r.is_pending()) {
                println!(
                    "{}\t{}\t{}",
                    record.page_name, record.resource_name, record.resource_value
                );
            }
        }
        Command::Sync { pair, out } => {
            let mut session = open(&pair)?;
            let target = out.unwrap_or_else(|| pair.destination.clone());
            let dropped = session
                .save_as(&target)
                .with_context(|| format!("write {}", target.display()))?;
            let report = session.report();
            println!(
                "synced: records={} added={} duplicates_removed={} out={}",
                session.records().len(),
                report.missing_in_destination,
                dropped,
                target.display()
            );
        }
    }
    Ok(())
}

fn open(pair: &PairArgs) -> Result<EditorSession> {
    let mut session = EditorSession::new();
    load(&mut session, &pair.source, &pair.destination)?;
    Ok(session)
}

fn load(session: &mut EditorSession, source: &Path, destination: &Path) -> Result<()> {
    session.load(source, destination).with_context(|| {
        format!(
            "load {} against {}",
            source.display(),
            destination.display()
        )
    })?;
    Ok(())
}
