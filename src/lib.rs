pub mod config;
pub mod db;
pub mod history; // Check-in history over a storage port
pub mod journal; // Submission flow: score against prior, append, alert
pub mod models;
pub mod replay;
pub mod scoring; // Risk tier + explanation for one check-in

use std::io::{self, BufWriter};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use history::{CheckInStore, MemoryCheckInStore, SqliteCheckInStore};
use journal::CheckInJournal;
use replay::{ReplayArgs, ReplayError};

/// Initialise tracing once. `RUST_LOG` wins over the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Entry point of the `carepulse` binary. Returns the process exit code.
///
/// Bad arguments and `--help` are handled by clap, which exits on its own.
pub fn run() -> i32 {
    let args = ReplayArgs::parse();
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match replay_from_args(&args) {
        Ok(count) => {
            tracing::info!(count, "Replay finished");
            0
        }
        Err(e) => {
            tracing::error!("Replay failed: {e}");
            1
        }
    }
}

fn replay_from_args(args: &ReplayArgs) -> Result<usize, ReplayError> {
    let records = replay::load_records(&args.input)?;

    let store: Arc<dyn CheckInStore> = match args.database_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "Recording into database");
            Arc::new(SqliteCheckInStore::open(&path)?)
        }
        None => Arc::new(MemoryCheckInStore::new()),
    };
    let journal = CheckInJournal::new(store);
    let check_ins = replay::replay(&journal, &records)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    replay::write_json_lines(&mut out, &check_ins)?;
    Ok(check_ins.len())
}
