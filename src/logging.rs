use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{info, warn};
use std::path::Path;

const LOG_FILE_BASENAME: &str = "hacker_stories";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts the logger. `RUST_LOG` wins over `level` when set.
///
/// Logs go to a rotating file in `log_dir` with warnings duplicated to
/// stderr. If the directory cannot be created, logging falls back to stderr
/// only. The returned handle must be kept alive for the process lifetime.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    if let Err(e) = std::fs::create_dir_all(log_dir) {
        let handle = Logger::try_with_env_or_str(level)
            .with_context(|| format!("Invalid log level `{}`", level))?
            .log_to_stderr()
            .start()
            .context("Failed to start logger")?;
        warn!("Cannot write logs to {}: {}", log_dir.display(), e);
        return Ok(handle);
    }

    let handle = Logger::try_with_env_or_str(level)
        .with_context(|| format!("Invalid log level `{}`", level))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .duplicate_to_stderr(Duplicate::Warn)
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .context("Failed to start logger")?;

    info!(
        "hacker_stories {} started, logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );
    Ok(handle)
}
