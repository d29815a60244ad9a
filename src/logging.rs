use flexi_logger::{FileSpec, FlexiLoggerError, Logger, LoggerHandle};
use std::path::Path;

const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
    "debug"
} else {
    "info"
};

/// Starts logging, honoring `RUST_LOG`.  With a `log_file`, messages are
/// written there; otherwise they go to stderr, unless `interactive` is set,
/// in which case logging stays off so as not to garble the terminal.
///
/// The returned handle must be kept alive for as long as logging is wanted.
pub(crate) fn init(
    log_file: Option<&Path>,
    interactive: bool,
) -> Result<Option<LoggerHandle>, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;
    let logger = match log_file {
        Some(path) => logger
            .log_to_file(FileSpec::try_from(path)?)
            .print_message(),
        None if interactive => return Ok(None),
        None => logger.log_to_stderr(),
    };
    logger.start().map(Some)
}
