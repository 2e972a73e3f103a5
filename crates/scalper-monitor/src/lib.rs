//! Logging setup and live trade monitoring.

mod logging;
mod tape;

pub use logging::setup_logging;
pub use tape::TradeTape;
pub use tracing_appender::non_blocking::WorkerGuard;
