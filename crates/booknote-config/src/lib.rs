//! Configuration, paths and logging shared by the BookNote client crates.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_API_URL, DEFAULT_CHECK_DEBOUNCE_MS, DEFAULT_LOG_LEVEL};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, LogConfig, LogFileWriter};
pub use paths::Paths;
