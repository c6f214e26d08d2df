//! Engine configuration, error taxonomy and logging setup

pub mod config;
pub mod error;
pub mod logging;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::init_logging;
