//! Shared configuration and logging setup.

mod environment;
mod logging;

pub use environment::{NicehashEnvironment, ParseEnvironmentError, ENVIRONMENT_VAR};
pub use logging::init_logging;
