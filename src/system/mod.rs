//! System-level modules
//!
//! - Logging initialisation
//! - Termination signal handling

pub mod logging;
pub mod signal;

pub use logging::init_logging;
pub use signal::wait_for_termination;
