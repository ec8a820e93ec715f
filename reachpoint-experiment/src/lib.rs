//! Session flow for the reach and point task: participant intake, the
//! per-group block sequence, trial execution and data capture.

pub mod config;
pub mod instructions;
pub mod intake;
pub mod session;

pub use config::TaskConfig;
pub use session::{Session, DATA_COLUMNS, EXPOSURE_REPEATS};
