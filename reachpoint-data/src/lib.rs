pub mod error;
pub mod file;
pub mod participants;

pub use error::DataError;
pub use file::{DataFile, Field, Row};
pub use participants::{existing_ids, participant_dir};
