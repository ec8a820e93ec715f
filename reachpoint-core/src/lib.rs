pub mod error;
pub mod events;
pub mod geometry;
pub mod services;
pub mod types;

pub use error::SessionError;
pub use events::{check_quit, first_key_up, key_pressed, key_released, Event, Key};
pub use geometry::ScreenGeometry;
pub use services::{Display, Input, Trigger, TriggerCode};
pub use types::{Block, Group, ParticipantInfo, TrialResult};
