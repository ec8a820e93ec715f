use crate::events::Event;
use crate::geometry::ScreenGeometry;
use anyhow::Result;

/// Full-screen presentation surface. Every call replaces the whole
/// frame and presents it immediately.
pub trait Display {
    /// Presents a black frame.
    fn clear(&mut self) -> Result<()>;
    /// Presents the reach target centred at `at`, in pixels.
    fn show_stimulus(&mut self, at: (f32, f32)) -> Result<()>;
    /// Presents wrapped text centred on the screen.
    fn show_text(&mut self, text: &str) -> Result<()>;
    fn geometry(&self) -> ScreenGeometry;
}

/// Source of timestamped input events.
pub trait Input {
    /// Pumps the platform queue, blocking for at most the configured
    /// poll interval, and returns whatever arrived.
    fn poll(&mut self) -> Vec<Event>;
    /// Discards everything currently queued.
    fn drain(&mut self);
}

/// Event codes on the recording channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerCode {
    TrialStart,
    CircleOn,
    TrialEnd,
}

impl TriggerCode {
    pub fn value(&self) -> u8 {
        match self {
            TriggerCode::TrialStart => 2,
            TriggerCode::CircleOn => 4,
            TriggerCode::TrialEnd => 8,
        }
    }
}

/// Hardware trigger port driving the recording channel and the
/// occlusion goggles. Sends are fire-and-forget; implementations log
/// failures instead of surfacing them.
pub trait Trigger {
    fn send(&mut self, code: TriggerCode);
    fn open_shutter(&mut self);
    fn close_shutter(&mut self);
}
