use crate::error::SessionError;

/// Keys the task distinguishes. Everything else arrives as `Other`,
/// which only matters for any-key waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Return,
    Backspace,
    Other,
}

/// Backend-neutral input event. Timestamps are nanoseconds on the same
/// clock as the session timer, stamped when the backend dequeues the
/// platform event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyDown { key: Key, at: u64 },
    KeyUp { key: Key, at: u64 },
    Click { x: f32, y: f32, at: u64 },
    /// Printable text typed since the last poll. Control characters
    /// never appear here.
    Text { text: String },
    /// Window close, Escape, or Ctrl-Q.
    Quit,
}

/// Fails with `SessionError::Quit` if the batch holds a quit event.
/// Every poll loop calls this before touching anything else.
pub fn check_quit(events: &[Event]) -> Result<(), SessionError> {
    if events.iter().any(|event| matches!(event, Event::Quit)) {
        return Err(SessionError::Quit);
    }
    Ok(())
}

/// Whether the batch holds a press of `key`.
pub fn key_pressed(events: &[Event], key: Key) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::KeyDown { key: k, .. } if *k == key))
}

/// Whether the batch holds a release of `key`.
pub fn key_released(events: &[Event], key: Key) -> bool {
    events
        .iter()
        .any(|event| matches!(event, Event::KeyUp { key: k, .. } if *k == key))
}

/// Timestamp of the first release of `key` in the batch.
pub fn first_key_up(events: &[Event], key: Key) -> Option<u64> {
    events.iter().find_map(|event| match event {
        Event::KeyUp { key: k, at } if *k == key => Some(*at),
        _ => None,
    })
}
