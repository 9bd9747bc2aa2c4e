use crate::frame::Frame;

/// Event kinds emitted by the navigation core.
///
/// Consumers match on these instead of parsing messages. The camera's
/// view-changed notification in particular is delivered this way: zero or
/// more drainers, no ordering guarantee, and emission cannot fail.
pub mod kinds {
    pub const VIEW_CHANGED: &str = "view-changed";
    pub const FLIGHT_STARTED: &str = "flight-started";
    pub const FLIGHT_COMPLETED: &str = "flight-completed";
    pub const FLIGHT_STOPPED: &str = "flight-stopped";
    pub const TERRAIN_CLAMP: &str = "terrain-clamp";
    pub const GATE_LOCKED: &str = "gate-locked";
    pub const GATE_FREED: &str = "gate-freed";
}

/// Structured event with frame attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_of_kind(&self, kind: &str) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn count_of_kind(&self, kind: &str) -> usize {
        self.events_of_kind(kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
