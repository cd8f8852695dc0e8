#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
}

/// One normalized input sample. Produced per raw event, consumed by the
/// gesture classifier, never retained past the gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointerSample {
    pub x: i32,
    pub y: i32,
    pub t_ms: u64,
    pub phase: PointerPhase,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TouchContact {
    pub x: i32,
    pub y: i32,
}

/// Raw notifications as the host surface delivers them, before source
/// unification. Mouse events must be fed globally (wherever the pointer
/// travels); touch events arrive only from the panel surface itself.
#[derive(Clone, Copy, Debug)]
pub enum RawPointerEvent<'a> {
    MousePress { x: i32, y: i32, primary: bool },
    MouseMove { x: i32, y: i32 },
    MouseRelease { x: i32, y: i32, primary: bool },
    TouchStart { contacts: &'a [TouchContact] },
    TouchMove { contacts: &'a [TouchContact] },
    TouchEnd { contacts: &'a [TouchContact] },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEventKind {
    /// Pointer went down on the control.
    Down,
    /// Accepted drag motion; the first Move marks the drag start.
    Move,
    /// Pointer went up. Emitted before any Tap classification.
    Up,
    /// Short press without meaningful travel: the primary action.
    Tap,
    /// Press held past the tap bound without travel: the secondary action.
    Hold,
    /// Gesture aborted (pointer left the document, window blur). The
    /// control must repaint from its authoritative value.
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureEventKind,
    pub t_ms: u64,
    pub x: i32,
    pub y: i32,
    pub start_x: i32,
    pub start_y: i32,
    pub duration_ms: u32,
}

/// Fixed-slot buffer for events emitted by one classifier dispatch. A single
/// sample can produce at most Up + Tap (or Up + Hold), so three slots are
/// plenty.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureOutput {
    pub events: [Option<GestureEvent>; 3],
}

impl GestureOutput {
    pub fn iter(&self) -> impl Iterator<Item = &GestureEvent> {
        self.events.iter().filter_map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.events.iter().all(Option::is_none)
    }
}
