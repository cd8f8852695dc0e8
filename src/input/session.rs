use heapless::Vec;
use log::debug;

use crate::geometry::{Axis, Rect};

use super::core::{GestureEngine, GesturePhase};
use super::normalize::PointerNormalizer;
use super::types::{GestureOutput, PointerPhase, RawPointerEvent};

/// Controls one session can route to.
pub const SESSION_CONTROLS_MAX: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidgetId(pub u16);

#[derive(Clone, Copy, Debug)]
struct Registration {
    id: WidgetId,
    bounds: Rect,
    axis_lock: Option<Axis>,
}

/// Result of feeding one raw event through the session.
///
/// `consumed` tells a touch surface to cancel its own scrolling for this
/// event; `target` names the widget the gesture events belong to.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionOutput {
    pub consumed: bool,
    pub target: Option<WidgetId>,
    pub events: GestureOutput,
}

/// Per-document pointer fan-out.
///
/// The host environment creates one session per document and feeds it every
/// raw pointer notification exactly once — including mouse moves and
/// releases far outside any widget, which is what lets a drag finish
/// wherever the pointer ends up. Widgets subscribe with their hit bounds
/// instead of installing their own global listeners; while a gesture is in
/// progress the originating widget owns the whole stream.
pub struct PointerSession {
    normalizer: PointerNormalizer,
    registrations: Vec<Registration, SESSION_CONTROLS_MAX>,
    gesture: Option<(WidgetId, GestureEngine)>,
}

impl Default for PointerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSession {
    pub fn new() -> Self {
        Self {
            normalizer: PointerNormalizer::new(),
            registrations: Vec::new(),
            gesture: None,
        }
    }

    /// Subscribe a widget's hit region. Later registrations win overlaps,
    /// matching paint order. Re-registering an id replaces its bounds.
    pub fn register(&mut self, id: WidgetId, bounds: Rect, axis_lock: Option<Axis>) {
        if let Some(existing) = self
            .registrations
            .iter_mut()
            .find(|registration| registration.id == id)
        {
            existing.bounds = bounds;
            existing.axis_lock = axis_lock;
            return;
        }
        if self
            .registrations
            .push(Registration {
                id,
                bounds,
                axis_lock,
            })
            .is_err()
        {
            debug!("pointer session full, widget {} not registered", id.0);
        }
    }

    pub fn deregister(&mut self, id: WidgetId) {
        self.registrations
            .retain(|registration| registration.id != id);
        if let Some((active, _)) = &self.gesture {
            if *active == id {
                self.gesture = None;
                self.normalizer.reset();
            }
        }
    }

    /// True while some widget owns an in-progress press or drag.
    pub fn gesture_in_progress(&self) -> bool {
        self.gesture
            .as_ref()
            .is_some_and(|(_, engine)| engine.phase() != GesturePhase::Idle)
    }

    pub fn feed(&mut self, now_ms: u64, raw: RawPointerEvent) -> SessionOutput {
        let is_touch_move = matches!(raw, RawPointerEvent::TouchMove { .. });
        let Some(sample) = self.normalizer.normalize(now_ms, raw) else {
            return SessionOutput::default();
        };

        match sample.phase {
            PointerPhase::Press => {
                let Some(registration) = self.hit_test(sample.x, sample.y) else {
                    // Press on dead space: keep the stream latched so the
                    // matching release is swallowed, but route nothing.
                    self.gesture = None;
                    return SessionOutput::default();
                };
                let mut engine = GestureEngine::new(registration.axis_lock);
                let events = engine.feed(sample);
                let target = registration.id;
                self.gesture = Some((target, engine));
                SessionOutput {
                    consumed: true,
                    target: Some(target),
                    events,
                }
            }
            PointerPhase::Move | PointerPhase::Release => {
                let Some((target, engine)) = self.gesture.as_mut() else {
                    return SessionOutput::default();
                };
                let target = *target;
                let events = engine.feed(sample);
                let done = engine.phase() == GesturePhase::Idle;
                if done {
                    self.gesture = None;
                }
                SessionOutput {
                    // Touch moves feeding an active gesture must be marked
                    // cancelable so the page does not scroll underneath.
                    consumed: is_touch_move || sample.phase == PointerPhase::Release,
                    target: Some(target),
                    events,
                }
            }
        }
    }

    /// Host hook for window blur / pointer-leave: aborts any gesture in
    /// progress so no control stays visually stuck mid-drag.
    pub fn cancel_all(&mut self, now_ms: u64) -> SessionOutput {
        self.normalizer.reset();
        let Some((target, mut engine)) = self.gesture.take() else {
            return SessionOutput::default();
        };
        let events = engine.cancel(now_ms);
        SessionOutput {
            consumed: false,
            target: Some(target),
            events,
        }
    }

    fn hit_test(&self, x: i32, y: i32) -> Option<Registration> {
        self.registrations
            .iter()
            .rev()
            .find(|registration| registration.bounds.contains(x, y))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::{GestureEventKind, TouchContact};

    fn session_with_two_widgets() -> PointerSession {
        let mut session = PointerSession::new();
        session.register(WidgetId(1), Rect::new(0, 0, 100, 100), None);
        session.register(WidgetId(2), Rect::new(100, 0, 100, 100), Some(Axis::Horizontal));
        session
    }

    #[test]
    fn press_routes_to_hit_widget() {
        let mut session = session_with_two_widgets();
        let out = session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 150,
                y: 50,
                primary: true,
            },
        );
        assert_eq!(out.target, Some(WidgetId(2)));
        assert!(out.consumed);
        assert!(out
            .events
            .iter()
            .any(|ev| ev.kind == GestureEventKind::Down));
    }

    #[test]
    fn moves_follow_the_press_target_even_outside_bounds() {
        let mut session = session_with_two_widgets();
        session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 50,
                y: 50,
                primary: true,
            },
        );
        // Far outside widget 1, over widget 2: still widget 1's gesture.
        let out = session.feed(16, RawPointerEvent::MouseMove { x: 150, y: 50 });
        assert_eq!(out.target, Some(WidgetId(1)));
        let out = session.feed(
            32,
            RawPointerEvent::MouseRelease {
                x: 400,
                y: -30,
                primary: true,
            },
        );
        assert_eq!(out.target, Some(WidgetId(1)));
        assert!(!session.gesture_in_progress());
    }

    #[test]
    fn press_on_dead_space_swallows_the_stream() {
        let mut session = session_with_two_widgets();
        let out = session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 300,
                y: 300,
                primary: true,
            },
        );
        assert_eq!(out.target, None);
        let out = session.feed(16, RawPointerEvent::MouseMove { x: 50, y: 50 });
        assert_eq!(out.target, None);
        assert!(out.events.is_empty());
    }

    #[test]
    fn touch_moves_are_consumed_while_dragging() {
        let mut session = session_with_two_widgets();
        let start = [TouchContact { x: 20, y: 20 }];
        session.feed(0, RawPointerEvent::TouchStart { contacts: &start });
        let moved = [TouchContact { x: 60, y: 22 }];
        let out = session.feed(16, RawPointerEvent::TouchMove { contacts: &moved });
        assert!(out.consumed);
        assert_eq!(out.target, Some(WidgetId(1)));
    }

    #[test]
    fn cancel_all_aborts_active_gesture() {
        let mut session = session_with_two_widgets();
        session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 50,
                y: 50,
                primary: true,
            },
        );
        session.feed(16, RawPointerEvent::MouseMove { x: 90, y: 52 });
        assert!(session.gesture_in_progress());

        let out = session.cancel_all(32);
        assert_eq!(out.target, Some(WidgetId(1)));
        assert!(out
            .events
            .iter()
            .any(|ev| ev.kind == GestureEventKind::Cancel));
        assert!(!session.gesture_in_progress());
    }

    #[test]
    fn deregister_drops_active_gesture() {
        let mut session = session_with_two_widgets();
        session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 50,
                y: 50,
                primary: true,
            },
        );
        session.deregister(WidgetId(1));
        let out = session.feed(16, RawPointerEvent::MouseMove { x: 60, y: 50 });
        assert_eq!(out.target, None);
    }

    #[test]
    fn axis_lock_is_taken_from_the_registration() {
        let mut session = session_with_two_widgets();
        session.feed(
            0,
            RawPointerEvent::MousePress {
                x: 150,
                y: 50,
                primary: true,
            },
        );
        // Vertical-dominant motion on a horizontal-locked widget: no Move.
        let out = session.feed(16, RawPointerEvent::MouseMove { x: 152, y: 90 });
        assert!(out.events.is_empty());
    }
}
