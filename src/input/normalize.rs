use log::debug;

use super::types::{PointerPhase, PointerSample, PointerSource, RawPointerEvent};

/// Unifies the mouse and touch streams into one `{x, y, phase}` sequence.
///
/// Mouse: primary button only; a press latches the stream so moves and the
/// release are accepted wherever they happen. Touch: first active contact
/// only; an empty contact list is dropped without disturbing the gesture
/// phase, and the release position falls back to the last observed point
/// because lift frames usually carry no coordinates.
pub struct PointerNormalizer {
    active: Option<PointerSource>,
    last_x: i32,
    last_y: i32,
}

impl Default for PointerNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerNormalizer {
    pub fn new() -> Self {
        Self {
            active: None,
            last_x: 0,
            last_y: 0,
        }
    }

    pub fn active_source(&self) -> Option<PointerSource> {
        self.active
    }

    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn normalize(&mut self, now_ms: u64, raw: RawPointerEvent) -> Option<PointerSample> {
        match raw {
            RawPointerEvent::MousePress { x, y, primary } => {
                if !primary || self.active.is_some() {
                    return None;
                }
                self.active = Some(PointerSource::Mouse);
                Some(self.sample(now_ms, x, y, PointerPhase::Press))
            }
            RawPointerEvent::MouseMove { x, y } => {
                if self.active != Some(PointerSource::Mouse) {
                    return None;
                }
                Some(self.sample(now_ms, x, y, PointerPhase::Move))
            }
            RawPointerEvent::MouseRelease { x, y, primary } => {
                if !primary || self.active != Some(PointerSource::Mouse) {
                    return None;
                }
                self.active = None;
                Some(self.sample(now_ms, x, y, PointerPhase::Release))
            }
            RawPointerEvent::TouchStart { contacts } => {
                if self.active.is_some() {
                    return None;
                }
                let Some(first) = contacts.first() else {
                    debug!("pointer: empty touch list on start, sample dropped");
                    return None;
                };
                self.active = Some(PointerSource::Touch);
                Some(self.sample(now_ms, first.x, first.y, PointerPhase::Press))
            }
            RawPointerEvent::TouchMove { contacts } => {
                if self.active != Some(PointerSource::Touch) {
                    return None;
                }
                let Some(first) = contacts.first() else {
                    debug!("pointer: empty touch list on move, sample dropped");
                    return None;
                };
                Some(self.sample(now_ms, first.x, first.y, PointerPhase::Move))
            }
            RawPointerEvent::TouchEnd { .. } => {
                if self.active != Some(PointerSource::Touch) {
                    return None;
                }
                self.active = None;
                let (x, y) = (self.last_x, self.last_y);
                Some(self.sample(now_ms, x, y, PointerPhase::Release))
            }
        }
    }

    fn sample(&mut self, t_ms: u64, x: i32, y: i32, phase: PointerPhase) -> PointerSample {
        self.last_x = x;
        self.last_y = y;
        PointerSample { x, y, t_ms, phase }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::types::TouchContact;

    #[test]
    fn mouse_secondary_button_is_ignored() {
        let mut norm = PointerNormalizer::new();
        assert!(norm
            .normalize(
                0,
                RawPointerEvent::MousePress {
                    x: 5,
                    y: 5,
                    primary: false
                }
            )
            .is_none());
        assert!(norm.active_source().is_none());
    }

    #[test]
    fn mouse_press_move_release_round_trip() {
        let mut norm = PointerNormalizer::new();
        let press = norm
            .normalize(
                0,
                RawPointerEvent::MousePress {
                    x: 10,
                    y: 20,
                    primary: true,
                },
            )
            .unwrap();
        assert_eq!(press.phase, PointerPhase::Press);

        // Moves far outside any control bounds are still part of the stream.
        let mv = norm
            .normalize(16, RawPointerEvent::MouseMove { x: -400, y: 900 })
            .unwrap();
        assert_eq!(mv.phase, PointerPhase::Move);
        assert_eq!((mv.x, mv.y), (-400, 900));

        let up = norm
            .normalize(
                32,
                RawPointerEvent::MouseRelease {
                    x: -400,
                    y: 900,
                    primary: true,
                },
            )
            .unwrap();
        assert_eq!(up.phase, PointerPhase::Release);
        assert!(norm.active_source().is_none());
    }

    #[test]
    fn stray_mouse_move_without_press_is_dropped() {
        let mut norm = PointerNormalizer::new();
        assert!(norm
            .normalize(0, RawPointerEvent::MouseMove { x: 1, y: 1 })
            .is_none());
    }

    #[test]
    fn empty_touch_list_is_dropped_silently() {
        let mut norm = PointerNormalizer::new();
        assert!(norm
            .normalize(0, RawPointerEvent::TouchStart { contacts: &[] })
            .is_none());
        assert!(norm.active_source().is_none());

        let contacts = [TouchContact { x: 50, y: 60 }];
        let press = norm
            .normalize(10, RawPointerEvent::TouchStart { contacts: &contacts })
            .unwrap();
        assert_eq!(press.phase, PointerPhase::Press);

        // Mid-gesture empty frame must not end the stream.
        assert!(norm
            .normalize(20, RawPointerEvent::TouchMove { contacts: &[] })
            .is_none());
        assert_eq!(norm.active_source(), Some(PointerSource::Touch));
    }

    #[test]
    fn touch_release_uses_last_observed_point() {
        let mut norm = PointerNormalizer::new();
        let start = [TouchContact { x: 100, y: 100 }];
        let moved = [TouchContact { x: 180, y: 104 }];
        norm.normalize(0, RawPointerEvent::TouchStart { contacts: &start });
        norm.normalize(16, RawPointerEvent::TouchMove { contacts: &moved });
        let up = norm
            .normalize(32, RawPointerEvent::TouchEnd { contacts: &[] })
            .unwrap();
        assert_eq!((up.x, up.y), (180, 104));
        assert_eq!(up.phase, PointerPhase::Release);
    }

    #[test]
    fn second_source_cannot_steal_an_active_stream() {
        let mut norm = PointerNormalizer::new();
        let contacts = [TouchContact { x: 10, y: 10 }];
        norm.normalize(0, RawPointerEvent::TouchStart { contacts: &contacts });
        assert!(norm
            .normalize(
                5,
                RawPointerEvent::MousePress {
                    x: 0,
                    y: 0,
                    primary: true
                }
            )
            .is_none());
        assert_eq!(norm.active_source(), Some(PointerSource::Touch));
    }
}
