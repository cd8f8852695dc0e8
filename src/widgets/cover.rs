//! Shutter/cover card: a vertical position track that fills from the bottom
//! (0 % = closed) plus open/stop/close tap buttons.

use core::fmt::Write as _;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::commit::CommitPolicy;
use crate::control::{AnalogControl, ControlSpec};
use crate::entity::{AttrValue, EntitySnapshot, EntityState, NumAttr, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

const POSITION: NumAttr = NumAttr::new("current_position", 0.0);

const TRACK_WIDTH: u32 = 18;
const BUTTON_HEIGHT: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CoverButton {
    Open,
    Stop,
    Close,
}

impl CoverButton {
    const ALL: [CoverButton; 3] = [CoverButton::Open, CoverButton::Stop, CoverButton::Close];

    fn action(self) -> &'static str {
        match self {
            CoverButton::Open => "open_cover",
            CoverButton::Stop => "stop_cover",
            CoverButton::Close => "close_cover",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            CoverButton::Open => "^",
            CoverButton::Stop => "x",
            CoverButton::Close => "v",
        }
    }
}

pub struct CoverCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    track: Rect,
    buttons: [Rect; 3],
    position: AnalogControl,
    state: String<24>,
    on_track: bool,
}

impl CoverCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect) -> Self {
        let track = Rect::new(
            frame.right() - TRACK_WIDTH as i32 - 8,
            frame.y + 8,
            TRACK_WIDTH,
            frame.height.saturating_sub(16),
        );
        let mut buttons = [Rect::default(); 3];
        for (index, slot) in buttons.iter_mut().enumerate() {
            slot.x = frame.x + 8;
            slot.y = frame.y + 8 + index as i32 * (BUTTON_HEIGHT as i32 + 6);
            slot.width = 40;
            slot.height = BUTTON_HEIGHT;
        }
        let spec = ControlSpec::linear(
            track.height as f32,
            Axis::Vertical,
            true,
            0.0,
            100.0,
            1.0,
        );
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            track,
            buttons,
            position: AnalogControl::new(spec, CommitPolicy::OnRelease),
            state: String::new(),
            on_track: false,
        }
    }

    pub fn shown_position(&self) -> f32 {
        self.position.shown_value().unwrap_or(0.0)
    }

    fn entity_sync(&mut self, now_ms: u64, entity: &EntityState) -> Repaint {
        let mut repaint = Repaint::None;
        if self.state.as_str() != entity.state() {
            self.state.clear();
            let _ = self.state.push_str(entity.state());
            repaint = Repaint::Full;
        }
        let before = self.position.shown_value();
        self.position
            .apply_authoritative(now_ms, POSITION.read(entity));
        if self.position.shown_value() != before {
            repaint = repaint.merge(Repaint::Partial(self.live_region()));
        }
        repaint
    }

    fn live_region(&self) -> Rect {
        // Track plus the readout strip under it.
        self.track
            .union(Rect::new(self.track.x - 24, self.track.bottom(), 60, 12))
    }

    fn button_at(&self, x: i32, y: i32) -> Option<CoverButton> {
        self.buttons
            .iter()
            .zip(CoverButton::ALL)
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, button)| button)
    }

    fn track_offset(&self, y: i32) -> f32 {
        (y - self.track.y) as f32
    }
}

impl Widget for CoverCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn axis_lock(&self) -> Option<Axis> {
        self.position.spec().axis_lock()
    }

    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };
        self.entity_sync(now_ms, entity)
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.on_track = self.track.contains(event.x, event.y);
                if self.on_track {
                    self.position.begin();
                }
                Reaction::none()
            }
            GestureEventKind::Move => {
                if !self.on_track {
                    return Reaction::none();
                }
                let value = self
                    .position
                    .spec()
                    .value_at_offset(self.track_offset(event.y));
                self.position.drag_to(event.t_ms, value);
                Reaction::repaint(Repaint::Partial(self.live_region()))
            }
            GestureEventKind::Up => {
                let was_on_track = core::mem::replace(&mut self.on_track, false);
                if !was_on_track {
                    return Reaction::none();
                }
                match self.position.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.live_region()),
                        ServiceCall::new("cover", "set_cover_position", &self.entity_id)
                            .arg("position", AttrValue::Num(value)),
                    ),
                    None => Reaction::none(),
                }
            }
            GestureEventKind::Tap => match self.button_at(event.x, event.y) {
                Some(button) => Reaction::call(
                    Repaint::Full,
                    ServiceCall::new("cover", button.action(), &self.entity_id),
                ),
                None => Reaction::none(),
            },
            GestureEventKind::Hold => Reaction::none(),
            GestureEventKind::Cancel => {
                self.on_track = false;
                self.position.cancel();
                Reaction::repaint(Repaint::Full)
            }
        }
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        scope: RenderScope,
    ) -> Result<(), D::Error> {
        if scope == RenderScope::Full {
            render::fill_rect(target, self.frame, render::PANEL)?;
            render::stroke_rect(target, self.frame, render::OUTLINE)?;
            render::draw_text_centered(
                target,
                &self.state,
                self.frame.x + 28,
                self.frame.bottom() - 12,
                render::label_style(render::TEXT_DIM),
            )?;
            for (rect, button) in self.buttons.iter().zip(CoverButton::ALL) {
                render::fill_rect(target, *rect, render::TRACK)?;
                render::stroke_rect(target, *rect, render::OUTLINE)?;
                let (cx, cy) = rect.center();
                render::draw_text_centered(
                    target,
                    button.glyph(),
                    cx,
                    cy + 3,
                    render::label_style(render::TEXT),
                )?;
            }
        }

        let shown = self.shown_position();
        let ratio = shown / 100.0;
        render::draw_linear_track(target, self.track, Axis::Vertical, true, ratio)?;

        let mut readout: String<8> = String::new();
        let _ = write!(readout, "{}%", shown as i32);
        render::fill_rect(
            target,
            Rect::new(self.track.x - 24, self.track.bottom(), 60, 12),
            render::PANEL,
        )?;
        render::draw_text_centered(
            target,
            &readout,
            self.track.x + TRACK_WIDTH as i32 / 2,
            self.track.bottom() + 9,
            render::label_style(render::TEXT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;

    fn card() -> CoverCard {
        // Track height lands at 184 px.
        CoverCard::new(WidgetId(7), "cover.kitchen", Rect::new(0, 0, 120, 200))
    }

    fn mv(t_ms: u64, x: i32, y: i32) -> GestureEvent {
        GestureEvent {
            kind: GestureEventKind::Move,
            t_ms,
            x,
            y,
            start_x: x,
            start_y: y,
            duration_ms: 0,
        }
    }

    fn ev(kind: GestureEventKind, t_ms: u64, x: i32, y: i32) -> GestureEvent {
        GestureEvent {
            kind,
            t_ms,
            x,
            y,
            start_x: x,
            start_y: y,
            duration_ms: 0,
        }
    }

    fn push(card: &mut CoverCard, now_ms: u64, state: &str, position: f32) -> Repaint {
        let mut snapshot = EntitySnapshot::new();
        snapshot.insert(
            "cover.kitchen",
            EntityState::new(state).with_attr("current_position", AttrValue::Num(position)),
        );
        card.sync(now_ms, &snapshot)
    }

    #[test]
    fn sync_adopts_pushed_position() {
        let mut card = card();
        let repaint = push(&mut card, 0, "open", 80.0);
        assert_ne!(repaint, Repaint::None);
        assert_eq!(card.shown_position(), 80.0);
    }

    #[test]
    fn track_drag_commits_once_on_release() {
        let mut card = card();
        push(&mut card, 0, "open", 20.0);

        let track = card.track;
        card.gesture(&ev(GestureEventKind::Down, 100, track.x + 4, track.bottom() - 1));
        card.gesture(&mv(120, track.x + 4, track.y + track.height as i32 / 2));
        let reaction = card.gesture(&mv(140, track.x + 4, track.y));
        // Drag moves repaint but never call.
        assert!(reaction.calls.is_empty());
        assert!(matches!(reaction.repaint, Repaint::Partial(_)));

        let reaction = card.gesture(&ev(GestureEventKind::Up, 160, track.x + 4, track.y));
        assert_eq!(reaction.calls.len(), 1);
        let call = &reaction.calls[0];
        assert_eq!((call.domain, call.action), ("cover", "set_cover_position"));
        // Top of an inverted track is fully open.
        assert_eq!(call.args[0], ("position", AttrValue::Num(100.0)));
    }

    #[test]
    fn tap_on_buttons_fires_the_row_action() {
        let mut card = card();
        push(&mut card, 0, "open", 20.0);
        let stop = card.buttons[1];
        card.gesture(&ev(GestureEventKind::Down, 10, stop.x + 2, stop.y + 2));
        let reaction = card.gesture(&ev(GestureEventKind::Tap, 40, stop.x + 2, stop.y + 2));
        assert_eq!(reaction.calls.len(), 1);
        assert_eq!(reaction.calls[0].action, "stop_cover");
    }

    #[test]
    fn tap_on_track_commits_nothing() {
        let mut card = card();
        push(&mut card, 0, "open", 20.0);
        let track = card.track;
        card.gesture(&ev(GestureEventKind::Down, 10, track.x + 2, track.y + 10));
        let up = card.gesture(&ev(GestureEventKind::Up, 40, track.x + 2, track.y + 10));
        assert!(up.calls.is_empty());
        let tap = card.gesture(&ev(GestureEventKind::Tap, 40, track.x + 2, track.y + 10));
        assert!(tap.calls.is_empty());
    }

    #[test]
    fn stale_echo_after_commit_does_not_move_the_track() {
        let mut card = card();
        push(&mut card, 0, "open", 20.0);
        let track = card.track;
        card.gesture(&ev(GestureEventKind::Down, 100, track.x + 2, track.bottom() - 1));
        card.gesture(&mv(120, track.x + 2, track.y));
        card.gesture(&ev(GestureEventKind::Up, 140, track.x + 2, track.y));
        assert_eq!(card.shown_position(), 100.0);

        // Echo still carrying the pre-drag position arrives inside the window.
        let repaint = push(&mut card, 500, "open", 20.0);
        assert_eq!(repaint, Repaint::None);
        assert_eq!(card.shown_position(), 100.0);

        // After expiry the authoritative value wins again.
        let repaint = push(&mut card, 2_200, "open", 20.0);
        assert_ne!(repaint, Repaint::None);
        assert_eq!(card.shown_position(), 20.0);
    }

    #[test]
    fn cancel_mid_drag_reverts_to_authoritative() {
        let mut card = card();
        push(&mut card, 0, "open", 35.0);
        let track = card.track;
        card.gesture(&ev(GestureEventKind::Down, 100, track.x + 2, track.bottom() - 1));
        card.gesture(&mv(120, track.x + 2, track.y + 5));
        assert_ne!(card.shown_position(), 35.0);
        let reaction = card.gesture(&ev(GestureEventKind::Cancel, 140, track.x + 2, track.y + 5));
        assert_eq!(reaction.repaint, Repaint::Full);
        assert_eq!(card.shown_position(), 35.0);
    }
}
