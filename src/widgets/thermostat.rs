//! Thermostat card: a three-quarter dial for the target temperature plus a
//! row of HVAC mode chips.
//!
//! The dial commits while the drag runs (paced) because thermostats echo
//! slowly; mode chips bypass the suppression machinery entirely and apply
//! the moment the host pushes them.

use core::fmt::Write as _;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::commit::CommitPolicy;
use crate::control::{bearing_deg, AnalogControl, ControlSpec};
use crate::entity::{AttrValue, EntitySnapshot, NumAttr, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

const TARGET: NumAttr = NumAttr::new("temperature", 20.0);
const CURRENT: NumAttr = NumAttr::new("current_temperature", 20.0);

const DIAL_START_DEG: f32 = -135.0;
const DIAL_END_DEG: f32 = 135.0;
const TEMP_STEP: f32 = 0.5;
/// Minimum spacing between in-drag set_temperature calls.
const PACE_INTERVAL_MS: u64 = 500;

const MODES: [&str; 3] = ["heat", "cool", "off"];
const CHIP_WIDTH: u32 = 36;
const CHIP_HEIGHT: u32 = 16;

pub struct ThermostatCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    dial_cx: i32,
    dial_cy: i32,
    dial_radius: u32,
    chips: [Rect; 3],
    target: AnalogControl,
    current: f32,
    mode: String<16>,
    on_dial: bool,
}

impl ThermostatCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect, min_temp: f32, max_temp: f32) -> Self {
        let dial_cx = frame.x + frame.width as i32 / 2;
        let dial_cy = frame.y + (frame.height as i32 - CHIP_HEIGHT as i32 - 12) / 2;
        let dial_radius = (frame.width.min(frame.height) / 2).saturating_sub(24);
        let mut chips = [Rect::default(); 3];
        let total = 3 * CHIP_WIDTH as i32 + 2 * 6;
        for (index, chip) in chips.iter_mut().enumerate() {
            chip.x = frame.x + (frame.width as i32 - total) / 2
                + index as i32 * (CHIP_WIDTH as i32 + 6);
            chip.y = frame.bottom() - CHIP_HEIGHT as i32 - 6;
            chip.width = CHIP_WIDTH;
            chip.height = CHIP_HEIGHT;
        }
        let spec = ControlSpec::angular(DIAL_START_DEG, DIAL_END_DEG, min_temp, max_temp, TEMP_STEP);
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            dial_cx,
            dial_cy,
            dial_radius,
            chips,
            target: AnalogControl::new(
                spec,
                CommitPolicy::Paced {
                    interval_ms: PACE_INTERVAL_MS,
                },
            ),
            current: CURRENT.fallback,
            mode: String::new(),
            on_dial: false,
        }
    }

    pub fn shown_target(&self) -> f32 {
        let spec = self.target.spec();
        self.target.shown_value().unwrap_or(spec.domain_min)
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    fn dial_region(&self) -> Rect {
        let r = self.dial_radius as i32 + 8;
        Rect::new(
            self.dial_cx - r,
            self.dial_cy - r,
            (2 * r) as u32,
            (2 * r) as u32,
        )
    }

    fn on_dial_ring(&self, x: i32, y: i32) -> bool {
        let dx = x - self.dial_cx;
        let dy = y - self.dial_cy;
        let dist_sq = dx * dx + dy * dy;
        let outer = self.dial_radius as i32 + 12;
        dist_sq <= outer * outer
    }

    fn chip_at(&self, x: i32, y: i32) -> Option<&'static str> {
        self.chips
            .iter()
            .zip(MODES)
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, mode)| mode)
    }

    fn set_temperature_call(&self, value: f32) -> ServiceCall {
        ServiceCall::new("climate", "set_temperature", &self.entity_id)
            .arg("temperature", AttrValue::Num(value))
    }
}

impl Widget for ThermostatCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn axis_lock(&self) -> Option<Axis> {
        None
    }

    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };

        let mut repaint = Repaint::None;
        // Mode rides the entity state and always applies, suppression or
        // not; only the dragged attribute is protected.
        if self.mode.as_str() != entity.state() {
            self.mode.clear();
            let _ = self.mode.push_str(entity.state());
            repaint = Repaint::Full;
        }
        let current = CURRENT.read(entity);
        if current != self.current {
            self.current = current;
            repaint = repaint.merge(Repaint::Partial(self.dial_region()));
        }

        let before = self.target.shown_value();
        self.target.apply_authoritative(now_ms, TARGET.read(entity));
        if self.target.shown_value() != before {
            repaint = repaint.merge(Repaint::Partial(self.dial_region()));
        }

        // A full rebuild is not allowed to run under an active drag.
        if self.target.is_interacting() && repaint == Repaint::Full {
            repaint = Repaint::Partial(self.frame);
        }
        repaint
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.on_dial = self.on_dial_ring(event.x, event.y);
                if self.on_dial {
                    self.target.begin();
                }
                Reaction::none()
            }
            GestureEventKind::Move => {
                if !self.on_dial {
                    return Reaction::none();
                }
                let bearing = bearing_deg(
                    (event.x - self.dial_cx) as f32,
                    (event.y - self.dial_cy) as f32,
                );
                let value = self.target.spec().value_at_bearing(bearing);
                let update = self.target.drag_to(event.t_ms, value);
                let repaint = Repaint::Partial(self.dial_region());
                if update.send_now {
                    Reaction::call(repaint, self.set_temperature_call(update.value))
                } else {
                    Reaction::repaint(repaint)
                }
            }
            GestureEventKind::Up => {
                let was_on_dial = core::mem::replace(&mut self.on_dial, false);
                if !was_on_dial {
                    return Reaction::none();
                }
                match self.target.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.dial_region()),
                        self.set_temperature_call(value),
                    ),
                    None => Reaction::none(),
                }
            }
            GestureEventKind::Tap => match self.chip_at(event.x, event.y) {
                Some(mode) => Reaction::call(
                    Repaint::Full,
                    ServiceCall::new("climate", "set_hvac_mode", &self.entity_id)
                        .arg("hvac_mode", AttrValue::text(mode)),
                ),
                None => Reaction::none(),
            },
            GestureEventKind::Hold => Reaction::none(),
            GestureEventKind::Cancel => {
                self.on_dial = false;
                self.target.cancel();
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
            for (rect, mode) in self.chips.iter().zip(MODES) {
                let active = self.mode.as_str() == mode;
                let bg = if active { render::FILL } else { render::TRACK };
                render::fill_rect(target, *rect, bg)?;
                render::stroke_rect(target, *rect, render::OUTLINE)?;
                let (cx, cy) = rect.center();
                render::draw_text_centered(
                    target,
                    mode,
                    cx,
                    cy + 3,
                    render::label_style(render::TEXT),
                )?;
            }
        }

        render::fill_rect(target, self.dial_region(), render::PANEL)?;
        let shown = self.shown_target();
        let bearing = self.target.spec().bearing_for_value(shown);
        render::draw_dial(
            target,
            self.dial_cx,
            self.dial_cy,
            self.dial_radius,
            DIAL_START_DEG,
            DIAL_END_DEG,
            bearing,
        )?;

        let mut readout: String<12> = String::new();
        let _ = write!(readout, "{shown:.1}");
        render::draw_text_centered(
            target,
            &readout,
            self.dial_cx,
            self.dial_cy + self.dial_radius as i32 / 2,
            render::value_style(render::TEXT),
        )?;
        let mut current: String<12> = String::new();
        let _ = write!(current, "now {:.1}", self.current);
        render::draw_text_centered(
            target,
            &current,
            self.dial_cx,
            self.dial_cy + self.dial_radius as i32 / 2 + 14,
            render::label_style(render::TEXT_DIM),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;

    fn card() -> ThermostatCard {
        ThermostatCard::new(
            WidgetId(3),
            "climate.living",
            Rect::new(0, 0, 160, 160),
            10.0,
            30.0,
        )
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

    fn push(card: &mut ThermostatCard, now_ms: u64, mode: &str, target: f32, current: f32) -> Repaint {
        let mut snapshot = EntitySnapshot::new();
        snapshot.insert(
            "climate.living",
            EntityState::new(mode)
                .with_attr("temperature", AttrValue::Num(target))
                .with_attr("current_temperature", AttrValue::Num(current)),
        );
        card.sync(now_ms, &snapshot)
    }

    #[test]
    fn straight_up_drag_lands_on_the_domain_midpoint() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);

        let cx = card.dial_cx;
        let cy = card.dial_cy;
        card.gesture(&ev(GestureEventKind::Down, 100, cx + 2, cy - 10));
        let reaction = card.gesture(&ev(GestureEventKind::Move, 120, cx, cy - 40));
        // First paced call goes out immediately with the midpoint value.
        assert_eq!(reaction.calls.len(), 1);
        assert_eq!(
            reaction.calls[0].args[0],
            ("temperature", AttrValue::Num(20.0))
        );
        assert_eq!(card.shown_target(), 20.0);
    }

    #[test]
    fn drag_calls_respect_the_pacing_interval() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);

        let cx = card.dial_cx;
        let cy = card.dial_cy;
        card.gesture(&ev(GestureEventKind::Down, 0, cx, cy - 10));
        let first = card.gesture(&ev(GestureEventKind::Move, 10, cx, cy - 40));
        assert_eq!(first.calls.len(), 1);
        // Value keeps changing but the interval has not elapsed.
        let second = card.gesture(&ev(GestureEventKind::Move, 200, cx + 20, cy - 40));
        assert!(second.calls.is_empty());
        let third = card.gesture(&ev(GestureEventKind::Move, 600, cx + 40, cy - 40));
        assert_eq!(third.calls.len(), 1);
    }

    #[test]
    fn release_sends_the_trailing_value_once() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);

        let cx = card.dial_cx;
        let cy = card.dial_cy;
        card.gesture(&ev(GestureEventKind::Down, 0, cx, cy - 10));
        card.gesture(&ev(GestureEventKind::Move, 10, cx, cy - 40));
        card.gesture(&ev(GestureEventKind::Move, 200, cx + 30, cy - 30));
        let up = card.gesture(&ev(GestureEventKind::Up, 250, cx + 30, cy - 30));
        assert_eq!(up.calls.len(), 1);

        // Released on an already-sent value: quiet.
        card.gesture(&ev(GestureEventKind::Down, 5_000, cx, cy - 10));
        card.gesture(&ev(GestureEventKind::Move, 5_010, cx, cy - 40));
        let up = card.gesture(&ev(GestureEventKind::Up, 5_020, cx, cy - 40));
        assert!(up.calls.is_empty());
    }

    #[test]
    fn mode_applies_even_while_target_is_suppressed() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);

        let cx = card.dial_cx;
        let cy = card.dial_cy;
        card.gesture(&ev(GestureEventKind::Down, 0, cx, cy - 10));
        card.gesture(&ev(GestureEventKind::Move, 10, cx, cy - 40));
        card.gesture(&ev(GestureEventKind::Up, 50, cx, cy - 40));
        assert_eq!(card.shown_target(), 20.0);

        // Push inside the window: stale target ignored, new mode applied.
        let repaint = push(&mut card, 500, "cool", 22.0, 21.0);
        assert_eq!(card.mode(), "cool");
        assert_eq!(card.shown_target(), 20.0);
        assert_ne!(repaint, Repaint::None);
    }

    #[test]
    fn mode_chip_tap_calls_set_hvac_mode() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);
        let chip = card.chips[2];
        card.gesture(&ev(GestureEventKind::Down, 10, chip.x + 1, chip.y + 1));
        let reaction = card.gesture(&ev(GestureEventKind::Tap, 50, chip.x + 1, chip.y + 1));
        assert_eq!(reaction.calls.len(), 1);
        assert_eq!(reaction.calls[0].action, "set_hvac_mode");
        assert_eq!(
            reaction.calls[0].args[0],
            ("hvac_mode", AttrValue::text("off"))
        );
    }

    #[test]
    fn dial_values_quantize_to_half_degrees() {
        let mut card = card();
        push(&mut card, 0, "heat", 22.0, 21.0);
        let cx = card.dial_cx;
        let cy = card.dial_cy;
        card.gesture(&ev(GestureEventKind::Down, 0, cx, cy - 10));
        card.gesture(&ev(GestureEventKind::Move, 10, cx + 33, cy - 40));
        let shown = card.shown_target();
        assert_eq!(shown, (shown * 2.0) as i32 as f32 / 2.0);
    }
}
