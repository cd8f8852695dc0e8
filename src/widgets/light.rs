//! LED color controller: a full hue wheel and a horizontal brightness
//! track, both committing on release.

use core::fmt::Write as _;

use embedded_graphics::{
    draw_target::DrawTarget,
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Circle, PrimitiveStyle},
};
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

const HUE: NumAttr = NumAttr::new("hue", 0.0);
const BRIGHTNESS: NumAttr = NumAttr::new("brightness_pct", 0.0);

const TRACK_HEIGHT: u32 = 12;
const WHEEL_SEGMENTS: u32 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LightPart {
    Wheel,
    Track,
}

pub struct LightCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    wheel_cx: i32,
    wheel_cy: i32,
    wheel_radius: u32,
    track: Rect,
    hue: AnalogControl,
    brightness: AnalogControl,
    is_on: bool,
    active: Option<LightPart>,
}

impl LightCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect) -> Self {
        let track = Rect::new(
            frame.x + 8,
            frame.bottom() - TRACK_HEIGHT as i32 - 8,
            frame.width.saturating_sub(16),
            TRACK_HEIGHT,
        );
        let wheel_cx = frame.x + frame.width as i32 / 2;
        let wheel_area = frame.height.saturating_sub(TRACK_HEIGHT + 24);
        let wheel_cy = frame.y + wheel_area as i32 / 2 + 4;
        let wheel_radius = (wheel_area.min(frame.width) / 2).saturating_sub(12);
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            wheel_cx,
            wheel_cy,
            wheel_radius,
            track,
            hue: AnalogControl::new(
                ControlSpec::angular(0.0, 360.0, 0.0, 360.0, 1.0),
                CommitPolicy::OnRelease,
            ),
            brightness: AnalogControl::new(
                ControlSpec::linear(
                    track.width as f32,
                    Axis::Horizontal,
                    false,
                    0.0,
                    100.0,
                    1.0,
                ),
                CommitPolicy::OnRelease,
            ),
            is_on: false,
            active: None,
        }
    }

    pub fn shown_hue(&self) -> f32 {
        self.hue.shown_value().unwrap_or(0.0)
    }

    pub fn shown_brightness(&self) -> f32 {
        self.brightness.shown_value().unwrap_or(0.0)
    }

    pub fn brightness_track(&self) -> Rect {
        self.track
    }

    fn wheel_region(&self) -> Rect {
        let r = self.wheel_radius as i32 + 6;
        Rect::new(
            self.wheel_cx - r,
            self.wheel_cy - r,
            (2 * r) as u32,
            (2 * r) as u32,
        )
    }

    fn track_region(&self) -> Rect {
        self.track.union(Rect::new(
            self.track.x,
            self.track.y - 12,
            self.track.width,
            12,
        ))
    }

    fn part_at(&self, x: i32, y: i32) -> Option<LightPart> {
        if self.track.inset(-4).contains(x, y) {
            return Some(LightPart::Track);
        }
        let dx = x - self.wheel_cx;
        let dy = y - self.wheel_cy;
        let r = self.wheel_radius as i32 + 6;
        if dx * dx + dy * dy <= r * r {
            return Some(LightPart::Wheel);
        }
        None
    }
}

impl Widget for LightCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };

        let mut repaint = Repaint::None;
        let is_on = entity.state() == "on";
        if is_on != self.is_on {
            self.is_on = is_on;
            repaint = Repaint::Full;
        }

        let hue_before = self.hue.shown_value();
        self.hue.apply_authoritative(now_ms, HUE.read(entity));
        if self.hue.shown_value() != hue_before {
            repaint = repaint.merge(Repaint::Partial(self.wheel_region()));
        }

        let brightness_before = self.brightness.shown_value();
        self.brightness
            .apply_authoritative(now_ms, BRIGHTNESS.read(entity));
        if self.brightness.shown_value() != brightness_before {
            repaint = repaint.merge(Repaint::Partial(self.track_region()));
        }
        repaint
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.active = self.part_at(event.x, event.y);
                match self.active {
                    Some(LightPart::Wheel) => self.hue.begin(),
                    Some(LightPart::Track) => self.brightness.begin(),
                    None => {}
                }
                Reaction::none()
            }
            GestureEventKind::Move => match self.active {
                Some(LightPart::Wheel) => {
                    let bearing = bearing_deg(
                        (event.x - self.wheel_cx) as f32,
                        (event.y - self.wheel_cy) as f32,
                    );
                    let value = self.hue.spec().value_at_bearing(bearing);
                    self.hue.drag_to(event.t_ms, value);
                    Reaction::repaint(Repaint::Partial(self.wheel_region()))
                }
                Some(LightPart::Track) => {
                    let offset = (event.x - self.track.x) as f32;
                    let value = self.brightness.spec().value_at_offset(offset);
                    self.brightness.drag_to(event.t_ms, value);
                    Reaction::repaint(Repaint::Partial(self.track_region()))
                }
                None => Reaction::none(),
            },
            GestureEventKind::Up => match self.active.take() {
                Some(LightPart::Wheel) => match self.hue.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.wheel_region()),
                        ServiceCall::new("light", "turn_on", &self.entity_id)
                            .arg("hue", AttrValue::Num(value)),
                    ),
                    None => Reaction::none(),
                },
                Some(LightPart::Track) => match self.brightness.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.track_region()),
                        ServiceCall::new("light", "turn_on", &self.entity_id)
                            .arg("brightness_pct", AttrValue::Num(value)),
                    ),
                    None => Reaction::none(),
                },
                None => Reaction::none(),
            },
            GestureEventKind::Tap => {
                // Taps on the card body toggle; taps on a control are not
                // an intent to switch the light.
                if self.part_at(event.x, event.y).is_none() {
                    Reaction::call(
                        Repaint::Full,
                        ServiceCall::new("light", "toggle", &self.entity_id),
                    )
                } else {
                    Reaction::none()
                }
            }
            GestureEventKind::Hold => Reaction::none(),
            GestureEventKind::Cancel => {
                self.active = None;
                self.hue.cancel();
                self.brightness.cancel();
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
            // Hue ring: coarse colored segments are plenty at panel size.
            let step = 360.0 / WHEEL_SEGMENTS as f32;
            for segment in 0..WHEEL_SEGMENTS {
                let angle = segment as f32 * step;
                let (x, y) = render::bearing_point(
                    self.wheel_cx,
                    self.wheel_cy,
                    self.wheel_radius,
                    angle,
                );
                Circle::with_center(Point::new(x, y), 7)
                    .into_styled(PrimitiveStyle::with_fill(hue_color(angle)))
                    .draw(target)?;
            }
        }

        // Hue marker.
        let marker = render::bearing_point(
            self.wheel_cx,
            self.wheel_cy,
            self.wheel_radius.saturating_sub(10),
            self.shown_hue(),
        );
        Circle::with_center(
            Point::new(self.wheel_cx, self.wheel_cy),
            (2 * self.wheel_radius).saturating_sub(22),
        )
            .into_styled(PrimitiveStyle::with_fill(render::PANEL))
            .draw(target)?;
        Circle::with_center(Point::new(marker.0, marker.1), 9)
            .into_styled(PrimitiveStyle::with_fill(hue_color(self.shown_hue())))
            .draw(target)?;

        let ratio = self.shown_brightness() / 100.0;
        render::draw_linear_track(target, self.track, Axis::Horizontal, false, ratio)?;
        let mut readout: String<8> = String::new();
        let _ = write!(readout, "{}%", self.shown_brightness() as i32);
        render::fill_rect(
            target,
            Rect::new(self.track.x, self.track.y - 12, self.track.width, 12),
            render::PANEL,
        )?;
        render::draw_text_centered(
            target,
            &readout,
            self.track.x + self.track.width as i32 / 2,
            self.track.y - 3,
            render::label_style(render::TEXT),
        )
    }
}

/// Coarse HSV-to-RGB with full saturation and value, good enough for ring
/// segments and the marker.
fn hue_color(hue_deg: f32) -> Rgb565 {
    let mut wrapped = hue_deg % 360.0;
    if wrapped < 0.0 {
        wrapped += 360.0;
    }
    let h = wrapped / 60.0;
    let sector = h as i32 % 6;
    let frac = h - sector as f32;
    let rising = (255.0 * frac) as u8;
    let falling = 255 - rising;
    let (r, g, b) = match sector {
        0 => (255, rising, 0),
        1 => (falling, 255, 0),
        2 => (0, 255, rising),
        3 => (0, falling, 255),
        4 => (rising, 0, 255),
        _ => (255, 0, falling),
    };
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}
