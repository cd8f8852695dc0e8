//! Robot-vacuum panel: status and battery readouts, start/pause/dock
//! actions, and a fan-speed track quantized to the four supported levels.

use core::fmt::Write as _;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::commit::CommitPolicy;
use crate::control::{AnalogControl, ControlSpec};
use crate::entity::{AttrValue, EntitySnapshot, NumAttr, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

const BATTERY: NumAttr = NumAttr::new("battery_level", 0.0);
const FAN_SPEED: NumAttr = NumAttr::new("fan_speed", 0.0);

/// Fan speed snaps to off/quarter/half/three-quarter/full.
const FAN_STEP: f32 = 25.0;

const TRACK_HEIGHT: u32 = 10;
const BUTTON_WIDTH: u32 = 42;
const BUTTON_HEIGHT: u32 = 22;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VacuumButton {
    Start,
    Pause,
    Dock,
}

impl VacuumButton {
    const ALL: [VacuumButton; 3] = [VacuumButton::Start, VacuumButton::Pause, VacuumButton::Dock];

    fn action(self) -> &'static str {
        match self {
            VacuumButton::Start => "start",
            VacuumButton::Pause => "pause",
            VacuumButton::Dock => "return_to_base",
        }
    }

    fn label(self) -> &'static str {
        match self {
            VacuumButton::Start => "start",
            VacuumButton::Pause => "pause",
            VacuumButton::Dock => "dock",
        }
    }
}

pub struct VacuumCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    track: Rect,
    buttons: [Rect; 3],
    fan: AnalogControl,
    state: String<24>,
    battery: f32,
    on_track: bool,
}

impl VacuumCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect) -> Self {
        let track = Rect::new(
            frame.x + 8,
            frame.bottom() - TRACK_HEIGHT as i32 - 8,
            frame.width.saturating_sub(16),
            TRACK_HEIGHT,
        );
        let mut buttons = [Rect::default(); 3];
        let total = 3 * BUTTON_WIDTH as i32 + 2 * 8;
        for (index, slot) in buttons.iter_mut().enumerate() {
            slot.x = frame.x + (frame.width as i32 - total) / 2
                + index as i32 * (BUTTON_WIDTH as i32 + 8);
            slot.y = frame.y + frame.height as i32 / 2 - 4;
            slot.width = BUTTON_WIDTH;
            slot.height = BUTTON_HEIGHT;
        }
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            track,
            buttons,
            fan: AnalogControl::new(
                ControlSpec::linear(
                    track.width as f32,
                    Axis::Horizontal,
                    false,
                    0.0,
                    100.0,
                    FAN_STEP,
                ),
                CommitPolicy::OnRelease,
            ),
            state: String::new(),
            battery: 0.0,
            on_track: false,
        }
    }

    pub fn shown_fan_speed(&self) -> f32 {
        self.fan.shown_value().unwrap_or(0.0)
    }

    pub fn fan_track(&self) -> Rect {
        self.track
    }

    fn track_region(&self) -> Rect {
        self.track.union(Rect::new(
            self.track.x,
            self.track.y - 12,
            self.track.width,
            12,
        ))
    }

    fn button_at(&self, x: i32, y: i32) -> Option<VacuumButton> {
        self.buttons
            .iter()
            .zip(VacuumButton::ALL)
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, button)| button)
    }
}

impl Widget for VacuumCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn axis_lock(&self) -> Option<Axis> {
        self.fan.spec().axis_lock()
    }

    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };

        let mut repaint = Repaint::None;
        if self.state.as_str() != entity.state() {
            self.state.clear();
            let _ = self.state.push_str(entity.state());
            repaint = Repaint::Full;
        }
        let battery = BATTERY.read(entity);
        if battery != self.battery {
            self.battery = battery;
            repaint = repaint.merge(Repaint::Full);
        }

        let before = self.fan.shown_value();
        self.fan.apply_authoritative(now_ms, FAN_SPEED.read(entity));
        if self.fan.shown_value() != before {
            repaint = repaint.merge(Repaint::Partial(self.track_region()));
        }
        repaint
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.on_track = self.track.inset(-4).contains(event.x, event.y);
                if self.on_track {
                    self.fan.begin();
                }
                Reaction::none()
            }
            GestureEventKind::Move => {
                if !self.on_track {
                    return Reaction::none();
                }
                let offset = (event.x - self.track.x) as f32;
                let value = self.fan.spec().value_at_offset(offset);
                self.fan.drag_to(event.t_ms, value);
                Reaction::repaint(Repaint::Partial(self.track_region()))
            }
            GestureEventKind::Up => {
                let was_on_track = core::mem::replace(&mut self.on_track, false);
                if !was_on_track {
                    return Reaction::none();
                }
                match self.fan.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.track_region()),
                        ServiceCall::new("vacuum", "set_fan_speed", &self.entity_id)
                            .arg("fan_speed", AttrValue::Num(value)),
                    ),
                    None => Reaction::none(),
                }
            }
            GestureEventKind::Tap => match self.button_at(event.x, event.y) {
                Some(button) => Reaction::call(
                    Repaint::Full,
                    ServiceCall::new("vacuum", button.action(), &self.entity_id),
                ),
                None => Reaction::none(),
            },
            GestureEventKind::Hold => Reaction::none(),
            GestureEventKind::Cancel => {
                self.on_track = false;
                self.fan.cancel();
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
                self.frame.x + self.frame.width as i32 / 2,
                self.frame.y + 14,
                render::label_style(render::TEXT),
            )?;
            let mut battery: String<12> = String::new();
            let _ = write!(battery, "bat {}%", self.battery as i32);
            let color = if self.battery < 20.0 {
                render::ALERT
            } else {
                render::TEXT_DIM
            };
            render::draw_text_centered(
                target,
                &battery,
                self.frame.x + self.frame.width as i32 / 2,
                self.frame.y + 26,
                render::label_style(color),
            )?;
            for (rect, button) in self.buttons.iter().zip(VacuumButton::ALL) {
                render::fill_rect(target, *rect, render::TRACK)?;
                render::stroke_rect(target, *rect, render::OUTLINE)?;
                let (cx, cy) = rect.center();
                render::draw_text_centered(
                    target,
                    button.label(),
                    cx,
                    cy + 3,
                    render::label_style(render::TEXT),
                )?;
            }
        }

        let ratio = self.shown_fan_speed() / 100.0;
        render::draw_linear_track(target, self.track, Axis::Horizontal, false, ratio)?;
        let mut readout: String<12> = String::new();
        let _ = write!(readout, "fan {}%", self.shown_fan_speed() as i32);
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
