//! Media-player card: transport buttons and a horizontal volume track.
//!
//! Volume commits on release and then holds through the suppression window,
//! because receivers routinely take a second or two to echo the new level
//! back and the slider must not snap to the old value in between.

use core::fmt::Write as _;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::commit::CommitPolicy;
use crate::control::{AnalogControl, ControlSpec};
use crate::entity::{AttrValue, EntitySnapshot, NumAttr, TextAttr, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

const VOLUME: NumAttr = NumAttr::new("volume_level", 0.0);
const TITLE: TextAttr = TextAttr::new("media_title", "");

const TRACK_HEIGHT: u32 = 10;
const BUTTON_SIZE: u32 = 26;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transport {
    Previous,
    PlayPause,
    Next,
}

impl Transport {
    const ALL: [Transport; 3] = [Transport::Previous, Transport::PlayPause, Transport::Next];

    fn action(self) -> &'static str {
        match self {
            Transport::Previous => "media_previous_track",
            Transport::PlayPause => "media_play_pause",
            Transport::Next => "media_next_track",
        }
    }

    fn glyph(self) -> &'static str {
        match self {
            Transport::Previous => "<<",
            Transport::PlayPause => "|>",
            Transport::Next => ">>",
        }
    }
}

pub struct MediaCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    track: Rect,
    buttons: [Rect; 3],
    volume: AnalogControl,
    state: String<16>,
    title: String<32>,
    on_track: bool,
}

impl MediaCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect) -> Self {
        let track = Rect::new(
            frame.x + 8,
            frame.bottom() - TRACK_HEIGHT as i32 - 8,
            frame.width.saturating_sub(16),
            TRACK_HEIGHT,
        );
        let mut buttons = [Rect::default(); 3];
        let total = 3 * BUTTON_SIZE as i32 + 2 * 10;
        for (index, slot) in buttons.iter_mut().enumerate() {
            slot.x = frame.x + (frame.width as i32 - total) / 2
                + index as i32 * (BUTTON_SIZE as i32 + 10);
            slot.y = frame.y + frame.height as i32 / 2 - BUTTON_SIZE as i32 / 2;
            slot.width = BUTTON_SIZE;
            slot.height = BUTTON_SIZE;
        }
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            track,
            buttons,
            volume: AnalogControl::new(
                ControlSpec::linear(
                    track.width as f32,
                    Axis::Horizontal,
                    false,
                    0.0,
                    1.0,
                    0.01,
                ),
                CommitPolicy::OnRelease,
            ),
            state: String::new(),
            title: String::new(),
            on_track: false,
        }
    }

    pub fn shown_volume(&self) -> f32 {
        self.volume.shown_value().unwrap_or(0.0)
    }

    pub fn volume_track(&self) -> Rect {
        self.track
    }

    fn track_region(&self) -> Rect {
        self.track.union(Rect::new(
            self.track.right() - 40,
            self.track.y - 12,
            40,
            12,
        ))
    }

    fn button_at(&self, x: i32, y: i32) -> Option<Transport> {
        self.buttons
            .iter()
            .zip(Transport::ALL)
            .find(|(rect, _)| rect.contains(x, y))
            .map(|(_, button)| button)
    }
}

impl Widget for MediaCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn axis_lock(&self) -> Option<Axis> {
        self.volume.spec().axis_lock()
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
        let title = TITLE.read(entity);
        if self.title.as_str() != title {
            self.title.clear();
            let _ = self.title.push_str(title);
            repaint = Repaint::Full;
        }

        let before = self.volume.shown_value();
        self.volume.apply_authoritative(now_ms, VOLUME.read(entity));
        if self.volume.shown_value() != before {
            repaint = repaint.merge(Repaint::Partial(self.track_region()));
        }
        repaint
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.on_track = self.track.inset(-4).contains(event.x, event.y);
                if self.on_track {
                    self.volume.begin();
                }
                Reaction::none()
            }
            GestureEventKind::Move => {
                if !self.on_track {
                    return Reaction::none();
                }
                let offset = (event.x - self.track.x) as f32;
                let value = self.volume.spec().value_at_offset(offset);
                self.volume.drag_to(event.t_ms, value);
                Reaction::repaint(Repaint::Partial(self.track_region()))
            }
            GestureEventKind::Up => {
                let was_on_track = core::mem::replace(&mut self.on_track, false);
                if !was_on_track {
                    return Reaction::none();
                }
                match self.volume.release(event.t_ms) {
                    Some(value) => Reaction::call(
                        Repaint::Partial(self.track_region()),
                        ServiceCall::new("media_player", "volume_set", &self.entity_id)
                            .arg("volume_level", AttrValue::Num(value)),
                    ),
                    None => Reaction::none(),
                }
            }
            GestureEventKind::Tap => match self.button_at(event.x, event.y) {
                Some(button) => Reaction::call(
                    Repaint::Full,
                    ServiceCall::new("media_player", button.action(), &self.entity_id),
                ),
                None => Reaction::none(),
            },
            GestureEventKind::Hold => Reaction::none(),
            GestureEventKind::Cancel => {
                self.on_track = false;
                self.volume.cancel();
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
                &self.title,
                self.frame.x + self.frame.width as i32 / 2,
                self.frame.y + 14,
                render::label_style(render::TEXT),
            )?;
            render::draw_text_centered(
                target,
                &self.state,
                self.frame.x + self.frame.width as i32 / 2,
                self.frame.y + 26,
                render::label_style(render::TEXT_DIM),
            )?;
            for (rect, button) in self.buttons.iter().zip(Transport::ALL) {
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

        render::draw_linear_track(
            target,
            self.track,
            Axis::Horizontal,
            false,
            self.shown_volume(),
        )?;
        let mut readout: String<8> = String::new();
        let _ = write!(readout, "{}%", (self.shown_volume() * 100.0) as i32);
        render::fill_rect(
            target,
            Rect::new(self.track.right() - 40, self.track.y - 12, 40, 12),
            render::PANEL,
        )?;
        render::draw_text_centered(
            target,
            &readout,
            self.track.right() - 20,
            self.track.y - 3,
            render::label_style(render::TEXT),
        )
    }
}
