//! Action tile: one entity, one tap action, an optional hold action.

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::entity::{EntitySnapshot, ENTITY_ID_MAX};
use crate::geometry::{Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

/// Service invoked by a tap or hold, bound to the tile's entity at
/// dispatch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionSpec {
    pub domain: &'static str,
    pub action: &'static str,
}

impl ActionSpec {
    pub const fn new(domain: &'static str, action: &'static str) -> Self {
        Self { domain, action }
    }
}

pub struct ButtonTile {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    label: String<16>,
    tap: ActionSpec,
    hold: Option<ActionSpec>,
    state: String<24>,
    pressed: bool,
}

impl ButtonTile {
    pub fn new(
        id: WidgetId,
        entity_id: &str,
        frame: Rect,
        label: &str,
        tap: ActionSpec,
        hold: Option<ActionSpec>,
    ) -> Self {
        let mut bounded_label = String::new();
        for ch in label.chars() {
            if bounded_label.push(ch).is_err() {
                break;
            }
        }
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            label: bounded_label,
            tap,
            hold,
            state: String::new(),
            pressed: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.as_str() == "on"
    }
}

impl Widget for ButtonTile {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn sync(&mut self, _now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };
        if self.state.as_str() == entity.state() {
            return Repaint::None;
        }
        self.state.clear();
        let _ = self.state.push_str(entity.state());
        Repaint::Full
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Down => {
                self.pressed = true;
                Reaction::repaint(Repaint::Full)
            }
            GestureEventKind::Up | GestureEventKind::Cancel => {
                let was_pressed = core::mem::replace(&mut self.pressed, false);
                if was_pressed {
                    Reaction::repaint(Repaint::Full)
                } else {
                    Reaction::none()
                }
            }
            GestureEventKind::Tap => Reaction::call(
                Repaint::Full,
                ServiceCall::new(self.tap.domain, self.tap.action, &self.entity_id),
            ),
            GestureEventKind::Hold => match self.hold {
                Some(hold) => Reaction::call(
                    Repaint::Full,
                    ServiceCall::new(hold.domain, hold.action, &self.entity_id),
                ),
                None => Reaction::none(),
            },
            GestureEventKind::Move => Reaction::none(),
        }
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        _scope: RenderScope,
    ) -> Result<(), D::Error> {
        let bg = if self.pressed {
            render::OUTLINE
        } else if self.is_active() {
            render::FILL
        } else {
            render::PANEL
        };
        render::fill_rect(target, self.frame, bg)?;
        render::stroke_rect(target, self.frame, render::OUTLINE)?;
        let (cx, cy) = self.frame.center();
        render::draw_text_centered(
            target,
            &self.label,
            cx,
            cy - 2,
            render::label_style(render::TEXT),
        )?;
        render::draw_text_centered(
            target,
            &self.state,
            cx,
            cy + 10,
            render::label_style(render::TEXT_DIM),
        )
    }
}
