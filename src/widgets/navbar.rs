//! Navigation bar: a horizontal row of equally-wide view slots, one
//! active. The tap-selection twin of the sidebar for layouts without a
//! side column.

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::{String, Vec};

use crate::entity::EntitySnapshot;
use crate::geometry::{Rect, Repaint};
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

pub const NAVBAR_SLOTS_MAX: usize = 6;

pub struct NavBar {
    id: WidgetId,
    frame: Rect,
    slots: Vec<String<12>, NAVBAR_SLOTS_MAX>,
    selected: usize,
}

impl NavBar {
    pub fn new(id: WidgetId, frame: Rect, labels: &[&str]) -> Self {
        let mut slots = Vec::new();
        for label in labels {
            let mut slot: String<12> = String::new();
            for ch in label.chars() {
                if slot.push(ch).is_err() {
                    break;
                }
            }
            if slots.push(slot).is_err() {
                break;
            }
        }
        Self {
            id,
            frame,
            slots,
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn slot_width(&self) -> u32 {
        let count = self.slots.len().max(1) as u32;
        self.frame.width / count
    }

    fn slot_at(&self, x: i32) -> Option<usize> {
        if x < self.frame.x || self.slots.is_empty() {
            return None;
        }
        let index = ((x - self.frame.x) / self.slot_width() as i32) as usize;
        (index < self.slots.len()).then_some(index)
    }

    fn slot_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.frame.x + index as i32 * self.slot_width() as i32,
            self.frame.y,
            self.slot_width(),
            self.frame.height,
        )
    }
}

impl Widget for NavBar {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn sync(&mut self, _now_ms: u64, _snapshot: &EntitySnapshot) -> Repaint {
        Repaint::None
    }

    fn gesture(&mut self, event: &GestureEvent) -> Reaction {
        match event.kind {
            GestureEventKind::Tap => match self.slot_at(event.x) {
                Some(index) if index != self.selected => {
                    self.selected = index;
                    Reaction::repaint(Repaint::Full)
                }
                _ => Reaction::none(),
            },
            _ => Reaction::none(),
        }
    }

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        _scope: RenderScope,
    ) -> Result<(), D::Error> {
        render::fill_rect(target, self.frame, render::BG)?;
        for (index, label) in self.slots.iter().enumerate() {
            let slot = self.slot_rect(index);
            if index == self.selected {
                render::fill_rect(target, slot, render::PANEL)?;
                render::fill_rect(
                    target,
                    Rect::new(slot.x, slot.bottom() - 3, slot.width, 3),
                    render::ACCENT,
                )?;
            }
            let (cx, cy) = slot.center();
            render::draw_text_centered(
                target,
                label,
                cx,
                cy + 3,
                render::label_style(if index == self.selected {
                    render::TEXT
                } else {
                    render::TEXT_DIM
                }),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navbar() -> NavBar {
        NavBar::new(
            WidgetId(21),
            Rect::new(0, 0, 300, 32),
            &["home", "rooms", "energy"],
        )
    }

    fn tap(x: i32) -> GestureEvent {
        GestureEvent {
            kind: GestureEventKind::Tap,
            t_ms: 0,
            x,
            y: 10,
            start_x: x,
            start_y: 10,
            duration_ms: 80,
        }
    }

    #[test]
    fn tap_selects_the_hit_slot() {
        let mut navbar = navbar();
        let reaction = navbar.gesture(&tap(150));
        assert_eq!(reaction.repaint, Repaint::Full);
        assert_eq!(navbar.selected(), 1);
        navbar.gesture(&tap(250));
        assert_eq!(navbar.selected(), 2);
    }

    #[test]
    fn repeated_tap_is_quiet() {
        let mut navbar = navbar();
        navbar.gesture(&tap(150));
        let reaction = navbar.gesture(&tap(160));
        assert_eq!(reaction.repaint, Repaint::None);
    }
}
