//! Sidebar: a vertical list of view names; tapping a row selects it. The
//! selection stays local — navigation is the host's job, it reads
//! [`Sidebar::selected`] after the reaction.

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::{String, Vec};

use crate::entity::EntitySnapshot;
use crate::geometry::{Rect, Repaint};
use crate::input::session::WidgetId;
use crate::input::types::{GestureEvent, GestureEventKind};
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

pub const SIDEBAR_ITEMS_MAX: usize = 8;
const ROW_HEIGHT: u32 = 28;

pub struct Sidebar {
    id: WidgetId,
    frame: Rect,
    items: Vec<String<16>, SIDEBAR_ITEMS_MAX>,
    selected: usize,
}

impl Sidebar {
    pub fn new(id: WidgetId, frame: Rect, labels: &[&str]) -> Self {
        let mut items = Vec::new();
        for label in labels {
            let mut item: String<16> = String::new();
            for ch in label.chars() {
                if item.push(ch).is_err() {
                    break;
                }
            }
            if items.push(item).is_err() {
                break;
            }
        }
        Self {
            id,
            frame,
            items,
            selected: 0,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn row_at(&self, y: i32) -> Option<usize> {
        if y < self.frame.y {
            return None;
        }
        let index = ((y - self.frame.y) / ROW_HEIGHT as i32) as usize;
        (index < self.items.len()).then_some(index)
    }

    fn row_rect(&self, index: usize) -> Rect {
        Rect::new(
            self.frame.x,
            self.frame.y + index as i32 * ROW_HEIGHT as i32,
            self.frame.width,
            ROW_HEIGHT,
        )
    }
}

impl Widget for Sidebar {
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
            GestureEventKind::Tap => match self.row_at(event.y) {
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
        for (index, item) in self.items.iter().enumerate() {
            let row = self.row_rect(index);
            if index == self.selected {
                render::fill_rect(target, row, render::PANEL)?;
                render::fill_rect(
                    target,
                    Rect::new(row.x, row.y, 3, row.height),
                    render::ACCENT,
                )?;
            }
            render::draw_text_centered(
                target,
                item,
                row.x + row.width as i32 / 2,
                row.y + row.height as i32 / 2 + 3,
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

    fn sidebar() -> Sidebar {
        Sidebar::new(
            WidgetId(20),
            Rect::new(0, 0, 80, 240),
            &["home", "lights", "climate", "media"],
        )
    }

    fn tap(y: i32) -> GestureEvent {
        GestureEvent {
            kind: GestureEventKind::Tap,
            t_ms: 0,
            x: 10,
            y,
            start_x: 10,
            start_y: y,
            duration_ms: 80,
        }
    }

    #[test]
    fn tap_selects_the_hit_row() {
        let mut sidebar = sidebar();
        let reaction = sidebar.gesture(&tap(2 * 28 + 4));
        assert_eq!(reaction.repaint, Repaint::Full);
        assert_eq!(sidebar.selected(), 2);
    }

    #[test]
    fn tap_on_the_current_row_changes_nothing() {
        let mut sidebar = sidebar();
        let reaction = sidebar.gesture(&tap(4));
        assert_eq!(reaction.repaint, Repaint::None);
        assert_eq!(sidebar.selected(), 0);
    }

    #[test]
    fn tap_below_the_last_row_is_ignored() {
        let mut sidebar = sidebar();
        let reaction = sidebar.gesture(&tap(4 * 28 + 4));
        assert_eq!(reaction.repaint, Repaint::None);
        assert_eq!(sidebar.selected(), 0);
    }
}
