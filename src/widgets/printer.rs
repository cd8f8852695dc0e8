//! 3D-printer panel: job progress and temperatures, refreshed on a fixed
//! polling interval because printer integrations rarely push on their own.
//!
//! No analog control lives here; the panel is read-only apart from the
//! periodic refresh request the host is asked to forward.

use core::fmt::Write as _;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::String;

use crate::entity::{EntitySnapshot, NumAttr, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::WidgetId;
use crate::input::types::GestureEvent;
use crate::render::{self, RenderScope};
use crate::widgets::{Reaction, Widget};

const PROGRESS: NumAttr = NumAttr::new("progress", 0.0);
const NOZZLE: NumAttr = NumAttr::new("nozzle_temperature", 0.0);
const BED: NumAttr = NumAttr::new("bed_temperature", 0.0);

/// How often the host is asked to refresh the printer state.
pub const REFRESH_INTERVAL_MS: u64 = 5_000;

const BAR_HEIGHT: u32 = 12;

pub struct PrinterCard {
    id: WidgetId,
    entity_id: String<ENTITY_ID_MAX>,
    frame: Rect,
    bar: Rect,
    state: String<24>,
    progress: f32,
    nozzle: f32,
    bed: f32,
    next_refresh_ms: u64,
}

impl PrinterCard {
    pub fn new(id: WidgetId, entity_id: &str, frame: Rect) -> Self {
        let bar = Rect::new(
            frame.x + 8,
            frame.bottom() - BAR_HEIGHT as i32 - 8,
            frame.width.saturating_sub(16),
            BAR_HEIGHT,
        );
        Self {
            id,
            entity_id: crate::widgets::bounded_id(entity_id),
            frame,
            bar,
            state: String::new(),
            progress: 0.0,
            nozzle: 0.0,
            bed: 0.0,
            next_refresh_ms: 0,
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Non-blocking poll hook. Returns the refresh request when the
    /// interval deadline has passed; the host forwards it like any other
    /// service call.
    pub fn tick(&mut self, now_ms: u64) -> Option<ServiceCall> {
        if now_ms < self.next_refresh_ms {
            return None;
        }
        self.next_refresh_ms = now_ms + REFRESH_INTERVAL_MS;
        Some(ServiceCall::new("printer", "refresh", &self.entity_id))
    }
}

impl Widget for PrinterCard {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.frame
    }

    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint {
        let _ = now_ms;
        let Some(entity) = snapshot.get(&self.entity_id) else {
            return Repaint::None;
        };

        let mut repaint = Repaint::None;
        if self.state.as_str() != entity.state() {
            self.state.clear();
            let _ = self.state.push_str(entity.state());
            repaint = Repaint::Full;
        }
        let progress = PROGRESS.read(entity).clamp(0.0, 100.0);
        if progress != self.progress {
            self.progress = progress;
            repaint = repaint.merge(Repaint::Partial(self.bar));
        }
        let nozzle = NOZZLE.read(entity);
        let bed = BED.read(entity);
        if nozzle != self.nozzle || bed != self.bed {
            self.nozzle = nozzle;
            self.bed = bed;
            repaint = repaint.merge(Repaint::Full);
        }
        repaint
    }

    fn gesture(&mut self, _event: &GestureEvent) -> Reaction {
        Reaction::none()
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
            let mut temps: String<24> = String::new();
            let _ = write!(temps, "noz {}C bed {}C", self.nozzle as i32, self.bed as i32);
            render::draw_text_centered(
                target,
                &temps,
                self.frame.x + self.frame.width as i32 / 2,
                self.frame.y + 26,
                render::label_style(render::TEXT_DIM),
            )?;
        }

        render::draw_linear_track(
            target,
            self.bar,
            Axis::Horizontal,
            false,
            self.progress / 100.0,
        )?;
        let mut readout: String<8> = String::new();
        let _ = write!(readout, "{}%", self.progress as i32);
        render::fill_rect(
            target,
            Rect::new(self.bar.x, self.bar.y - 12, self.bar.width, 12),
            render::PANEL,
        )?;
        render::draw_text_centered(
            target,
            &readout,
            self.bar.x + self.bar.width as i32 / 2,
            self.bar.y - 3,
            render::label_style(render::TEXT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{AttrValue, EntityState};

    fn card() -> PrinterCard {
        PrinterCard::new(WidgetId(13), "printer.voron", Rect::new(0, 0, 200, 90))
    }

    #[test]
    fn refresh_fires_on_the_interval_deadline() {
        let mut card = card();
        let first = card.tick(0).expect("initial refresh");
        assert_eq!((first.domain, first.action), ("printer", "refresh"));
        assert!(card.tick(1_000).is_none());
        assert!(card.tick(4_999).is_none());
        assert!(card.tick(5_000).is_some());
        // Deadline restarts from the tick that fired, not from the epoch.
        assert!(card.tick(9_000).is_none());
        assert!(card.tick(10_000).is_some());
    }

    #[test]
    fn progress_changes_repaint_only_the_bar() {
        let mut card = card();
        let mut snapshot = EntitySnapshot::new();
        snapshot.insert(
            "printer.voron",
            EntityState::new("printing")
                .with_attr("progress", AttrValue::Num(10.0))
                .with_attr("nozzle_temperature", AttrValue::Num(240.0))
                .with_attr("bed_temperature", AttrValue::Num(95.0)),
        );
        assert_eq!(card.sync(0, &snapshot), Repaint::Full);

        snapshot.insert(
            "printer.voron",
            EntityState::new("printing")
                .with_attr("progress", AttrValue::Num(11.0))
                .with_attr("nozzle_temperature", AttrValue::Num(240.0))
                .with_attr("bed_temperature", AttrValue::Num(95.0)),
        );
        let repaint = card.sync(1_000, &snapshot);
        assert!(matches!(repaint, Repaint::Partial(_)));
        assert_eq!(card.progress(), 11.0);
    }

    #[test]
    fn out_of_range_progress_is_clamped() {
        let mut card = card();
        let mut snapshot = EntitySnapshot::new();
        snapshot.insert(
            "printer.voron",
            EntityState::new("printing").with_attr("progress", AttrValue::Num(140.0)),
        );
        card.sync(0, &snapshot);
        assert_eq!(card.progress(), 100.0);
    }
}
