//! The widget family. Each widget owns its entities' rendered state, reacts
//! to routed gesture events with at most one service call per commit, and
//! draws itself onto any `Rgb565` target in either full or live scope.

pub mod button;
pub mod cover;
pub mod light;
pub mod media;
pub mod navbar;
pub mod printer;
pub mod sidebar;
pub mod thermostat;
pub mod vacuum;

pub use button::ButtonTile;
pub use cover::CoverCard;
pub use light::LightCard;
pub use media::MediaCard;
pub use navbar::NavBar;
pub use printer::PrinterCard;
pub use sidebar::Sidebar;
pub use thermostat::ThermostatCard;
pub use vacuum::VacuumCard;

use embedded_graphics::{draw_target::DrawTarget, pixelcolor::Rgb565};
use heapless::{String, Vec};

use crate::entity::{EntitySnapshot, ENTITY_ID_MAX};
use crate::geometry::{Axis, Rect, Repaint};
use crate::host::ServiceCall;
use crate::input::session::{PointerSession, WidgetId};
use crate::input::types::GestureEvent;
use crate::render::RenderScope;

/// At most one commit call plus one auxiliary call per gesture event.
pub const REACTION_CALLS_MAX: usize = 2;

/// What a widget wants done after handling an event: repaint some of
/// itself, and possibly have the host invoke calls.
#[derive(Clone, Debug, Default)]
pub struct Reaction {
    pub repaint: Repaint,
    pub calls: Vec<ServiceCall, REACTION_CALLS_MAX>,
}

impl Reaction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn repaint(repaint: Repaint) -> Self {
        Self {
            repaint,
            calls: Vec::new(),
        }
    }

    pub fn call(repaint: Repaint, call: ServiceCall) -> Self {
        let mut calls = Vec::new();
        let _ = calls.push(call);
        Self { repaint, calls }
    }
}

pub trait Widget {
    fn id(&self) -> WidgetId;

    /// Hit region the pointer session routes by.
    fn bounds(&self) -> Rect;

    /// Drag axis this widget insists on, if any. Taps are unaffected.
    fn axis_lock(&self) -> Option<Axis> {
        None
    }

    /// Host pushed fresh entity state. Returns what needs repainting.
    fn sync(&mut self, now_ms: u64, snapshot: &EntitySnapshot) -> Repaint;

    /// A gesture event routed to this widget by the session.
    fn gesture(&mut self, event: &GestureEvent) -> Reaction;

    fn draw<D: DrawTarget<Color = Rgb565>>(
        &self,
        target: &mut D,
        scope: RenderScope,
    ) -> Result<(), D::Error>;
}

/// Subscribe a widget to its session with the bounds and axis lock it
/// reports.
pub fn register<W: Widget>(session: &mut PointerSession, widget: &W) {
    session.register(widget.id(), widget.bounds(), widget.axis_lock());
}

pub(crate) fn bounded_id(entity_id: &str) -> String<ENTITY_ID_MAX> {
    let mut id = String::new();
    for ch in entity_id.chars() {
        if id.push(ch).is_err() {
            break;
        }
    }
    id
}
