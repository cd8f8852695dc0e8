//! Dashboard widgets for a home-automation frontend.
//!
//! The host owns entity storage, transport and authentication; this crate
//! owns what happens between a pushed entity snapshot and the next outbound
//! service call: pointer normalization, gesture classification, value
//! mapping, optimistic repaint and commit pacing. Everything is
//! deterministic — time enters exclusively as `now_ms` arguments, input
//! enters as explicit samples, and outbound calls leave as values.

#![cfg_attr(not(test), no_std)]

pub mod commit;
pub mod control;
pub mod entity;
pub mod geometry;
pub mod host;
pub mod input;
pub mod reconcile;
#[cfg(feature = "graphics")]
pub mod render;
#[cfg(feature = "graphics")]
pub mod widgets;

pub use commit::{CommitController, CommitPolicy};
pub use control::{AnalogControl, ControlSpec, TrackGeometry};
pub use entity::{AttrValue, EntitySnapshot, EntityState};
pub use geometry::{Axis, Rect, Repaint};
pub use host::{HostError, HostLink, ServiceCall};
pub use input::session::{PointerSession, SessionOutput, WidgetId};
pub use input::types::{GestureEvent, GestureEventKind, PointerSample};
