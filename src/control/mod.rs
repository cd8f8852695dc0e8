//! One analog control: static geometry, the two value provenances, and the
//! commit pacing that joins them.

pub mod map;
pub mod spec;

pub use self::map::bearing_deg;
pub use self::spec::{ControlSpec, TrackGeometry};

use crate::commit::{CommitController, CommitPolicy};
use crate::reconcile::{authoritative_action, ReconcileAction};

/// Result of feeding one drag position into a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragUpdate {
    /// The quantized value the control now shows.
    pub value: f32,
    /// Paced policy only: this value should go out as a call right now.
    pub send_now: bool,
}

/// Per-control engine tying the spec, the authoritative/proposed value pair
/// and the commit controller together.
///
/// `proposed` is written by drags and read exactly once, by
/// [`AnalogControl::release`]; it survives past the gesture only to keep
/// the committed value on screen until the host echo arrives or the
/// suppression window lapses.
#[derive(Clone, Copy, Debug)]
pub struct AnalogControl {
    spec: ControlSpec,
    commit: CommitController,
    authoritative: Option<f32>,
    proposed: Option<f32>,
    interacting: bool,
}

impl AnalogControl {
    pub fn new(spec: ControlSpec, policy: CommitPolicy) -> Self {
        Self {
            spec,
            commit: CommitController::new(policy),
            authoritative: None,
            proposed: None,
            interacting: false,
        }
    }

    pub fn spec(&self) -> ControlSpec {
        self.spec
    }

    pub fn is_interacting(&self) -> bool {
        self.interacting
    }

    pub fn authoritative(&self) -> Option<f32> {
        self.authoritative
    }

    /// The value the widget should render right now: the local proposal
    /// while one is alive, the authoritative value otherwise.
    pub fn shown_value(&self) -> Option<f32> {
        self.proposed.or(self.authoritative)
    }

    /// Pointer went down on this control. Cancels a pending suppression
    /// window: the new gesture supersedes whatever the last commit was
    /// protecting.
    pub fn begin(&mut self) {
        self.interacting = true;
        self.commit.begin_interaction();
    }

    /// Accepted drag motion mapped to a (possibly unquantized) domain
    /// value. Returns what to show and whether a paced call is due.
    pub fn drag_to(&mut self, now_ms: u64, value: f32) -> DragUpdate {
        let value = self.spec.quantize(value);
        self.interacting = true;
        self.proposed = Some(value);
        let send_now = self.commit.pace_due(now_ms, value);
        DragUpdate { value, send_now }
    }

    /// Gesture released: returns the value to commit, if any. The proposal
    /// stays visible until reconciliation replaces it.
    pub fn release(&mut self, now_ms: u64) -> Option<f32> {
        self.interacting = false;
        self.commit.release_value(now_ms, self.proposed)
    }

    /// Gesture aborted: drop the proposal so the next paint comes from the
    /// authoritative value.
    pub fn cancel(&mut self) {
        self.interacting = false;
        self.proposed = None;
    }

    /// Host pushed a new authoritative value. Always stored; the returned
    /// action says whether the rendered value changed.
    pub fn apply_authoritative(&mut self, now_ms: u64, value: f32) -> ReconcileAction {
        self.authoritative = Some(value);
        let action = authoritative_action(self.interacting, self.commit.suppressed(now_ms));
        if action == ReconcileAction::Repaint {
            self.proposed = None;
        }
        action
    }
}
