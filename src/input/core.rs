use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::geometry::Axis;

use super::types::{
    GestureEvent, GestureEventKind, GestureOutput, PointerPhase, PointerSample,
};

/// Travel (in px) at which an armed press becomes a drag.
const DRAG_START_PX: i32 = 10;
/// Presses shorter than this with sub-threshold travel classify as taps.
const TAP_MAX_MS: u64 = 500;
/// Presses held at least this long with sub-threshold travel classify as holds.
const HOLD_MIN_MS: u64 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Armed,
    Dragging,
}

#[derive(Clone, Copy, Debug)]
enum GestureInput {
    Sample(PointerSample),
    Cancel { now_ms: u64 },
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    events: [Option<GestureEvent>; 3],
}

impl DispatchContext {
    fn emit(&mut self, event: GestureEvent) {
        for slot in &mut self.events {
            if slot.is_none() {
                *slot = Some(event);
                return;
            }
        }
    }

    fn finish(self) -> GestureOutput {
        GestureOutput {
            events: self.events,
        }
    }
}

/// Classifies a normalized pointer stream into taps, holds and drags.
///
/// One engine instance serves one control at a time; the session re-arms it
/// with the target control's axis lock on every press.
pub struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl GestureEngine {
    pub fn new(axis_lock: Option<Axis>) -> Self {
        Self {
            machine: GestureHsm::new(axis_lock).state_machine(),
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.machine.inner().phase
    }

    pub fn feed(&mut self, sample: PointerSample) -> GestureOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureInput::Sample(sample), &mut context);
        context.finish()
    }

    /// Force the gesture back to idle (pointer left the document, window
    /// blur). Emits `Cancel` if a press or drag was in progress.
    pub fn cancel(&mut self, now_ms: u64) -> GestureOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureInput::Cancel { now_ms }, &mut context);
        context.finish()
    }
}

struct GestureHsm {
    axis_lock: Option<Axis>,
    phase: GesturePhase,
    origin_x: i32,
    origin_y: i32,
    down_ms: u64,
    last_x: i32,
    last_y: i32,
    max_travel_sq: i32,
    axis_decided: bool,
    axis_rejected: bool,
    hold_emitted: bool,
}

impl GestureHsm {
    fn new(axis_lock: Option<Axis>) -> Self {
        Self {
            axis_lock,
            phase: GesturePhase::Idle,
            origin_x: 0,
            origin_y: 0,
            down_ms: 0,
            last_x: 0,
            last_y: 0,
            max_travel_sq: 0,
            axis_decided: false,
            axis_rejected: false,
            hold_emitted: false,
        }
    }

    fn begin_press(&mut self, sample: PointerSample) {
        self.origin_x = sample.x;
        self.origin_y = sample.y;
        self.down_ms = sample.t_ms;
        self.last_x = sample.x;
        self.last_y = sample.y;
        self.max_travel_sq = 0;
        self.axis_decided = false;
        self.axis_rejected = false;
        self.hold_emitted = false;
    }

    fn observe(&mut self, sample: PointerSample) {
        self.last_x = sample.x;
        self.last_y = sample.y;
        let travel = squared_distance(
            sample.x - self.origin_x,
            sample.y - self.origin_y,
        );
        if travel > self.max_travel_sq {
            self.max_travel_sq = travel;
        }
    }

    fn duration_ms(&self, now_ms: u64) -> u32 {
        now_ms.saturating_sub(self.down_ms).min(u32::MAX as u64) as u32
    }

    fn build_event(&self, kind: GestureEventKind, now_ms: u64, x: i32, y: i32) -> GestureEvent {
        GestureEvent {
            kind,
            t_ms: now_ms,
            x,
            y,
            start_x: self.origin_x,
            start_y: self.origin_y,
            duration_ms: self.duration_ms(now_ms),
        }
    }

    fn emit(
        &self,
        context: &mut DispatchContext,
        kind: GestureEventKind,
        now_ms: u64,
        x: i32,
        y: i32,
    ) {
        context.emit(self.build_event(kind, now_ms, x, y));
    }

    fn crossed_drag_threshold(&self) -> bool {
        self.max_travel_sq >= DRAG_START_PX * DRAG_START_PX
    }

    /// Once travel crosses the threshold the dominant axis decides, once,
    /// whether this control accepts the drag at all. A mismatch downgrades
    /// the whole gesture to tap handling.
    fn accepts_drag(&mut self, sample: PointerSample) -> bool {
        if self.axis_decided {
            return !self.axis_rejected;
        }
        self.axis_decided = true;
        if let Some(axis) = self.axis_lock {
            let dx = (sample.x - self.origin_x).abs();
            let dy = (sample.y - self.origin_y).abs();
            let dominant = if dx >= dy {
                Axis::Horizontal
            } else {
                Axis::Vertical
            };
            if dominant != axis {
                self.axis_rejected = true;
                return false;
            }
        }
        true
    }

    fn classify_release(&mut self, context: &mut DispatchContext, now_ms: u64) {
        // Axis-rejected travel still taps; a hold stays reserved for
        // presses that never really moved.
        let travel_ok = !self.crossed_drag_threshold() || self.axis_rejected;
        let duration = now_ms.saturating_sub(self.down_ms);
        if !self.hold_emitted && !self.crossed_drag_threshold() && duration >= HOLD_MIN_MS {
            self.hold_emitted = true;
            self.emit(context, GestureEventKind::Hold, now_ms, self.last_x, self.last_y);
        }
        self.emit(context, GestureEventKind::Up, now_ms, self.last_x, self.last_y);
        if !self.hold_emitted && travel_ok && duration < TAP_MAX_MS {
            self.emit(context, GestureEventKind::Tap, now_ms, self.last_x, self.last_y);
        }
    }

    fn emit_cancel(&mut self, context: &mut DispatchContext, now_ms: u64) {
        self.emit(
            context,
            GestureEventKind::Cancel,
            now_ms,
            self.last_x,
            self.last_y,
        );
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureInput) -> Outcome<State> {
        match event {
            GestureInput::Sample(sample) if sample.phase == PointerPhase::Press => {
                self.begin_press(*sample);
                self.emit(context, GestureEventKind::Down, sample.t_ms, sample.x, sample.y);
                self.phase = GesturePhase::Armed;
                Transition(State::armed())
            }
            _ => Handled,
        }
    }

    #[state]
    fn armed(&mut self, context: &mut DispatchContext, event: &GestureInput) -> Outcome<State> {
        match event {
            GestureInput::Sample(sample) => match sample.phase {
                PointerPhase::Move => {
                    self.observe(*sample);
                    if self.crossed_drag_threshold() && self.accepts_drag(*sample) {
                        self.phase = GesturePhase::Dragging;
                        self.emit(
                            context,
                            GestureEventKind::Move,
                            sample.t_ms,
                            sample.x,
                            sample.y,
                        );
                        return Transition(State::dragging());
                    }
                    if !self.hold_emitted
                        && !self.crossed_drag_threshold()
                        && sample.t_ms.saturating_sub(self.down_ms) >= HOLD_MIN_MS
                    {
                        self.hold_emitted = true;
                        self.emit(
                            context,
                            GestureEventKind::Hold,
                            sample.t_ms,
                            sample.x,
                            sample.y,
                        );
                    }
                    Handled
                }
                PointerPhase::Release => {
                    self.observe(*sample);
                    self.classify_release(context, sample.t_ms);
                    self.phase = GesturePhase::Idle;
                    Transition(State::idle())
                }
                PointerPhase::Press => Handled,
            },
            GestureInput::Cancel { now_ms } => {
                self.emit_cancel(context, *now_ms);
                self.phase = GesturePhase::Idle;
                Transition(State::idle())
            }
        }
    }

    #[state]
    fn dragging(&mut self, context: &mut DispatchContext, event: &GestureInput) -> Outcome<State> {
        match event {
            GestureInput::Sample(sample) => match sample.phase {
                PointerPhase::Move => {
                    self.observe(*sample);
                    self.emit(
                        context,
                        GestureEventKind::Move,
                        sample.t_ms,
                        sample.x,
                        sample.y,
                    );
                    Handled
                }
                PointerPhase::Release => {
                    self.observe(*sample);
                    self.emit(
                        context,
                        GestureEventKind::Up,
                        sample.t_ms,
                        sample.x,
                        sample.y,
                    );
                    self.phase = GesturePhase::Idle;
                    Transition(State::idle())
                }
                PointerPhase::Press => Handled,
            },
            GestureInput::Cancel { now_ms } => {
                self.emit_cancel(context, *now_ms);
                self.phase = GesturePhase::Idle;
                Transition(State::idle())
            }
        }
    }
}

fn squared_distance(dx: i32, dy: i32) -> i32 {
    dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
}
