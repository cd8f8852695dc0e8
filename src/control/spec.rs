use libm::roundf;

use crate::geometry::Axis;

/// Static geometry of one analog control, fixed at configuration time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrackGeometry {
    /// Straight track. `invert` flips the measuring direction, e.g. vertical
    /// tracks that fill from the bottom edge.
    Linear {
        length_px: f32,
        axis: Axis,
        invert: bool,
    },
    /// Ring or wheel. Bearings are degrees with straight up as 0 and
    /// clockwise positive; a sweep of 360 or more makes the control a full
    /// wheel that wraps instead of clamping.
    Angular { start_deg: f32, end_deg: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSpec {
    pub geometry: TrackGeometry,
    pub domain_min: f32,
    pub domain_max: f32,
    pub step: f32,
}

impl ControlSpec {
    pub const fn linear(
        length_px: f32,
        axis: Axis,
        invert: bool,
        domain_min: f32,
        domain_max: f32,
        step: f32,
    ) -> Self {
        Self {
            geometry: TrackGeometry::Linear {
                length_px,
                axis,
                invert,
            },
            domain_min,
            domain_max,
            step,
        }
    }

    pub const fn angular(
        start_deg: f32,
        end_deg: f32,
        domain_min: f32,
        domain_max: f32,
        step: f32,
    ) -> Self {
        Self {
            geometry: TrackGeometry::Angular { start_deg, end_deg },
            domain_min,
            domain_max,
            step,
        }
    }

    pub fn span(&self) -> f32 {
        self.domain_max - self.domain_min
    }

    /// Axis a linear control insists on before accepting a drag. Angular
    /// controls take motion from any direction.
    pub fn axis_lock(&self) -> Option<Axis> {
        match self.geometry {
            TrackGeometry::Linear { axis, .. } => Some(axis),
            TrackGeometry::Angular { .. } => None,
        }
    }

    /// Round to the configured step and clamp into the domain range.
    pub fn quantize(&self, value: f32) -> f32 {
        let clamped = value.clamp(self.domain_min, self.domain_max);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = roundf((clamped - self.domain_min) / self.step);
        (self.domain_min + steps * self.step).clamp(self.domain_min, self.domain_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_rounds_to_step() {
        let spec = ControlSpec::linear(280.0, Axis::Horizontal, false, 0.0, 100.0, 1.0);
        assert_eq!(spec.quantize(41.6), 42.0);
        assert_eq!(spec.quantize(-5.0), 0.0);
        assert_eq!(spec.quantize(120.0), 100.0);
    }

    #[test]
    fn quantize_handles_fractional_steps() {
        let spec = ControlSpec::angular(-135.0, 135.0, 7.0, 35.0, 0.5);
        assert_eq!(spec.quantize(21.26), 21.5);
        assert_eq!(spec.quantize(21.24), 21.0);
    }

    #[test]
    fn zero_step_only_clamps() {
        let spec = ControlSpec::linear(100.0, Axis::Horizontal, false, 0.0, 1.0, 0.0);
        assert_eq!(spec.quantize(0.3333), 0.3333);
        assert_eq!(spec.quantize(7.0), 1.0);
    }

    #[test]
    fn axis_lock_follows_geometry() {
        let track = ControlSpec::linear(100.0, Axis::Vertical, true, 0.0, 100.0, 1.0);
        assert_eq!(track.axis_lock(), Some(Axis::Vertical));
        let dial = ControlSpec::angular(-135.0, 135.0, 7.0, 35.0, 0.5);
        assert_eq!(dial.axis_lock(), None);
    }
}
