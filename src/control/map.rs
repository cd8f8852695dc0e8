//! Pointer position ↔ domain value mapping.
//!
//! Forward mapping feeds live drags; the inverse feeds initial render and
//! reconciliation, and must round-trip within one quantization step or the
//! control visibly jumps after a commit.

use libm::{atan2f, floorf, roundf};

use super::spec::{ControlSpec, TrackGeometry};

const DEG_PER_RAD: f32 = 180.0 / core::f32::consts::PI;

/// Bearing of a point relative to a center, in degrees: straight up is 0,
/// clockwise positive, range (-180, 180].
pub fn bearing_deg(dx: f32, dy: f32) -> f32 {
    atan2f(dx, -dy) * DEG_PER_RAD
}

impl ControlSpec {
    /// Domain value for an offset along a linear track, measured from the
    /// track start in pixels. Out-of-track offsets clamp to the ends.
    pub fn value_at_offset(&self, offset_px: f32) -> f32 {
        let ratio = match self.geometry {
            TrackGeometry::Linear {
                length_px, invert, ..
            } => {
                let raw = if length_px > 0.0 {
                    (offset_px / length_px).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                if invert {
                    1.0 - raw
                } else {
                    raw
                }
            }
            TrackGeometry::Angular { .. } => return self.quantize(self.domain_min),
        };
        self.quantize(self.domain_min + ratio * self.span())
    }

    /// Domain value for a pointer bearing on an angular track. Bearings
    /// outside a partial sweep clamp to the nearest endpoint; full wheels
    /// (sweep >= 360) wrap instead.
    pub fn value_at_bearing(&self, bearing: f32) -> f32 {
        let TrackGeometry::Angular { start_deg, end_deg } = self.geometry else {
            return self.quantize(self.domain_min);
        };
        let sweep = end_deg - start_deg;
        if sweep <= 0.0 {
            return self.quantize(self.domain_min);
        }
        let ratio = if sweep >= 360.0 {
            wrap_into(bearing, start_deg) / sweep
        } else {
            let b = wrap_180(bearing);
            if b >= start_deg && b <= end_deg {
                (b - start_deg) / sweep
            } else if angular_distance(b, start_deg) < angular_distance(b, end_deg) {
                0.0
            } else {
                1.0
            }
        };
        self.quantize(self.domain_min + ratio * self.span())
    }

    /// Inverse of [`value_at_offset`]: pixel offset along the track for a
    /// domain value.
    pub fn offset_for_value(&self, value: f32) -> f32 {
        let TrackGeometry::Linear {
            length_px, invert, ..
        } = self.geometry
        else {
            return 0.0;
        };
        let ratio = self.ratio_for_value(value, invert);
        ratio * length_px
    }

    /// Inverse of [`value_at_bearing`]: bearing for a domain value.
    pub fn bearing_for_value(&self, value: f32) -> f32 {
        let TrackGeometry::Angular { start_deg, end_deg } = self.geometry else {
            return 0.0;
        };
        start_deg + self.ratio_for_value(value, false) * (end_deg - start_deg)
    }

    fn ratio_for_value(&self, value: f32, invert: bool) -> f32 {
        let span = self.span();
        let ratio = if span != 0.0 {
            ((value - self.domain_min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if invert {
            1.0 - ratio
        } else {
            ratio
        }
    }
}

/// Wrap into (-180, 180].
fn wrap_180(angle: f32) -> f32 {
    angle - 360.0 * roundf(angle / 360.0)
}

/// Wrap into [origin, origin + 360).
fn wrap_into(angle: f32, origin: f32) -> f32 {
    let rel = angle - origin;
    rel - 360.0 * floorf(rel / 360.0)
}

fn angular_distance(a: f32, b: f32) -> f32 {
    let d = wrap_180(a - b);
    if d < 0.0 {
        -d
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;

    fn slider() -> ControlSpec {
        ControlSpec::linear(280.0, Axis::Horizontal, false, 0.0, 100.0, 1.0)
    }

    fn dial() -> ControlSpec {
        ControlSpec::angular(-135.0, 135.0, 10.0, 30.0, 0.5)
    }

    fn wheel() -> ControlSpec {
        ControlSpec::angular(0.0, 360.0, 0.0, 360.0, 1.0)
    }

    #[test]
    fn linear_offsets_map_across_the_track() {
        let spec = slider();
        assert_eq!(spec.value_at_offset(0.0), 0.0);
        assert_eq!(spec.value_at_offset(140.0), 50.0);
        assert_eq!(spec.value_at_offset(280.0), 100.0);
    }

    #[test]
    fn linear_offsets_outside_the_track_clamp() {
        let spec = slider();
        assert_eq!(spec.value_at_offset(-50.0), 0.0);
        assert_eq!(spec.value_at_offset(900.0), 100.0);
    }

    #[test]
    fn inverted_track_measures_from_the_far_edge() {
        let spec = ControlSpec::linear(200.0, Axis::Vertical, true, 0.0, 100.0, 1.0);
        assert_eq!(spec.value_at_offset(0.0), 100.0);
        assert_eq!(spec.value_at_offset(200.0), 0.0);
        assert_eq!(spec.value_at_offset(50.0), 75.0);
    }

    #[test]
    fn linear_round_trip_within_one_step() {
        let spec = slider();
        for value in [0.0f32, 1.0, 42.0, 50.0, 99.0, 100.0] {
            let offset = spec.offset_for_value(value);
            let back = spec.value_at_offset(offset);
            assert!(
                (back - value).abs() <= spec.step,
                "value {value} came back as {back}"
            );
        }
    }

    #[test]
    fn bearing_zero_is_straight_up() {
        assert_eq!(bearing_deg(0.0, -1.0), 0.0);
        assert!((bearing_deg(1.0, 0.0) - 90.0).abs() < 1e-3);
        assert!((bearing_deg(0.0, 1.0) - 180.0).abs() < 1e-3);
        assert!((bearing_deg(-1.0, 0.0) + 90.0).abs() < 1e-3);
    }

    #[test]
    fn dial_maps_up_to_the_domain_midpoint() {
        let spec = dial();
        assert_eq!(spec.value_at_bearing(0.0), 20.0);
        assert_eq!(spec.value_at_bearing(-135.0), 10.0);
        assert_eq!(spec.value_at_bearing(135.0), 30.0);
    }

    #[test]
    fn dial_bearings_beyond_the_sweep_clamp_to_the_nearest_endpoint() {
        let spec = dial();
        // Just past the end stop, still on the end side.
        assert_eq!(spec.value_at_bearing(150.0), 30.0);
        assert_eq!(spec.value_at_bearing(-150.0), 10.0);
        // No wrap-around from one stop to the other.
        assert_eq!(spec.value_at_bearing(179.0), 30.0);
        assert_eq!(spec.value_at_bearing(-179.0), 10.0);
    }

    #[test]
    fn dial_round_trip_within_one_step() {
        let spec = dial();
        for value in [10.0f32, 12.5, 20.0, 27.5, 30.0] {
            let bearing = spec.bearing_for_value(value);
            let back = spec.value_at_bearing(bearing);
            assert!(
                (back - value).abs() <= spec.step,
                "value {value} came back as {back}"
            );
        }
    }

    #[test]
    fn full_wheel_wraps_instead_of_clamping() {
        let spec = wheel();
        assert_eq!(spec.value_at_bearing(0.0), 0.0);
        assert_eq!(spec.value_at_bearing(90.0), 90.0);
        // Bearings come in as (-180, 180]; -90 is three quarters around.
        assert_eq!(spec.value_at_bearing(-90.0), 270.0);
        assert_eq!(spec.value_at_bearing(-1.0), 359.0);
    }

    #[test]
    fn temperature_steps_quantize_to_half_degrees() {
        let spec = dial();
        let value = spec.value_at_bearing(7.3);
        assert_eq!(value, (value * 2.0) as i32 as f32 / 2.0);
    }
}
