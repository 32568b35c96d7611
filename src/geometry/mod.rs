//! Polar plot geometry: scales, path generators and symbol shapes.
//!
//! Angles follow the compass convention used on a polar diagram: 0 points
//! straight up (head to wind) and angles grow clockwise, so a point at
//! `(angle, r)` lands at `(r·sin(angle), −r·cos(angle))` in SVG space.

pub mod curve;
pub mod scale;
pub mod symbol;

pub use curve::{PathData, RadialLine};
pub use scale::LinearScale;
pub use symbol::Symbol;

use crate::error::{PlotError, Result};

/// VMG optima closer than this to the beam (degrees) have no usable boat speed.
pub const BEAM_TOLERANCE_DEG: f64 = 0.5;

/// A plotted point: true wind angle in radians and boat speed in knots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub angle: f64,
    pub sog: f64,
}

impl PolarPoint {
    pub fn new(angle: f64, sog: f64) -> Self {
        Self { angle, sog }
    }

    pub fn from_degrees(degrees: f64, sog: f64) -> Self {
        Self::new(deg_to_rad(degrees), sog)
    }

    /// Project onto the plane using `scale` for the radial distance.
    pub fn project(&self, scale: &LinearScale) -> (f64, f64) {
        polar_to_cartesian(self.angle, scale.apply(self.sog))
    }
}

#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Convert polar coordinates to SVG-space cartesian coordinates.
/// `angle`: radians clockwise from up; `radius`: distance from origin.
#[inline]
pub fn polar_to_cartesian(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Boat speed needed to make `vmg` good at `degrees` off the wind.
///
/// Downwind callers pass a negated VMG so the result stays positive for
/// angles past the beam. Angles within [`BEAM_TOLERANCE_DEG`] of the beam,
/// or a result that is not a finite positive speed, are rejected.
pub fn vmg_to_sog(degrees: f64, vmg: f64) -> Result<f64> {
    let cos = deg_to_rad(degrees).cos();
    if !cos.is_finite() || cos.abs() < deg_to_rad(BEAM_TOLERANCE_DEG).sin() {
        return Err(PlotError::DegenerateVmgAngle { angle: degrees, vmg });
    }
    let sog = vmg / cos;
    if !sog.is_finite() || sog <= 0.0 {
        return Err(PlotError::DegenerateVmgAngle { angle: degrees, vmg });
    }
    Ok(sog)
}

/// Format a coordinate for SVG output: at most three decimals, no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    // Avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.3}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_clockwise_from_up() {
        let (x, y) = polar_to_cartesian(0.0, 10.0);
        assert!(x.abs() < 1e-12);
        assert!((y + 10.0).abs() < 1e-12);

        let (x, y) = polar_to_cartesian(deg_to_rad(90.0), 10.0);
        assert!((x - 10.0).abs() < 1e-12);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn beat_vmg_converts_to_sog() {
        let sog = vmg_to_sog(30.0, 4.0).unwrap();
        assert!((sog - 4.6188).abs() < 1e-3);
    }

    #[test]
    fn run_vmg_uses_negated_value() {
        let sog = vmg_to_sog(150.0, -6.0).unwrap();
        assert!((sog - 6.9282).abs() < 1e-3);
    }

    #[test]
    fn beam_reach_vmg_is_rejected() {
        assert!(matches!(
            vmg_to_sog(90.0, 4.0),
            Err(PlotError::DegenerateVmgAngle { .. })
        ));
        assert!(vmg_to_sog(90.0000001, 5.0).is_err());
        assert!(vmg_to_sog(89.6, 5.0).is_err());
        assert!(vmg_to_sog(270.2, -5.0).is_err());
        let near = vmg_to_sog(89.0, 5.0).unwrap();
        assert!(near < 300.0);
        // Wrong sign produces a negative speed
        assert!(vmg_to_sog(150.0, 6.0).is_err());
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(3.14159), "3.142");
        assert_eq!(fmt_num(-2.5), "-2.5");
    }
}
