//! Speed-graph view of an easing curve.
//!
//! The speed graph flattens the value channel (`y1 = 0`, `y2 = 1`) and expresses the remaining
//! time handles as percentage influences, the way graph editors show velocity.

use kurbo::{ParamCurve, ParamCurveDeriv};

use crate::easing::curve::CubicBezier;

/// Below this `|dx/dt|` the slope is reported as zero instead of dividing.
const MIN_TIME_DERIVATIVE: f64 = 0.0001;

/// Outgoing/incoming handle influence in percent of the interval.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Influence {
    /// Reach of the outgoing handle.
    pub out_influence: f64,
    /// Reach of the incoming handle.
    pub in_influence: f64,
}

impl Influence {
    /// Influence pair in percent.
    pub fn new(out_influence: f64, in_influence: f64) -> Self {
        Self {
            out_influence,
            in_influence,
        }
    }

    /// Curve with `x1 = out / 100`, `x2 = 1 - in / 100` and a flat value channel.
    pub fn to_curve(self) -> CubicBezier {
        CubicBezier::new(
            self.out_influence / 100.0,
            0.0,
            1.0 - self.in_influence / 100.0,
            1.0,
        )
    }
}

impl From<CubicBezier> for Influence {
    /// Drops `y1`/`y2`; only the time handles carry into the speed graph.
    fn from(c: CubicBezier) -> Self {
        Self {
            out_influence: c.x1 * 100.0,
            in_influence: (1.0 - c.x2) * 100.0,
        }
    }
}

/// Absolute slope `|dy/dx|` of the easing at curve parameter `t`.
pub fn velocity_at(curve: CubicBezier, t: f64) -> f64 {
    let d = curve.to_kurbo().deriv().eval(t);
    if d.x.abs() > MIN_TIME_DERIVATIVE {
        (d.y / d.x).abs()
    } else {
        0.0
    }
}

/// Sample `sample_count + 1` evenly spaced velocities, normalized so the peak is `1`.
///
/// An all-zero profile stays zero.
pub fn sample_velocity(curve: CubicBezier, sample_count: usize) -> Vec<f64> {
    let n = sample_count.max(1);
    let mut samples: Vec<f64> = (0..=n)
        .map(|i| velocity_at(curve, i as f64 / n as f64))
        .collect();

    let peak = samples.iter().copied().fold(0.0_f64, f64::max);
    let peak = if peak < MIN_TIME_DERIVATIVE { 1.0 } else { peak };
    for s in &mut samples {
        *s /= peak;
    }
    samples
}

#[cfg(test)]
#[path = "../../tests/unit/easing/speed.rs"]
mod tests;
