//! Normalized cubic-bezier easing and its mapping to keyframe tangent handles.

use std::fmt;
use std::str::FromStr;

use kurbo::{CubicBez, ParamCurve};

use crate::foundation::core::{FLAT_VALUE_EPSILON, Vec2};
use crate::foundation::error::{RetimeError, RetimeResult};

/// Normalized cubic-bezier easing `(x1, y1, x2, y2)`, as in CSS `cubic-bezier()`.
///
/// Time and value are both mapped to `[0, 1]` between the two keyframes. Nothing is clamped:
/// `x1`/`x2` outside `[0, 1]` describe exaggerated ease curves and `y1`/`y2` outside it describe
/// overshoot, and both survive conversion unchanged. Use [`CubicBezier::clamped_for_display`]
/// only where a bounded preview is wanted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CubicBezier {
    /// Time of the first control point.
    pub x1: f64,
    /// Progress of the first control point.
    pub y1: f64,
    /// Time of the second control point.
    pub x2: f64,
    /// Progress of the second control point.
    pub y2: f64,
}

/// Tangent handles of one keyframe pair, in (frame-delta, value-delta) units.
///
/// `out_handle` is relative to the earlier keyframe, `in_handle` to the later one.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HandlePair {
    /// Handle leaving the earlier keyframe.
    pub out_handle: Vec2,
    /// Handle arriving at the later keyframe.
    pub in_handle: Vec2,
}

impl CubicBezier {
    /// The identity easing `(0, 0, 1, 1)`; what linear interpolation normalizes to.
    pub const LINEAR: Self = Self::new(0.0, 0.0, 1.0, 1.0);

    /// Curve with the given control points.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalize host tangent handles spanning `frame_diff` frames and `value_diff` units.
    ///
    /// Fails with [`RetimeError::DegenerateInterval`] when `frame_diff` is zero. When
    /// `|value_diff| <= FLAT_VALUE_EPSILON` the value channel is flat and `y1`/`y2` fall back to
    /// the identity endpoints `0` and `1`.
    pub fn from_handles(
        handles: HandlePair,
        frame_diff: f64,
        value_diff: f64,
    ) -> RetimeResult<Self> {
        if frame_diff == 0.0 || !frame_diff.is_finite() {
            return Err(RetimeError::DegenerateInterval { frame: frame_diff });
        }
        let flat = value_diff.is_nan() || value_diff.abs() <= FLAT_VALUE_EPSILON;
        let HandlePair {
            out_handle: o,
            in_handle: i,
        } = handles;

        Ok(Self {
            x1: o.x / frame_diff,
            y1: if flat { 0.0 } else { o.y / value_diff },
            x2: (frame_diff + i.x) / frame_diff,
            y2: if flat { 1.0 } else { 1.0 + i.y / value_diff },
        })
    }

    /// Expand this easing into host tangent handles for a span of `frame_diff` x `value_diff`.
    pub fn to_handles(self, frame_diff: f64, value_diff: f64) -> HandlePair {
        HandlePair {
            out_handle: Vec2::new(self.x1 * frame_diff, self.y1 * value_diff),
            in_handle: Vec2::new((self.x2 - 1.0) * frame_diff, (self.y2 - 1.0) * value_diff),
        }
    }

    /// Copy with `x1`/`x2` clamped to `[0, 1]`.
    ///
    /// Lossy. Only for previews and copied keyframe summaries, never for retiming.
    pub fn clamped_for_display(self) -> Self {
        Self {
            x1: self.x1.clamp(0.0, 1.0),
            x2: self.x2.clamp(0.0, 1.0),
            ..self
        }
    }

    /// `true` when every control point is finite.
    pub fn is_finite(self) -> bool {
        self.x1.is_finite() && self.y1.is_finite() && self.x2.is_finite() && self.y2.is_finite()
    }

    /// CSS notation, e.g. `cubic-bezier(0.420, 0.000, 0.580, 1.000)`.
    pub fn to_css(self) -> String {
        format!("cubic-bezier({self})")
    }

    /// The curve in unit space as a kurbo cubic, from `(0, 0)` to `(1, 1)`.
    pub fn to_kurbo(self) -> CubicBez {
        CubicBez::new((0.0, 0.0), (self.x1, self.y1), (self.x2, self.y2), (1.0, 1.0))
    }

    /// Eased progress at time fraction `x` (clamped to `[0, 1]`).
    ///
    /// Solves `x(t) = x` by bisection. `x(0) = 0` and `x(1) = 1` always bracket a root, so this
    /// also terminates for non-monotonic curves whose `x1`/`x2` leave the unit range.
    pub fn ease_at(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        let curve = self.to_kurbo();
        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..64 {
            let mid = 0.5 * (lo + hi);
            if curve.eval(mid).x < x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        curve.eval(0.5 * (lo + hi)).y
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}, {:.3}, {:.3}, {:.3}",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

impl FromStr for CubicBezier {
    type Err = RetimeError;

    /// Accepts `"x1, y1, x2, y2"` or `"cubic-bezier(x1, y1, x2, y2)"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = match trimmed.strip_prefix("cubic-bezier") {
            Some(rest) => rest
                .trim_start()
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| RetimeError::parse(format!("unbalanced cubic-bezier: {s:?}")))?,
            None => trimmed,
        };

        let values = body
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| RetimeError::parse(format!("invalid bezier value {part:?}")))
            })
            .collect::<RetimeResult<Vec<f64>>>()?;

        match values[..] {
            [x1, y1, x2, y2] => Ok(Self::new(x1, y1, x2, y2)),
            _ => Err(RetimeError::parse(format!(
                "expected 4 bezier values, got {}",
                values.len()
            ))),
        }
    }
}

/// Normalize a keyframe pair's handles. See [`CubicBezier::from_handles`].
pub fn to_normalized(
    out_handle: Vec2,
    in_handle: Vec2,
    frame_diff: f64,
    value_diff: f64,
) -> RetimeResult<CubicBezier> {
    CubicBezier::from_handles(
        HandlePair {
            out_handle,
            in_handle,
        },
        frame_diff,
        value_diff,
    )
}

/// Expand a normalized easing to handles. See [`CubicBezier::to_handles`].
pub fn to_handles(curve: CubicBezier, frame_diff: f64, value_diff: f64) -> HandlePair {
    curve.to_handles(frame_diff, value_diff)
}

#[cfg(test)]
#[path = "../../tests/unit/easing/curve.rs"]
mod tests;
