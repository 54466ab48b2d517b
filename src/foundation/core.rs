use crate::foundation::error::{RetimeError, RetimeResult};

pub use kurbo::Vec2;

/// Value spans at or below this magnitude are treated as flat when normalizing easing.
pub const FLAT_VALUE_EPSILON: f64 = 0.001;

/// Frames-per-second of a composition timeline.
///
/// Hosts report fractional rates (`29.97`, `23.976`), so this is a float rather than a rational.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(f64);

impl Fps {
    /// Create a validated FPS value.
    pub fn new(fps: f64) -> RetimeResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(RetimeError::validation(format!(
                "Fps must be finite and > 0, got {fps}"
            )));
        }
        Ok(Self(fps))
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / self.0
    }

    /// Convert a (possibly fractional) frame count to seconds.
    pub fn frames_to_secs(self, frames: f64) -> f64 {
        frames / self.0
    }

    /// Convert a frame count to whole milliseconds, rounding half up.
    pub fn frames_to_millis(self, frames: f64) -> i64 {
        round_half_up(self.frames_to_secs(frames) * 1000.0)
    }
}

/// Scaling factor `target / source` applied to frame positions when the frame rate changes.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FrameRatio(f64);

impl FrameRatio {
    /// The ratio that leaves every frame in place.
    pub const IDENTITY: Self = Self(1.0);

    /// Create a validated ratio; it must be finite and strictly positive.
    pub fn new(ratio: f64) -> RetimeResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(RetimeError::validation(format!(
                "FrameRatio must be finite and > 0, got {ratio}"
            )));
        }
        Ok(Self(ratio))
    }

    /// Ratio that maps frames at `source` rate onto frames at `target` rate.
    pub fn between(source: Fps, target: Fps) -> Self {
        Self(target.as_f64() / source.as_f64())
    }

    /// The raw `target / source` factor.
    pub fn get(self) -> f64 {
        self.0
    }

    /// Exact (unrounded) position of `frame` after scaling.
    pub fn scale(self, frame: f64) -> f64 {
        frame * self.0
    }

    /// `true` when scaling leaves every frame where it is.
    pub fn is_identity(self) -> bool {
        self.0 == 1.0
    }
}

/// Round to the nearest integer with ties going toward positive infinity.
///
/// Frame positions from hosts follow this convention, which differs from `f64::round` for
/// negative ties (`-2.5` rounds to `-2`).
pub fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Largest frame magnitude that still has whole-frame precision in an `f64`.
pub const MAX_FRAME_MAGNITUDE: f64 = 9_007_199_254_740_992.0;

/// [`round_half_up`] for frame positions, rejecting anything that cannot be a whole frame.
///
/// Values beyond [`MAX_FRAME_MAGNITUDE`] (or non-finite) would saturate in the integer cast, so
/// they fail with [`RetimeError::Validation`] instead.
pub fn round_frame(x: f64) -> RetimeResult<i64> {
    if !x.is_finite() || x.abs() > MAX_FRAME_MAGNITUDE {
        return Err(RetimeError::validation(format!(
            "frame {x} is outside the representable frame range"
        )));
    }
    Ok(round_half_up(x))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
