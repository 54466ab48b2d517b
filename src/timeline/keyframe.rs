//! Keyframes, keyframe pairs and attribute timelines.

use crate::easing::curve::{CubicBezier, HandlePair};
use crate::foundation::core::Vec2;
use crate::foundation::error::{RetimeError, RetimeResult};

/// Host path of one animated attribute, e.g. `"basicShape#1.position.x"`.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct AttributeId(pub String);

impl AttributeId {
    /// Wrap a host attribute path.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The full path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split `"layer#N.attr.path"` into `("layer#N", "attr.path")`.
    pub fn split_layer(&self) -> Option<(&str, &str)> {
        let hash = self.0.find('#')?;
        let dot = hash + self.0[hash..].find('.')?;
        Some((&self.0[..dot], &self.0[dot + 1..]))
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the segment leaving a keyframe is interpolated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Eased by the keyframe tangent handles.
    #[default]
    Bezier,
    /// Straight-line interpolation; normalizes to [`CubicBezier::LINEAR`].
    Linear,
    /// Holds the value until the next keyframe.
    Step,
}

/// One point on an animated scalar timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Composition frame the keyframe sits on.
    pub frame: f64,
    /// Attribute value at `frame`.
    pub value: f64,
    /// Tangent leaving toward the next keyframe, relative to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_handle: Option<Vec2>,
    /// Tangent arriving from the previous keyframe, relative to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_handle: Option<Vec2>,
    /// Interpolation of the segment leaving this keyframe.
    #[serde(default)]
    pub interpolation: Interpolation,
}

impl Keyframe {
    /// Keyframe without handles.
    pub fn new(frame: f64, value: f64, interpolation: Interpolation) -> Self {
        Self {
            frame,
            value,
            out_handle: None,
            in_handle: None,
            interpolation,
        }
    }

    /// Bezier keyframe without handles; missing handles read as zero.
    pub fn bezier(frame: f64, value: f64) -> Self {
        Self::new(frame, value, Interpolation::Bezier)
    }

    /// Builder: set the outgoing handle.
    pub fn with_out_handle(mut self, dx: f64, dy: f64) -> Self {
        self.out_handle = Some(Vec2::new(dx, dy));
        self
    }

    /// Builder: set the incoming handle.
    pub fn with_in_handle(mut self, dx: f64, dy: f64) -> Self {
        self.in_handle = Some(Vec2::new(dx, dy));
        self
    }

    /// `true` when the segment leaving this keyframe is bezier-interpolated.
    pub fn is_bezier(&self) -> bool {
        self.interpolation == Interpolation::Bezier
    }
}

/// Two temporally adjacent keyframes of one timeline; the unit of easing conversion.
#[derive(Clone, Copy, Debug)]
pub struct KeyframePair<'a> {
    /// Earlier keyframe; its `out_handle` shapes the pair.
    pub current: &'a Keyframe,
    /// Later keyframe; its `in_handle` shapes the pair.
    pub next: &'a Keyframe,
}

impl<'a> KeyframePair<'a> {
    /// Pair `current` with the keyframe that follows it.
    pub fn new(current: &'a Keyframe, next: &'a Keyframe) -> Self {
        Self { current, next }
    }

    /// Frames spanned by the pair; zero when both keys share a frame.
    pub fn frame_diff(&self) -> f64 {
        self.next.frame - self.current.frame
    }

    /// Value change across the pair.
    pub fn value_diff(&self) -> f64 {
        self.next.value - self.current.value
    }

    /// Both keyframes are bezier-interpolated.
    pub fn is_bezier(&self) -> bool {
        self.current.is_bezier() && self.next.is_bezier()
    }

    /// Handles spanning this pair; a missing handle reads as zero.
    pub fn handles(&self) -> HandlePair {
        HandlePair {
            out_handle: self.current.out_handle.unwrap_or(Vec2::ZERO),
            in_handle: self.next.in_handle.unwrap_or(Vec2::ZERO),
        }
    }

    /// Normalized easing of this pair.
    ///
    /// Bezier pairs normalize their handles. Otherwise a step segment has no easing (`None`) and
    /// anything else reads as [`CubicBezier::LINEAR`].
    pub fn easing(&self) -> RetimeResult<Option<CubicBezier>> {
        if self.is_bezier() {
            return CubicBezier::from_handles(self.handles(), self.frame_diff(), self.value_diff())
                .map(Some);
        }
        match self.current.interpolation {
            Interpolation::Step => Ok(None),
            Interpolation::Linear | Interpolation::Bezier => Ok(Some(CubicBezier::LINEAR)),
        }
    }
}

/// Snapshot of one attribute's keyframes, ordered by frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Attribute the keys belong to.
    pub attribute: AttributeId,
    /// Keys in frame order.
    pub keys: Vec<Keyframe>,
}

impl Timeline {
    /// Timeline of `keys` on `attribute`.
    pub fn new(attribute: AttributeId, keys: Vec<Keyframe>) -> Self {
        Self { attribute, keys }
    }

    /// Keyframes must be finite and in frame order.
    ///
    /// Neighbours may share a frame; such a pair has no easing and is skipped by retiming.
    pub fn validate(&self) -> RetimeResult<()> {
        if let Some(k) = self
            .keys
            .iter()
            .find(|k| !k.frame.is_finite() || !k.value.is_finite())
        {
            return Err(RetimeError::validation(format!(
                "{}: keyframe at frame {} is not finite",
                self.attribute, k.frame
            )));
        }
        if !self.keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(RetimeError::validation(format!(
                "{}: keyframes must be in frame order",
                self.attribute
            )));
        }
        Ok(())
    }

    /// Frame of every key, in order.
    pub fn frames(&self) -> Vec<f64> {
        self.keys.iter().map(|k| k.frame).collect()
    }

    /// Adjacent keyframe pairs, in order.
    pub fn pairs(&self) -> impl Iterator<Item = KeyframePair<'_>> {
        self.keys.windows(2).map(|w| KeyframePair::new(&w[0], &w[1]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/keyframe.rs"]
mod tests;
