use kurbo::Point;

use crate::foundation::core::{FrameRatio, Vec2};
use crate::foundation::error::RetimeResult;
use crate::retime::pair::retime_curve;
use crate::retime::retarget::retarget;
use crate::timeline::keyframe::{AttributeId, Interpolation, Keyframe, Timeline};

/// One keyframe write for the host to apply after retiming.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeWrite {
    /// Frame the keyframe sits on before retiming; identifies it in the host.
    pub from_frame: f64,
    /// Frame to move the keyframe to.
    pub frame: i64,
    /// Keyframe value (unchanged by retiming).
    pub value: f64,
    /// Replacement outgoing handle; `None` leaves the host's handle alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_handle: Option<Vec2>,
    /// Replacement incoming handle; `None` leaves the host's handle alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_handle: Option<Vec2>,
    /// Replacement interpolation; `None` keeps the host's.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
}

impl KeyframeWrite {
    /// Write that moves `key` to `frame` and changes nothing else.
    pub fn for_key(key: &Keyframe, frame: i64) -> Self {
        Self {
            from_frame: key.frame,
            frame,
            value: key.value,
            out_handle: None,
            in_handle: None,
            interpolation: None,
        }
    }

    /// Outgoing tangent as an absolute `(frame, value)` position.
    pub fn out_tangent_point(&self) -> Option<Point> {
        self.out_handle.map(|h| self.anchor() + h)
    }

    /// Incoming tangent as an absolute `(frame, value)` position.
    pub fn in_tangent_point(&self) -> Option<Point> {
        self.in_handle.map(|h| self.anchor() + h)
    }

    /// `true` when the write changes the keyframe's frame.
    pub fn is_moved(&self) -> bool {
        self.from_frame != self.frame as f64
    }

    fn anchor(&self) -> Point {
        Point::new(self.frame as f64, self.value)
    }
}

/// Every write needed to retime one attribute, in keyframe order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttributePlan {
    /// Attribute the writes belong to.
    pub attribute: AttributeId,
    /// Frame ratio the plan was built for; identity for plans that only change easing.
    pub ratio: FrameRatio,
    /// Writes in keyframe order.
    pub writes: Vec<KeyframeWrite>,
    /// Index of the first keyframe of each pair whose handles could not be re-derived.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_pairs: Vec<usize>,
}

impl AttributePlan {
    /// Number of writes that move their keyframe.
    pub fn moved_count(&self) -> usize {
        self.writes.iter().filter(|w| w.is_moved()).count()
    }

    /// Number of handles the plan replaces.
    pub fn retimed_handle_count(&self) -> usize {
        self.writes
            .iter()
            .map(|w| usize::from(w.out_handle.is_some()) + usize::from(w.in_handle.is_some()))
            .sum()
    }
}

/// Plan the retiming of one attribute's timeline.
///
/// Frames are retargeted first; each bezier pair's easing is then re-expanded over its new frame
/// span with the value span unchanged. Nothing is written to the host.
pub fn plan_attribute(timeline: &Timeline, ratio: FrameRatio) -> RetimeResult<AttributePlan> {
    timeline.validate()?;
    let frames = retarget(&timeline.frames(), ratio)?;

    let mut writes: Vec<KeyframeWrite> = timeline
        .keys
        .iter()
        .zip(&frames)
        .map(|(key, &frame)| KeyframeWrite::for_key(key, frame))
        .collect();

    let mut skipped_pairs = Vec::new();
    for (i, pair) in timeline.pairs().enumerate() {
        let new_frame_diff = (frames[i + 1] - frames[i]) as f64;
        match retime_curve(pair, new_frame_diff, pair.value_diff()) {
            Ok(Some(handles)) => {
                writes[i].out_handle = Some(handles.out_handle);
                writes[i + 1].in_handle = Some(handles.in_handle);
            }
            Ok(None) => {}
            Err(err) if err.is_skippable() => {
                tracing::debug!(
                    attribute = %timeline.attribute,
                    pair = i,
                    error = %err,
                    "skipping easing for keyframe pair"
                );
                skipped_pairs.push(i);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(AttributePlan {
        attribute: timeline.attribute.clone(),
        ratio,
        writes,
        skipped_pairs,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/retime/plan.rs"]
mod tests;
