//! Traits and timing records a host implements to be retimed.

use crate::foundation::core::{Fps, FrameRatio};
use crate::foundation::error::RetimeResult;
use crate::retime::plan::{AttributePlan, KeyframeWrite};
use crate::retime::retarget::scale_frame;
use crate::timeline::keyframe::{AttributeId, Timeline};

/// In/out points of one layer, in composition frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpan {
    /// Host layer id, e.g. `"basicShape#1"`.
    pub layer: String,
    /// First frame the layer is visible on.
    pub in_frame: f64,
    /// Last frame the layer is visible on.
    pub out_frame: f64,
}

/// Composition frame range, playback bookends and playhead.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompTiming {
    /// First frame of the composition.
    pub start_frame: f64,
    /// Last frame of the composition.
    pub end_frame: f64,
    /// Current playhead frame.
    #[serde(default)]
    pub playhead: f64,
    /// Start of the playback range, when the host has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_start: Option<f64>,
    /// End of the playback range, when the host has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playback_end: Option<f64>,
}

impl CompTiming {
    /// Timing with every frame position scaled by `ratio` and rounded half up.
    ///
    /// The playback range is scaled only when both ends are known; otherwise it is kept as is.
    pub fn scaled(self, ratio: FrameRatio) -> RetimeResult<Self> {
        let scale = |f: f64| scale_frame(f, ratio).map(|f| f as f64);
        let (playback_start, playback_end) = match (self.playback_start, self.playback_end) {
            (Some(start), Some(end)) => (Some(scale(start)?), Some(scale(end)?)),
            other => other,
        };
        Ok(Self {
            start_frame: scale(self.start_frame)?,
            end_frame: scale(self.end_frame)?,
            playhead: scale(self.playhead)?,
            playback_start,
            playback_end,
        })
    }
}

/// Whether a frame behaviour counts in frames or in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    /// Values are frame counts and depend on the frame rate.
    #[default]
    Frames,
    /// Values are seconds and survive a rate change untouched.
    Seconds,
}

/// Frame-dependent settings of a layer that are not keyframed.
///
/// Each setting is `None` when it is animated (its keyframes are retimed with the other
/// attributes) or when the host does not expose it; `None` settings are never written.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimingBehaviour {
    /// Auto-animate deformer delaying its motion by `time_offset` frames.
    AutoAnimate {
        /// Host layer id.
        layer: String,
        /// Delay in frames.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        time_offset: Option<f64>,
    },
    /// Frame behaviour stepping through frames at `value` per frame.
    Frame {
        /// Host layer id.
        layer: String,
        /// Unit the other settings are expressed in.
        #[serde(default)]
        mode: FrameMode,
        /// Playback speed, in source frames per composition frame.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        /// Offset into the source, in frames.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offset: Option<f64>,
        /// Composition frame the behaviour starts on.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_frame: Option<f64>,
    },
}

impl TimingBehaviour {
    /// Host layer the behaviour lives on.
    pub fn layer(&self) -> &str {
        match self {
            Self::AutoAnimate { layer, .. } | Self::Frame { layer, .. } => layer,
        }
    }

    /// Settings adjusted so the behaviour plays at the same speed after a rate change.
    ///
    /// Offsets scale by `ratio`, a per-frame speed divides by it, and `start_frame` is rounded
    /// half up. Behaviours in [`FrameMode::Seconds`] are returned unchanged.
    pub fn retimed(&self, ratio: FrameRatio) -> RetimeResult<Self> {
        let scale = |v: Option<f64>| v.map(|v| ratio.scale(v));
        Ok(match self {
            Self::AutoAnimate { layer, time_offset } => Self::AutoAnimate {
                layer: layer.clone(),
                time_offset: scale(*time_offset),
            },
            Self::Frame {
                mode: FrameMode::Seconds,
                ..
            } => self.clone(),
            Self::Frame {
                layer,
                mode,
                value,
                offset,
                start_frame,
            } => Self::Frame {
                layer: layer.clone(),
                mode: *mode,
                value: value.map(|v| v / ratio.get()),
                offset: scale(*offset),
                start_frame: start_frame
                    .map(|f| scale_frame(f, ratio).map(|f| f as f64))
                    .transpose()?,
            },
        })
    }
}

/// Read access to the host's animation state.
pub trait KeyframeSource {
    /// Composition frame rate as the host reports it; `None` when unavailable.
    fn fps(&self) -> Option<f64>;
    /// Composition range, playback bookends and playhead.
    fn comp_timing(&self) -> RetimeResult<CompTiming>;
    /// In/out points of every layer.
    fn layer_spans(&self) -> RetimeResult<Vec<LayerSpan>>;
    /// Every animated attribute, in host order.
    fn attributes(&self) -> RetimeResult<Vec<AttributeId>>;
    /// Current keyframes of `attr`.
    fn keyframe_timeline(&self, attr: &AttributeId) -> RetimeResult<Timeline>;
    /// Frame-dependent layer settings that are not keyframed. Hosts without any return nothing.
    fn timing_behaviours(&self) -> RetimeResult<Vec<TimingBehaviour>> {
        Ok(Vec::new())
    }
}

/// Write access to the host's animation state.
///
/// Ordering contract: for each attribute, `begin_attribute` is called once, then
/// `apply_retimed_keyframe` once per written keyframe in timeline order, then `end_attribute`.
/// Hosts that cannot move keyframes independently should stage writes until `end_attribute`.
pub trait KeyframeSink {
    /// Open a batch of writes for `attr`.
    fn begin_attribute(&mut self, attr: &AttributeId) -> RetimeResult<()>;
    /// Record one keyframe write for the open attribute.
    fn apply_retimed_keyframe(
        &mut self,
        attr: &AttributeId,
        write: &KeyframeWrite,
    ) -> RetimeResult<()>;
    /// Commit the writes recorded for `attr`.
    fn end_attribute(&mut self, attr: &AttributeId) -> RetimeResult<()>;

    /// Replace one layer's in/out points.
    fn set_layer_span(&mut self, span: &LayerSpan) -> RetimeResult<()>;
    /// Replace one layer's frame-dependent settings.
    fn set_timing_behaviour(&mut self, behaviour: &TimingBehaviour) -> RetimeResult<()>;
    /// Replace the composition timing.
    fn set_comp_timing(&mut self, timing: CompTiming) -> RetimeResult<()>;
    /// Replace the composition frame rate.
    fn set_fps(&mut self, fps: Fps) -> RetimeResult<()>;
}

/// Send every write of `plan` to `sink` as one attribute batch.
pub fn commit_plan<K>(sink: &mut K, plan: &AttributePlan) -> RetimeResult<()>
where
    K: KeyframeSink + ?Sized,
{
    sink.begin_attribute(&plan.attribute)?;
    for write in &plan.writes {
        sink.apply_retimed_keyframe(&plan.attribute, write)?;
    }
    sink.end_attribute(&plan.attribute)
}

#[cfg(test)]
#[path = "../../tests/unit/host/capability.rs"]
mod tests;
