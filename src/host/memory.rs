//! Host backed by an in-memory, JSON-serializable composition snapshot.

use crate::foundation::core::Fps;
use crate::foundation::error::{RetimeError, RetimeResult};
use crate::host::capability::{
    CompTiming, KeyframeSink, KeyframeSource, LayerSpan, TimingBehaviour,
};
use crate::retime::plan::KeyframeWrite;
use crate::timeline::keyframe::{AttributeId, Keyframe, Timeline};

/// Serializable copy of a host composition's timing and animated attributes.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HostSnapshot {
    /// Composition frame rate; `None` when the host did not report one.
    #[serde(default)]
    pub fps: Option<f64>,
    /// Composition range, playback bookends and playhead.
    #[serde(default)]
    pub timing: CompTiming,
    /// Layer in/out points.
    #[serde(default)]
    pub layers: Vec<LayerSpan>,
    /// Non-keyframed frame-dependent layer settings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub behaviours: Vec<TimingBehaviour>,
    /// Animated attributes in host order.
    #[serde(default)]
    pub attributes: Vec<Timeline>,
}

impl HostSnapshot {
    /// Keyframes of `attr`, if it is animated.
    pub fn timeline(&self, attr: &AttributeId) -> Option<&Timeline> {
        self.attributes.iter().find(|t| &t.attribute == attr)
    }
}

/// In-memory host for tests, tooling and the CLI.
///
/// Keyframe writes are staged per attribute and committed together in `end_attribute`, so moves
/// never collide with keyframes that have not moved yet.
#[derive(Debug, Default)]
pub struct InMemoryHost {
    snapshot: HostSnapshot,
    staged: Option<(AttributeId, Vec<KeyframeWrite>)>,
}

impl InMemoryHost {
    /// Host backed by `snapshot`.
    pub fn new(snapshot: HostSnapshot) -> Self {
        Self {
            snapshot,
            staged: None,
        }
    }

    /// Current state, including committed writes.
    pub fn snapshot(&self) -> &HostSnapshot {
        &self.snapshot
    }

    /// Consume the host and return its state.
    pub fn into_snapshot(self) -> HostSnapshot {
        self.snapshot
    }

    fn timeline_mut(&mut self, attr: &AttributeId) -> RetimeResult<&mut Timeline> {
        self.snapshot
            .attributes
            .iter_mut()
            .find(|t| &t.attribute == attr)
            .ok_or_else(|| RetimeError::host(format!("unknown attribute {attr}")))
    }
}

impl KeyframeSource for InMemoryHost {
    fn fps(&self) -> Option<f64> {
        self.snapshot.fps
    }

    fn comp_timing(&self) -> RetimeResult<CompTiming> {
        Ok(self.snapshot.timing)
    }

    fn layer_spans(&self) -> RetimeResult<Vec<LayerSpan>> {
        Ok(self.snapshot.layers.clone())
    }

    fn attributes(&self) -> RetimeResult<Vec<AttributeId>> {
        Ok(self
            .snapshot
            .attributes
            .iter()
            .map(|t| t.attribute.clone())
            .collect())
    }

    fn keyframe_timeline(&self, attr: &AttributeId) -> RetimeResult<Timeline> {
        self.snapshot
            .timeline(attr)
            .cloned()
            .ok_or_else(|| RetimeError::host(format!("unknown attribute {attr}")))
    }

    fn timing_behaviours(&self) -> RetimeResult<Vec<TimingBehaviour>> {
        Ok(self.snapshot.behaviours.clone())
    }
}

impl KeyframeSink for InMemoryHost {
    fn begin_attribute(&mut self, attr: &AttributeId) -> RetimeResult<()> {
        self.timeline_mut(attr)?;
        self.staged = Some((attr.clone(), Vec::new()));
        Ok(())
    }

    fn apply_retimed_keyframe(
        &mut self,
        attr: &AttributeId,
        write: &KeyframeWrite,
    ) -> RetimeResult<()> {
        match &mut self.staged {
            Some((staged_attr, writes)) if staged_attr == attr => {
                writes.push(write.clone());
                Ok(())
            }
            _ => Err(RetimeError::host(format!(
                "write for {attr} outside begin_attribute/end_attribute"
            ))),
        }
    }

    fn end_attribute(&mut self, attr: &AttributeId) -> RetimeResult<()> {
        let writes = match self.staged.take() {
            Some((staged_attr, writes)) if &staged_attr == attr => writes,
            _ => {
                return Err(RetimeError::host(format!(
                    "end_attribute for {attr} without begin_attribute"
                )));
            }
        };

        let timeline = self.timeline_mut(attr)?;
        // (key, frame before the commit, already written)
        let mut keys: Vec<(Keyframe, f64, bool)> = timeline
            .keys
            .iter()
            .map(|k| (k.clone(), k.frame, false))
            .collect();
        for write in &writes {
            let (key, _, written) = keys
                .iter_mut()
                .find(|(_, from, written)| !*written && *from == write.from_frame)
                .ok_or_else(|| {
                    RetimeError::host(format!("{attr}: no keyframe at frame {}", write.from_frame))
                })?;
            key.frame = write.frame as f64;
            if let Some(h) = write.out_handle {
                key.out_handle = Some(h);
            }
            if let Some(h) = write.in_handle {
                key.in_handle = Some(h);
            }
            if let Some(interpolation) = write.interpolation {
                key.interpolation = interpolation;
            }
            *written = true;
        }

        keys.sort_by(|a, b| a.0.frame.total_cmp(&b.0.frame));
        // Keys may already share a frame, but writes must not merge two distinct ones.
        if let Some(w) = keys
            .windows(2)
            .find(|w| w[0].0.frame == w[1].0.frame && w[0].1 != w[1].1)
        {
            return Err(RetimeError::validation(format!(
                "{attr}: writes would merge keyframes at frame {}",
                w[0].0.frame
            )));
        }

        let updated = Timeline::new(attr.clone(), keys.into_iter().map(|(k, ..)| k).collect());
        updated.validate()?;
        *timeline = updated;
        Ok(())
    }

    fn set_layer_span(&mut self, span: &LayerSpan) -> RetimeResult<()> {
        let slot = self
            .snapshot
            .layers
            .iter_mut()
            .find(|l| l.layer == span.layer)
            .ok_or_else(|| RetimeError::host(format!("unknown layer {}", span.layer)))?;
        *slot = span.clone();
        Ok(())
    }

    fn set_timing_behaviour(&mut self, behaviour: &TimingBehaviour) -> RetimeResult<()> {
        let slot = self
            .snapshot
            .behaviours
            .iter_mut()
            .find(|b| b.layer() == behaviour.layer())
            .ok_or_else(|| {
                RetimeError::host(format!("no timing behaviour on layer {}", behaviour.layer()))
            })?;
        *slot = behaviour.clone();
        Ok(())
    }

    fn set_comp_timing(&mut self, timing: CompTiming) -> RetimeResult<()> {
        self.snapshot.timing = timing;
        Ok(())
    }

    fn set_fps(&mut self, fps: Fps) -> RetimeResult<()> {
        self.snapshot.fps = Some(fps.as_f64());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/memory.rs"]
mod tests;
