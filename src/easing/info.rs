//! Human-readable summary of one eased keyframe pair, for copying into design handoff notes.

use crate::easing::curve::CubicBezier;
use crate::foundation::core::Fps;
use crate::foundation::error::{RetimeError, RetimeResult};
use crate::timeline::keyframe::{AttributeId, KeyframePair};

/// Timing and easing of one keyframe pair, as shown in the info panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeSummary {
    /// Readable property name, e.g. `"Position X"`.
    pub property_name: String,
    /// Easing with `x1`/`x2` clamped to `[0, 1]` for display.
    pub easing: CubicBezier,
    /// Frames between the keys.
    pub frame_duration: f64,
    /// Duration at `fps`, in whole milliseconds.
    pub duration_ms: i64,
    /// Composition rate the duration was computed at.
    pub fps: Fps,
    /// Value at the first key, rounded to 2 decimals.
    pub start_value: f64,
    /// Value at the second key, rounded to 2 decimals.
    pub end_value: f64,
}

impl KeyframeSummary {
    /// Summarize `pair` on `attribute` at composition rate `fps`.
    ///
    /// The pair must span a positive number of frames and must not be a step segment.
    pub fn from_pair(
        attribute: &AttributeId,
        pair: KeyframePair<'_>,
        fps: Fps,
    ) -> RetimeResult<Self> {
        let frame_duration = pair.frame_diff();
        if frame_duration <= 0.0 {
            return Err(RetimeError::validation(format!(
                "{attribute}: keyframes must be in increasing frame order"
            )));
        }
        let easing = pair.easing()?.ok_or_else(|| {
            RetimeError::validation(format!("{attribute}: step keyframes have no easing"))
        })?;

        Ok(Self {
            property_name: property_label(attribute),
            easing: easing.clamped_for_display(),
            frame_duration,
            duration_ms: fps.frames_to_millis(frame_duration),
            fps,
            start_value: round_2dp(pair.current.value),
            end_value: round_2dp(pair.next.value),
        })
    }

    /// `"Position X: 500ms (12 frames @ 24fps)"`
    pub fn duration_text(&self) -> String {
        format!(
            "{}: {}ms ({} frames @ {}fps)",
            self.property_name,
            self.duration_ms,
            self.frame_duration,
            self.fps.as_f64()
        )
    }

    /// `"Position X 0 > 100"`
    pub fn values_text(&self) -> String {
        format!("{} {} > {}", self.property_name, self.start_value, self.end_value)
    }

    /// Values, CSS easing and duration on separate lines.
    pub fn full_text(&self) -> String {
        format!(
            "{}\nEasing: {}\nDuration: {}ms @ {}fps\n",
            self.values_text(),
            self.easing.to_css(),
            self.duration_ms,
            self.fps.as_f64()
        )
    }
}

/// `"shape#1.positionX"` -> `"Position X"`.
pub fn property_label(attribute: &AttributeId) -> String {
    let raw = attribute
        .split_layer()
        .map(|(_, attr)| attr)
        .unwrap_or(attribute.as_str());

    let mut out = String::with_capacity(raw.len() + 4);
    for (i, ch) in raw.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.push(ch);
        } else {
            out.push(ch);
        }
    }
    out.trim().to_owned()
}

fn round_2dp(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "../../tests/unit/easing/info.rs"]
mod tests;
