//! Applying one easing curve across a selection of keyframes.

use crate::easing::curve::CubicBezier;
use crate::foundation::core::{FrameRatio, round_frame};
use crate::foundation::error::{RetimeError, RetimeResult};
use crate::retime::plan::{AttributePlan, KeyframeWrite};
use crate::timeline::keyframe::{Interpolation, Keyframe, Timeline};

/// Which keyframes of a timeline an easing is applied to.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySelection {
    /// Every keyframe.
    #[default]
    All,
    /// Keyframes whose frame lies in `[start, end]`.
    Range {
        /// First selected frame.
        start: f64,
        /// Last selected frame.
        end: f64,
    },
    /// Keyframes sitting exactly on these frames.
    Frames(Vec<f64>),
}

impl KeySelection {
    /// `true` when a keyframe on `frame` is selected.
    pub fn contains(&self, frame: f64) -> bool {
        match self {
            Self::All => true,
            Self::Range { start, end } => (*start..=*end).contains(&frame),
            Self::Frames(frames) => frames.contains(&frame),
        }
    }
}

/// Ease every consecutive pair of selected keyframes with `curve`.
///
/// Selected keys become bezier-interpolated; each pair gets the handles that expand `curve` over
/// its own frame and value span. Keys outside the selection are not written. Pairs of selected
/// keys that share a frame keep their handles and are listed in
/// [`AttributePlan::skipped_pairs`]. Frames never move, so the plan uses
/// [`FrameRatio::IDENTITY`].
pub fn apply_easing(
    timeline: &Timeline,
    curve: CubicBezier,
    selection: &KeySelection,
) -> RetimeResult<AttributePlan> {
    timeline.validate()?;
    if !curve.is_finite() {
        return Err(RetimeError::validation(format!(
            "easing {curve} has non-finite control points"
        )));
    }

    let selected: Vec<(usize, &Keyframe)> = timeline
        .keys
        .iter()
        .enumerate()
        .filter(|(_, k)| selection.contains(k.frame))
        .collect();
    if selected.len() < 2 {
        return Err(RetimeError::validation(format!(
            "{}: select at least 2 keyframes to apply an easing, got {}",
            timeline.attribute,
            selected.len()
        )));
    }

    let mut writes = selected
        .iter()
        .map(|(_, key)| {
            Ok(KeyframeWrite {
                interpolation: Some(Interpolation::Bezier),
                ..KeyframeWrite::for_key(key, whole_frame(key)?)
            })
        })
        .collect::<RetimeResult<Vec<_>>>()?;

    let mut skipped_pairs = Vec::new();
    for (w, pair) in selected.windows(2).enumerate() {
        let ((index, current), (_, next)) = (pair[0], pair[1]);
        let frame_diff = next.frame - current.frame;
        if frame_diff == 0.0 {
            skipped_pairs.push(index);
            continue;
        }
        let handles = curve.to_handles(frame_diff, next.value - current.value);
        writes[w].out_handle = Some(handles.out_handle);
        writes[w + 1].in_handle = Some(handles.in_handle);
    }

    tracing::debug!(
        attribute = %timeline.attribute,
        keys = writes.len(),
        easing = %curve,
        "applied easing to keyframes"
    );
    Ok(AttributePlan {
        attribute: timeline.attribute.clone(),
        ratio: FrameRatio::IDENTITY,
        writes,
        skipped_pairs,
    })
}

fn whole_frame(key: &Keyframe) -> RetimeResult<i64> {
    let frame = round_frame(key.frame)?;
    if frame as f64 != key.frame {
        return Err(RetimeError::validation(format!(
            "keyframe at fractional frame {} cannot take an easing",
            key.frame
        )));
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../../tests/unit/easing/apply.rs"]
mod tests;
