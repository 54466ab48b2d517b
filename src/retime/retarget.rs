//! Moving keyframe frames to a new frame rate.

use crate::foundation::core::{FrameRatio, round_frame};
use crate::foundation::error::{RetimeError, RetimeResult};

/// Scale `frames` by `ratio` and round to whole frames, keeping the result strictly increasing.
///
/// Independent rounding can land two neighbours on the same frame when the ratio compresses
/// closely spaced keys. On such a collision the key whose rounding was more accurate keeps its
/// frame and the other one is displaced by one: forward if it is the later key, backward (with
/// the displacement cascading toward the start) if it is the earlier one. Ties favour the earlier
/// key. Keys that already share a frame are separated the same way.
///
/// `frames` must be finite and non-decreasing, and every scaled frame must lie within
/// [`MAX_FRAME_MAGNITUDE`](crate::MAX_FRAME_MAGNITUDE).
pub fn retarget(frames: &[f64], ratio: FrameRatio) -> RetimeResult<Vec<i64>> {
    if let Some(f) = frames.iter().find(|f| !f.is_finite()) {
        return Err(RetimeError::validation(format!(
            "retarget: frame {f} is not finite"
        )));
    }
    if let Some(i) = frames.windows(2).position(|w| w[0] > w[1]) {
        return Err(RetimeError::validation(format!(
            "retarget: frames must be in frame order ({} then {})",
            frames[i],
            frames[i + 1]
        )));
    }

    let exact: Vec<f64> = frames.iter().map(|&f| ratio.scale(f)).collect();
    let mut out = exact
        .iter()
        .map(|&e| round_frame(e))
        .collect::<RetimeResult<Vec<i64>>>()?;
    let error = |out: &[i64], i: usize| (out[i] as f64 - exact[i]).abs();

    for i in 1..out.len() {
        if out[i] > out[i - 1] {
            continue;
        }

        if error(&out, i - 1) <= error(&out, i) {
            out[i] = step(out[i - 1], 1, i)?;
        } else {
            out[i - 1] = step(out[i], -1, i - 1)?;
            for j in (1..i).rev() {
                if out[j - 1] < out[j] {
                    break;
                }
                out[j - 1] = step(out[j], -1, j - 1)?;
            }
        }
        tracing::trace!(index = i, frame = out[i], "resolved keyframe collision");
    }

    if let Some(i) = out.windows(2).position(|w| w[0] >= w[1]) {
        return Err(RetimeError::CollisionResolutionExhausted { index: i + 1 });
    }
    Ok(out)
}

fn step(frame: i64, by: i64, index: usize) -> RetimeResult<i64> {
    frame
        .checked_add(by)
        .ok_or(RetimeError::CollisionResolutionExhausted { index })
}

/// Scale a single frame position (layer in/out point, playhead) with plain rounding.
pub fn scale_frame(frame: f64, ratio: FrameRatio) -> RetimeResult<i64> {
    round_frame(ratio.scale(frame))
}

/// Scale an inclusive `[start, end]` frame range, e.g. a composition's playback range.
pub fn scale_range(start: f64, end: f64, ratio: FrameRatio) -> RetimeResult<(i64, i64)> {
    Ok((scale_frame(start, ratio)?, scale_frame(end, ratio)?))
}

#[cfg(test)]
#[path = "../../tests/unit/retime/retarget.rs"]
mod tests;
