use crate::easing::curve::{CubicBezier, HandlePair};
use crate::foundation::error::{RetimeError, RetimeResult};
use crate::timeline::keyframe::KeyframePair;

/// Re-derive a pair's handles so its easing keeps its shape over a new frame/value span.
///
/// Returns `Ok(None)` when either keyframe is not bezier-interpolated; those handles are left
/// to the caller. A pair whose original keyframes share a frame fails with
/// [`RetimeError::DegenerateInterval`], which callers recover from by skipping the pair.
pub fn retime_curve(
    pair: KeyframePair<'_>,
    new_frame_diff: f64,
    new_value_diff: f64,
) -> RetimeResult<Option<HandlePair>> {
    if !pair.is_bezier() {
        return Ok(None);
    }
    if pair.frame_diff() == 0.0 {
        return Err(RetimeError::DegenerateInterval {
            frame: pair.current.frame,
        });
    }

    let curve = CubicBezier::from_handles(pair.handles(), pair.frame_diff(), pair.value_diff())?;
    Ok(Some(curve.to_handles(new_frame_diff, new_value_diff)))
}

#[cfg(test)]
#[path = "../../tests/unit/retime/pair.rs"]
mod tests;
