//! Easeshift converts keyframe easing between host tangent handles and normalized
//! `cubic-bezier(x1, y1, x2, y2)` curves, and retimes keyframed animation for a new frame rate
//! without reordering keys or distorting their easing.
//!
//! The engine is pure: [`plan_attribute`] turns a [`Timeline`] snapshot into an
//! [`AttributePlan`] of writes. Hosts plug in through [`KeyframeSource`] and [`KeyframeSink`];
//! [`convert_frame_rate`] drives a whole composition with per-attribute failure isolation, and
//! [`apply_easing`] writes one curve across a selection of keyframes.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod easing;
pub mod host;
/// Frame retargeting and retiming plans.
pub mod retime;
/// Keyframe data model.
pub mod timeline;

pub use crate::foundation::core::{
    FLAT_VALUE_EPSILON, Fps, FrameRatio, MAX_FRAME_MAGNITUDE, Vec2, round_frame, round_half_up,
};
pub use crate::foundation::error::{RetimeError, RetimeResult};

pub use crate::easing::apply::{KeySelection, apply_easing};
pub use crate::easing::curve::{CubicBezier, HandlePair, to_handles, to_normalized};
pub use crate::easing::info::{KeyframeSummary, property_label};
pub use crate::easing::presets::{MAX_PRESET_NAME_LEN, PresetLibrary};
pub use crate::easing::speed::{Influence, sample_velocity, velocity_at};
pub use crate::host::capability::{
    CompTiming, FrameMode, KeyframeSink, KeyframeSource, LayerSpan, TimingBehaviour, commit_plan,
};
pub use crate::host::convert::{
    AttributeOutcome, AttributeStats, ConversionReport, ConvertOpts, convert_frame_rate,
};
pub use crate::host::memory::{HostSnapshot, InMemoryHost};
pub use crate::retime::pair::retime_curve;
pub use crate::retime::plan::{AttributePlan, KeyframeWrite, plan_attribute};
pub use crate::retime::retarget::{retarget, scale_frame, scale_range};
pub use crate::timeline::keyframe::{AttributeId, Interpolation, Keyframe, KeyframePair, Timeline};
