//! Whole-composition frame-rate conversion.

use crate::foundation::core::{Fps, FrameRatio};
use crate::foundation::error::{RetimeError, RetimeResult};
use crate::host::capability::{KeyframeSink, KeyframeSource, LayerSpan, commit_plan};
use crate::retime::plan::plan_attribute;
use crate::retime::retarget::scale_range;
use crate::timeline::keyframe::AttributeId;

/// Options for [`convert_frame_rate`].
#[derive(Clone, Debug)]
pub struct ConvertOpts {
    /// Rate assumed when the host does not report a usable one.
    pub default_source_fps: f64,
    /// Highest accepted target rate.
    pub max_fps: f64,
    /// Attributes with fewer keyframes are left untouched.
    pub min_keyframes: usize,
    /// Scale layer in/out points along with the keyframes.
    pub retime_layer_spans: bool,
    /// Adjust non-keyframed frame behaviours (auto-animate offsets, frame stepping).
    pub retime_behaviours: bool,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            default_source_fps: 25.0,
            max_fps: 120.0,
            min_keyframes: 2,
            retime_layer_spans: true,
            retime_behaviours: true,
        }
    }
}

impl ConvertOpts {
    /// Validate a requested target rate against these options.
    pub fn target_fps(&self, target: f64) -> RetimeResult<Fps> {
        let fps = Fps::new(target)?;
        if fps.as_f64() > self.max_fps {
            return Err(RetimeError::validation(format!(
                "target frame rate {target} exceeds maximum {}",
                self.max_fps
            )));
        }
        Ok(fps)
    }

    fn source_fps(&self, reported: Option<f64>) -> RetimeResult<Fps> {
        match reported.map(Fps::new) {
            Some(Ok(fps)) => Ok(fps),
            _ => {
                tracing::warn!(
                    ?reported,
                    fallback = self.default_source_fps,
                    "host frame rate unavailable, using default"
                );
                Fps::new(self.default_source_fps)
            }
        }
    }
}

/// Per-attribute counts for a converted attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttributeStats {
    /// Keyframes written.
    pub keyframes: usize,
    /// Keyframes that changed frame.
    pub moved: usize,
    /// Handles re-derived for the new spans.
    pub handles: usize,
    /// Pairs whose keys shared a frame and kept their handles.
    pub skipped_pairs: usize,
}

/// What happened to one attribute during a conversion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttributeOutcome {
    /// Keyframes were retimed and committed.
    Converted {
        /// Counts for the committed plan.
        stats: AttributeStats,
    },
    /// Left untouched on purpose.
    Skipped {
        /// Why the attribute was not retimed.
        reason: String,
    },
    /// Planning or writing failed; the host keeps its previous keys for this attribute.
    Failed {
        /// Display form of the error.
        error: String,
    },
}

/// Result of a whole-composition conversion. One failed attribute never aborts the rest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ConversionReport {
    /// Rate the composition had, or the fallback that was assumed.
    pub source_fps: Fps,
    /// Rate the composition has now.
    pub target_fps: Fps,
    /// `target_fps / source_fps`.
    pub ratio: FrameRatio,
    /// Outcome per attribute, in host order.
    pub attributes: Vec<(AttributeId, AttributeOutcome)>,
    /// Layers whose in/out points could not be written.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_layers: Vec<String>,
    /// Number of frame behaviours adjusted.
    #[serde(default)]
    pub behaviours: usize,
    /// Layers whose frame behaviours could not be adjusted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_behaviours: Vec<String>,
}

impl ConversionReport {
    /// Number of attributes that were retimed.
    pub fn converted_count(&self) -> usize {
        self.attributes
            .iter()
            .filter(|(_, o)| matches!(o, AttributeOutcome::Converted { .. }))
            .count()
    }

    /// Failed attributes with their error text.
    pub fn failures(&self) -> impl Iterator<Item = (&AttributeId, &str)> {
        self.attributes.iter().filter_map(|(attr, o)| match o {
            AttributeOutcome::Failed { error } => Some((attr, error.as_str())),
            _ => None,
        })
    }

    /// Keyframes written across all converted attributes.
    pub fn total_keyframes(&self) -> usize {
        self.attributes
            .iter()
            .map(|(_, o)| match o {
                AttributeOutcome::Converted { stats } => stats.keyframes,
                _ => 0,
            })
            .sum()
    }
}

/// Retime every animated attribute, layer span, frame behaviour and the composition timing to
/// `target_fps`.
///
/// Failures while reading the attribute list, validating rates or writing the composition timing
/// abort the conversion. Failures inside one attribute, layer or behaviour are recorded in the
/// report and the next one is processed.
#[tracing::instrument(skip(source, sink, opts))]
pub fn convert_frame_rate<S, K>(
    source: &S,
    sink: &mut K,
    target_fps: f64,
    opts: &ConvertOpts,
) -> RetimeResult<ConversionReport>
where
    S: KeyframeSource + ?Sized,
    K: KeyframeSink + ?Sized,
{
    let target = opts.target_fps(target_fps)?;
    let source_fps = opts.source_fps(source.fps())?;
    let ratio = FrameRatio::between(source_fps, target);
    let timing = source.comp_timing()?.scaled(ratio)?;

    let mut failed_layers = Vec::new();
    if opts.retime_layer_spans {
        for span in source.layer_spans()? {
            let layer = span.layer.clone();
            if let Err(err) = retime_layer_span(sink, span, ratio) {
                tracing::warn!(%layer, error = %err, "failed to retime layer span");
                failed_layers.push(layer);
            }
        }
    }

    let mut behaviours = 0;
    let mut failed_behaviours = Vec::new();
    if opts.retime_behaviours {
        for behaviour in source.timing_behaviours()? {
            match behaviour
                .retimed(ratio)
                .and_then(|b| sink.set_timing_behaviour(&b))
            {
                Ok(()) => behaviours += 1,
                Err(err) => {
                    tracing::warn!(
                        layer = behaviour.layer(),
                        error = %err,
                        "failed to retime frame behaviour"
                    );
                    failed_behaviours.push(behaviour.layer().to_owned());
                }
            }
        }
    }

    let mut attributes = Vec::new();
    for attr in source.attributes()? {
        let outcome = match convert_attribute(source, sink, &attr, ratio, opts) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(attribute = %attr, error = %err, "attribute conversion failed");
                AttributeOutcome::Failed {
                    error: err.to_string(),
                }
            }
        };
        attributes.push((attr, outcome));
    }

    sink.set_comp_timing(timing)?;
    sink.set_fps(target)?;

    let report = ConversionReport {
        source_fps,
        target_fps: target,
        ratio,
        attributes,
        failed_layers,
        behaviours,
        failed_behaviours,
    };
    tracing::debug!(
        converted = report.converted_count(),
        keyframes = report.total_keyframes(),
        "frame rate conversion finished"
    );
    Ok(report)
}

fn retime_layer_span<K>(sink: &mut K, span: LayerSpan, ratio: FrameRatio) -> RetimeResult<()>
where
    K: KeyframeSink + ?Sized,
{
    let (in_frame, out_frame) = scale_range(span.in_frame, span.out_frame, ratio)?;
    sink.set_layer_span(&LayerSpan {
        in_frame: in_frame as f64,
        out_frame: out_frame as f64,
        ..span
    })
}

fn convert_attribute<S, K>(
    source: &S,
    sink: &mut K,
    attr: &AttributeId,
    ratio: FrameRatio,
    opts: &ConvertOpts,
) -> RetimeResult<AttributeOutcome>
where
    S: KeyframeSource + ?Sized,
    K: KeyframeSink + ?Sized,
{
    let timeline = source.keyframe_timeline(attr)?;
    if timeline.keys.len() < opts.min_keyframes {
        return Ok(AttributeOutcome::Skipped {
            reason: format!("{} keyframe(s)", timeline.keys.len()),
        });
    }

    let plan = plan_attribute(&timeline, ratio)?;
    commit_plan(sink, &plan)?;

    Ok(AttributeOutcome::Converted {
        stats: AttributeStats {
            keyframes: plan.writes.len(),
            moved: plan.moved_count(),
            handles: plan.retimed_handle_count(),
            skipped_pairs: plan.skipped_pairs.len(),
        },
    })
}

#[cfg(test)]
#[path = "../../tests/unit/host/convert.rs"]
mod tests;
