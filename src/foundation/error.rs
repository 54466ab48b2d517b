/// Convenience result type used across easeshift.
pub type RetimeResult<T> = Result<T, RetimeError>;

/// Error taxonomy for conversion, retiming and host access.
#[derive(thiserror::Error, Debug)]
pub enum RetimeError {
    /// Two adjacent keyframes share a frame, so no easing can be derived between them.
    #[error("degenerate interval: adjacent keyframes share frame {frame}")]
    DegenerateInterval {
        /// Frame of the earlier keyframe of the pair.
        frame: f64,
    },

    /// Frame retargeting failed to produce a strictly increasing sequence.
    #[error("collision resolution exhausted at keyframe index {index}")]
    CollisionResolutionExhausted {
        /// Index of the first keyframe that could not be placed.
        index: usize,
    },

    /// Invalid input data: rates, ratios, frames or preset names.
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed textual input such as a `cubic-bezier(...)` string.
    #[error("parse error: {0}")]
    Parse(String),

    /// Errors when serializing or deserializing snapshots, plans or presets.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The host rejected a read or write.
    #[error("host error: {0}")]
    Host(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetimeError {
    /// Build a [`RetimeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetimeError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`RetimeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`RetimeError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// `true` for errors a driver recovers from by skipping the affected pair.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::DegenerateInterval { .. })
    }
}

impl From<serde_json::Error> for RetimeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
