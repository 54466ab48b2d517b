//! Named easing presets with JSON import and export.

use std::collections::BTreeMap;

use crate::easing::curve::CubicBezier;
use crate::foundation::error::{RetimeError, RetimeResult};

/// Longest accepted preset name, in characters.
pub const MAX_PRESET_NAME_LEN: usize = 30;

const DEFAULT_PRESETS: &[(&str, CubicBezier)] = &[
    ("cubic-in", CubicBezier::new(0.55, 0.055, 0.675, 0.19)),
    ("cubic-out", CubicBezier::new(0.215, 0.61, 0.355, 1.0)),
    ("cubic-in-out", CubicBezier::new(0.645, 0.045, 0.355, 1.0)),
    ("quart-in", CubicBezier::new(0.895, 0.03, 0.685, 0.22)),
    ("quart-out", CubicBezier::new(0.165, 0.84, 0.44, 1.0)),
    ("quart-in-out", CubicBezier::new(0.77, 0.0, 0.175, 1.0)),
    ("quint-in", CubicBezier::new(0.755, 0.05, 0.855, 0.06)),
    ("quint-out", CubicBezier::new(0.23, 1.0, 0.32, 1.0)),
    ("quint-in-out", CubicBezier::new(0.86, 0.0, 0.07, 1.0)),
    ("expo-in", CubicBezier::new(0.95, 0.05, 0.795, 0.035)),
];

/// Named easing curves, kept in name order.
///
/// Serializes as a JSON object mapping names to `{x1, y1, x2, y2}`, which is also the
/// import/export format.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PresetLibrary {
    presets: BTreeMap<String, CubicBezier>,
}

impl PresetLibrary {
    /// Empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library seeded with the built-in cubic/quart/quint/expo curves.
    pub fn with_defaults() -> Self {
        Self {
            presets: DEFAULT_PRESETS
                .iter()
                .map(|(name, curve)| ((*name).to_owned(), *curve))
                .collect(),
        }
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// `true` when the library holds no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Curve saved under `name`.
    pub fn get(&self, name: &str) -> Option<CubicBezier> {
        self.presets.get(name).copied()
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// `(name, curve)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, CubicBezier)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Save `curve` under `name`, replacing any preset with that name.
    pub fn save(&mut self, name: &str, curve: CubicBezier) -> RetimeResult<()> {
        let name = validate_name(name)?;
        if !curve.is_finite() {
            return Err(RetimeError::validation(format!(
                "preset {name:?} has non-finite control points"
            )));
        }
        self.presets.insert(name.to_owned(), curve);
        Ok(())
    }

    /// Move the preset `from` to the name `to`, refusing to overwrite an existing one.
    pub fn rename(&mut self, from: &str, to: &str) -> RetimeResult<()> {
        let to = validate_name(to)?;
        if from == to {
            return Ok(());
        }
        if self.presets.contains_key(to) {
            return Err(RetimeError::validation(format!(
                "preset {to:?} already exists"
            )));
        }
        let curve = self
            .presets
            .remove(from)
            .ok_or_else(|| RetimeError::validation(format!("no preset named {from:?}")))?;
        self.presets.insert(to.to_owned(), curve);
        Ok(())
    }

    /// Delete a preset, returning its curve.
    pub fn remove(&mut self, name: &str) -> Option<CubicBezier> {
        self.presets.remove(name)
    }

    /// Delete every preset.
    pub fn clear(&mut self) {
        self.presets.clear();
    }

    /// Merge `other` into `self`; incoming presets overwrite same-named ones.
    ///
    /// Returns the number of names that were not present before.
    pub fn merge(&mut self, other: PresetLibrary) -> usize {
        let before = self.presets.len();
        self.presets.extend(other.presets);
        self.presets.len() - before
    }

    /// Export as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> RetimeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse an exported library, rejecting anything that is not an object of curves.
    pub fn from_json(s: &str) -> RetimeResult<Self> {
        let lib: Self = serde_json::from_str(s)?;
        for (name, curve) in lib.iter() {
            validate_name(name)?;
            if !curve.is_finite() {
                return Err(RetimeError::validation(format!(
                    "preset {name:?} has non-finite control points"
                )));
            }
        }
        Ok(lib)
    }

    /// Import exported JSON and merge it; returns how many new names were added.
    pub fn import_json(&mut self, s: &str) -> RetimeResult<usize> {
        let incoming = Self::from_json(s)?;
        let added = self.merge(incoming);
        tracing::debug!(added, total = self.len(), "imported easing presets");
        Ok(added)
    }
}

fn validate_name(name: &str) -> RetimeResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RetimeError::validation("preset name must not be empty"));
    }
    if name.chars().count() > MAX_PRESET_NAME_LEN {
        return Err(RetimeError::validation(format!(
            "preset name {name:?} is longer than {MAX_PRESET_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

#[cfg(test)]
#[path = "../../tests/unit/easing/presets.rs"]
mod tests;
