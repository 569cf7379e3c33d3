//! Edge indicator options: documented defaults, JSON loading, validation.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_DISTANCE_OPACITY_FACTOR;
use crate::marker::Icon;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("icon size must be positive and finite (got {width}x{height})")]
    NonPositiveIconSize { width: f64, height: f64 },
    #[error("distance opacity factor must be positive and finite (got {0})")]
    NonPositiveFadeFactor(f64),
    #[error("invalid indicator options: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Options fixed when an edge indicator is constructed.
///
/// Deserializing a partial document fills every missing field from
/// [`EdgeIndicatorOptions::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeIndicatorOptions {
    /// Icon drawn at the viewport edge. Defaults to a 48x48 arrow.
    pub icon: Icon,
    /// Point the icon from its edge position toward the viewport centre.
    pub rotate_icons: bool,
    /// Fade the icon as the target gets further outside the viewport.
    pub distance_opacity: bool,
    /// Overshoot pixels per percent of opacity lost.
    pub distance_opacity_factor: f64,
    /// Clicking the icon centres the view on the target.
    pub clickable: bool,
}

impl Default for EdgeIndicatorOptions {
    fn default() -> Self {
        Self {
            icon: Icon::default(),
            rotate_icons: true,
            distance_opacity: false,
            distance_opacity_factor: DEFAULT_DISTANCE_OPACITY_FACTOR,
            clickable: true,
        }
    }
}

impl EdgeIndicatorOptions {
    /// Parse options from JSON, merging over the defaults, and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON or a wrongly typed
    /// field, otherwise any error from [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    /// # Errors
    ///
    /// Returns an error if the icon has a non-positive or infinite dimension,
    /// or the fade factor is not positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.icon.validate()?;
        if is_positive_finite(self.distance_opacity_factor) {
            Ok(())
        } else {
            Err(ConfigError::NonPositiveFadeFactor(self.distance_opacity_factor))
        }
    }
}

/// True for finite values above zero. NaN and infinities fail.
pub(crate) fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
