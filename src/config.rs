//! Tunables for a [`crate::engine::ScrollView`].
//!
//! DESIGN
//! ======
//! Every field has a default, so a config file only names what it changes.
//! Values are clamped into their usable range by [`ScrollViewConfig::sanitized`]
//! rather than rejected; only malformed input (bad JSON, unparsable env values)
//! is an error.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BOUNCE_BACK, DEFAULT_DOUBLE_TAP_DISTANCE_PX, DEFAULT_DOUBLE_TAP_INTERVAL_SECS, DEFAULT_DRAG_DECAY,
    DEFAULT_SCROLL_EASING,
};
use crate::input::DoubleTapRule;
use crate::scroll::MomentumPolicy;
use crate::zoom::DoubleTapZoom;

/// Prefix for environment overrides, e.g. `SCROLLVIEW_SCROLL_EASING`.
pub const ENV_PREFIX: &str = "SCROLLVIEW_";

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value {value:?} for {key}")]
    InvalidEnv { key: String, value: String },
}

// =============================================================================
// CONFIG
// =============================================================================

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollViewConfig {
    /// Fraction of the remaining distance the rendered position covers per frame.
    pub scroll_easing: f64,
    /// Fraction of the overshoot removed per frame when out of bounds.
    pub bounce_back: f64,
    /// Per-frame multiplier on release velocity.
    pub drag_decay: f64,
    pub momentum_policy: MomentumPolicy,
    /// Clamp scale to bounds while a pinch is live. Off lets the pinch overshoot until release.
    pub clamp_zoom_during_gesture: bool,
    /// Two-finger gestures change scale. Off leaves them as two-finger pans.
    pub pinch_zoom_enabled: bool,
    pub user_interaction_enabled: bool,
    /// Classify quick repeated downs as double-taps.
    pub detect_double_tap: bool,
    pub double_tap_interval_secs: f64,
    pub double_tap_distance_px: f64,
    pub double_tap_zoom: DoubleTapZoom,
}

impl Default for ScrollViewConfig {
    fn default() -> Self {
        Self {
            scroll_easing: DEFAULT_SCROLL_EASING,
            bounce_back: DEFAULT_BOUNCE_BACK,
            drag_decay: DEFAULT_DRAG_DECAY,
            momentum_policy: MomentumPolicy::default(),
            clamp_zoom_during_gesture: true,
            pinch_zoom_enabled: true,
            user_interaction_enabled: true,
            detect_double_tap: true,
            double_tap_interval_secs: DEFAULT_DOUBLE_TAP_INTERVAL_SECS,
            double_tap_distance_px: DEFAULT_DOUBLE_TAP_DISTANCE_PX,
            double_tap_zoom: DoubleTapZoom::default(),
        }
    }
}

impl ScrollViewConfig {
    /// Parse a (possibly partial) JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] when the text is not a valid config object.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Overlay `SCROLLVIEW_*` environment variables onto `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when a variable is set but is not
    /// valid Unicode or does not parse.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| {
            let name = format!("{ENV_PREFIX}{key}");
            let result = std::env::var(&name);
            env_value(name, result)
        })
    }

    /// Overlay values from `lookup`, keyed by upper-case field name.
    ///
    /// # Errors
    ///
    /// Propagates a failing `lookup`, and returns [`ConfigError::InvalidEnv`]
    /// when a value is present but does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<Option<String>, ConfigError>,
    {
        override_value(&lookup, "SCROLL_EASING", &mut self.scroll_easing)?;
        override_value(&lookup, "BOUNCE_BACK", &mut self.bounce_back)?;
        override_value(&lookup, "DRAG_DECAY", &mut self.drag_decay)?;
        override_value(&lookup, "CLAMP_ZOOM_DURING_GESTURE", &mut self.clamp_zoom_during_gesture)?;
        override_value(&lookup, "PINCH_ZOOM_ENABLED", &mut self.pinch_zoom_enabled)?;
        override_value(&lookup, "USER_INTERACTION_ENABLED", &mut self.user_interaction_enabled)?;
        override_value(&lookup, "DETECT_DOUBLE_TAP", &mut self.detect_double_tap)?;
        override_value(&lookup, "DOUBLE_TAP_INTERVAL_SECS", &mut self.double_tap_interval_secs)?;
        override_value(&lookup, "DOUBLE_TAP_DISTANCE_PX", &mut self.double_tap_distance_px)?;
        override_value(&lookup, "DOUBLE_TAP_ZOOM_INCREMENT", &mut self.double_tap_zoom.increment)?;
        override_value(&lookup, "DOUBLE_TAP_ZOOM_SECS", &mut self.double_tap_zoom.duration_secs)?;
        if let Some(raw) = lookup("MOMENTUM_POLICY")? {
            self.momentum_policy = match raw.trim() {
                "per_axis" => MomentumPolicy::PerAxis,
                "coupled" => MomentumPolicy::Coupled,
                _ => return Err(invalid("MOMENTUM_POLICY", raw)),
            };
        }
        Ok(self.sanitized())
    }

    /// Clamp every factor into its usable range. Non-finite values fall back to defaults.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.scroll_easing = unit_or(self.scroll_easing, defaults.scroll_easing);
        self.bounce_back = unit_or(self.bounce_back, defaults.bounce_back);
        self.drag_decay = unit_or(self.drag_decay, defaults.drag_decay);
        self.double_tap_interval_secs = non_negative_or(self.double_tap_interval_secs, defaults.double_tap_interval_secs);
        self.double_tap_distance_px = non_negative_or(self.double_tap_distance_px, defaults.double_tap_distance_px);
        self.double_tap_zoom.duration_secs =
            non_negative_or(self.double_tap_zoom.duration_secs, defaults.double_tap_zoom.duration_secs);
        if !self.double_tap_zoom.increment.is_finite() {
            self.double_tap_zoom.increment = defaults.double_tap_zoom.increment;
        }
        self
    }

    /// The double-tap classification thresholds as the touch tracker wants them.
    #[must_use]
    pub fn double_tap_rule(&self) -> DoubleTapRule {
        DoubleTapRule {
            enabled: self.detect_double_tap,
            interval_secs: self.double_tap_interval_secs,
            distance_px: self.double_tap_distance_px,
        }
    }
}

/// Map one `std::env::var` result: unset is `None`, non-Unicode is an error.
fn env_value(name: String, result: Result<String, std::env::VarError>) -> Result<Option<String>, ConfigError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(raw)) => {
            tracing::warn!(key = %name, "environment override is not valid unicode");
            Err(ConfigError::InvalidEnv { key: name, value: raw.to_string_lossy().into_owned() })
        }
    }
}

fn override_value<F, T>(lookup: &F, key: &str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Result<Option<String>, ConfigError>,
    T: std::str::FromStr,
{
    let Some(raw) = lookup(key)? else {
        return Ok(());
    };
    match raw.trim().parse::<T>() {
        Ok(value) => {
            *slot = value;
            Ok(())
        }
        Err(_) => Err(invalid(key, raw)),
    }
}

fn invalid(key: &str, value: String) -> ConfigError {
    ConfigError::InvalidEnv { key: format!("{ENV_PREFIX}{key}"), value }
}

fn unit_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 1.0) } else { fallback }
}

fn non_negative_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { fallback }
}
