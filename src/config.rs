//! Host configuration, validation and interaction tuning.
//!
//! DESIGN
//! ======
//! `CanvasConfig` is what a host hands the engine at mount time. Every field
//! except `canvas_size` is optional. Invalid values never abort the
//! interaction loop: [`CanvasConfig::resolve`] substitutes safe defaults and
//! returns the list of problems so the engine can report them once.
//!
//! `GestureTuning` holds the physics and recognition thresholds. Defaults come
//! from [`crate::consts`]; `from_env` lets a deployment override them through
//! `CANVAS_*` variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::animation::SpringConfig;
use crate::consts;
use crate::geometry::Size;

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("canvas size must be positive and finite, got {width}x{height}")]
    NonPositiveCanvas { width: f64, height: f64 },
    #[error("content size must be positive and finite, got {width}x{height}")]
    NonPositiveContent { width: f64, height: f64 },
    #[error("invalid zoom range: min {min}, max {max} (expected 0 < min <= max)")]
    InvalidZoomRange { min: f64, max: f64 },
}

// =============================================================================
// ZOOM RANGE
// =============================================================================

/// Zoom multipliers allowed on top of fit-scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self { min: consts::DEFAULT_ZOOM_RANGE_MIN, max: consts::DEFAULT_ZOOM_RANGE_MAX }
    }
}

impl ZoomRange {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max
    }

    #[must_use]
    pub fn clamp(self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }

    #[must_use]
    pub fn contains(self, zoom: f64) -> bool {
        zoom >= self.min && zoom <= self.max
    }
}

// =============================================================================
// HOST CONFIG
// =============================================================================

/// Content size as supplied by the host; either dimension may be unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentSizeConfig {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Zoom range as supplied by the host; either bound may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoomRangeConfig {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// Configuration accepted when a canvas is mounted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub canvas_size: Size,
    #[serde(default)]
    pub content_size: ContentSizeConfig,
    #[serde(default)]
    pub zoom_range: ZoomRangeConfig,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Configuration after defaults and fallbacks have been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub canvas_size: Size,
    pub content_size: Size,
    pub zoom_range: ZoomRange,
    pub is_active: bool,
}

impl CanvasConfig {
    #[must_use]
    pub fn new(canvas_size: Size) -> Self {
        Self {
            canvas_size,
            content_size: ContentSizeConfig::default(),
            zoom_range: ZoomRangeConfig::default(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_content_size(mut self, width: f64, height: f64) -> Self {
        self.content_size = ContentSizeConfig { width: Some(width), height: Some(height) };
        self
    }

    #[must_use]
    pub fn with_zoom_range(mut self, min: f64, max: f64) -> Self {
        self.zoom_range = ZoomRangeConfig { min: Some(min), max: Some(max) };
        self
    }

    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Strict check: the first problem found, if any.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.resolve().1.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Apply defaults, replacing invalid values with safe fallbacks.
    ///
    /// Returns the resolved config together with every problem encountered.
    #[must_use]
    pub fn resolve(&self) -> (ResolvedConfig, Vec<ConfigError>) {
        let mut errors = Vec::new();

        let (canvas_size, canvas_err) = sanitize_canvas(self.canvas_size);
        errors.extend(canvas_err);

        let requested_content = Size::new(
            self.content_size.width.unwrap_or(1.0),
            self.content_size.height.unwrap_or(1.0),
        );
        let (content_size, content_err) = sanitize_content(requested_content);
        errors.extend(content_err);

        let defaults = ZoomRange::default();
        let requested_zoom = ZoomRange::new(
            self.zoom_range.min.unwrap_or(defaults.min),
            self.zoom_range.max.unwrap_or(defaults.max),
        );
        let zoom_range = if requested_zoom.is_valid() {
            requested_zoom
        } else {
            errors.push(ConfigError::InvalidZoomRange { min: requested_zoom.min, max: requested_zoom.max });
            defaults
        };

        (ResolvedConfig { canvas_size, content_size, zoom_range, is_active: self.is_active }, errors)
    }
}

/// Replace each non-positive canvas dimension with `1`.
pub(crate) fn sanitize_canvas(size: Size) -> (Size, Option<ConfigError>) {
    if size.is_positive() {
        return (size, None);
    }
    let fix = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
    let err = ConfigError::NonPositiveCanvas { width: size.width, height: size.height };
    (Size::new(fix(size.width), fix(size.height)), Some(err))
}

/// Degenerate content is treated as a unit square.
pub(crate) fn sanitize_content(size: Size) -> (Size, Option<ConfigError>) {
    if size.is_positive() {
        return (size, None);
    }
    let err = ConfigError::NonPositiveContent { width: size.width, height: size.height };
    (Size::default(), Some(err))
}

// =============================================================================
// TUNING
// =============================================================================

/// Recognition thresholds and animation physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTuning {
    pub touch_slop: f64,
    pub double_tap_interval_ms: f64,
    pub double_tap_slop: f64,
    pub double_tap_scale: f64,
    pub tap_max_press_ms: f64,
    pub fling_velocity_threshold: f64,
    pub pan_decay_deceleration: f64,
    pub overscroll_fraction: f64,
    pub spring: SpringConfig,
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            touch_slop: consts::TOUCH_SLOP_PX,
            double_tap_interval_ms: consts::DOUBLE_TAP_INTERVAL_MS,
            double_tap_slop: consts::DOUBLE_TAP_SLOP_PX,
            double_tap_scale: consts::DOUBLE_TAP_SCALE,
            tap_max_press_ms: consts::TAP_MAX_PRESS_MS,
            fling_velocity_threshold: consts::FLING_VELOCITY_THRESHOLD,
            pan_decay_deceleration: consts::PAN_DECAY_DECELERATION,
            overscroll_fraction: consts::OVERSCROLL_FRACTION,
            spring: SpringConfig::default(),
        }
    }
}

impl GestureTuning {
    /// Build tuning from `CANVAS_*` environment variables.
    ///
    /// Optional (defaults from [`crate::consts`]):
    /// - `CANVAS_TOUCH_SLOP`
    /// - `CANVAS_DOUBLE_TAP_INTERVAL_MS`
    /// - `CANVAS_DOUBLE_TAP_SLOP`
    /// - `CANVAS_DOUBLE_TAP_SCALE`
    /// - `CANVAS_FLING_VELOCITY_THRESHOLD`
    /// - `CANVAS_PAN_DECAY_DECELERATION` (must be in `(0, 1)`)
    /// - `CANVAS_OVERSCROLL_FRACTION`
    /// - `CANVAS_SPRING_STIFFNESS`, `CANVAS_SPRING_DAMPING`, `CANVAS_SPRING_MASS`
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => {
                warn!(%key, error = %e, "ignoring unreadable tuning variable");
                None
            }
        })
    }

    /// Same as [`GestureTuning::from_env`] but reading from an arbitrary source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let positive = |key: &str, default: f64| positive_parse(&lookup, key, default);

        let deceleration = env_parse(&lookup, "CANVAS_PAN_DECAY_DECELERATION", d.pan_decay_deceleration);
        let pan_decay_deceleration = if deceleration > 0.0 && deceleration < 1.0 {
            deceleration
        } else {
            warn!(value = deceleration, "CANVAS_PAN_DECAY_DECELERATION out of (0, 1); using default");
            d.pan_decay_deceleration
        };

        Self {
            touch_slop: positive("CANVAS_TOUCH_SLOP", d.touch_slop),
            double_tap_interval_ms: positive("CANVAS_DOUBLE_TAP_INTERVAL_MS", d.double_tap_interval_ms),
            double_tap_slop: positive("CANVAS_DOUBLE_TAP_SLOP", d.double_tap_slop),
            double_tap_scale: positive("CANVAS_DOUBLE_TAP_SCALE", d.double_tap_scale),
            tap_max_press_ms: d.tap_max_press_ms,
            fling_velocity_threshold: positive("CANVAS_FLING_VELOCITY_THRESHOLD", d.fling_velocity_threshold),
            pan_decay_deceleration,
            overscroll_fraction: positive("CANVAS_OVERSCROLL_FRACTION", d.overscroll_fraction),
            spring: SpringConfig {
                stiffness: positive("CANVAS_SPRING_STIFFNESS", d.spring.stiffness),
                damping: positive("CANVAS_SPRING_DAMPING", d.spring.damping),
                mass: positive("CANVAS_SPRING_MASS", d.spring.mass),
                ..d.spring
            },
        }
    }
}

fn env_parse<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    if let Ok(value) = raw.trim().parse::<T>() {
        value
    } else {
        warn!(%key, %raw, "unparseable tuning value; using default");
        default
    }
}

fn positive_parse<F>(lookup: &F, key: &str, default: f64) -> f64
where
    F: Fn(&str) -> Option<String>,
{
    let value = env_parse(lookup, key, default);
    if value.is_finite() && value > 0.0 {
        value
    } else {
        warn!(%key, value, "tuning value must be positive; using default");
        default
    }
}
