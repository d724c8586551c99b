//! Fit-scale: how large the content is drawn at zoom 1.
//!
//! `min_scale` makes the content fit entirely inside the canvas (contain);
//! `max_scale` makes it fill the canvas on both axes (cover).

#[cfg(test)]
#[path = "fit_test.rs"]
mod fit_test;

use crate::config::ConfigError;
use crate::geometry::Size;

/// The contain and cover scales for a canvas/content pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitScale {
    pub min_scale: f64,
    pub max_scale: f64,
}

/// Compute the fit scales for `content` inside `canvas`.
///
/// # Errors
///
/// Returns a [`ConfigError`] if either size has a non-positive or non-finite
/// dimension.
pub fn fit_scale(canvas: Size, content: Size) -> Result<FitScale, ConfigError> {
    if !canvas.is_positive() {
        return Err(ConfigError::NonPositiveCanvas { width: canvas.width, height: canvas.height });
    }
    if !content.is_positive() {
        return Err(ConfigError::NonPositiveContent { width: content.width, height: content.height });
    }
    let sx = canvas.width / content.width;
    let sy = canvas.height / content.height;
    Ok(FitScale { min_scale: sx.min(sy), max_scale: sx.max(sy) })
}

/// Memoized [`fit_scale`] that recomputes only when an input changes.
#[derive(Debug, Clone, Copy)]
pub struct FitScaleCache {
    canvas: Size,
    content: Size,
    value: FitScale,
}

impl Default for FitScaleCache {
    /// Unit canvas and unit content.
    fn default() -> Self {
        Self { canvas: Size::default(), content: Size::default(), value: FitScale { min_scale: 1.0, max_scale: 1.0 } }
    }
}

impl FitScaleCache {
    /// # Errors
    ///
    /// Propagates the validation error from [`fit_scale`].
    pub fn new(canvas: Size, content: Size) -> Result<Self, ConfigError> {
        let value = fit_scale(canvas, content)?;
        Ok(Self { canvas, content, value })
    }

    #[must_use]
    pub fn get(&self) -> FitScale {
        self.value
    }

    #[must_use]
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    #[must_use]
    pub fn content(&self) -> Size {
        self.content
    }

    /// Update the inputs. Returns `Ok(true)` when the value was recomputed.
    /// On error the previous inputs and value are kept.
    ///
    /// # Errors
    ///
    /// Propagates the validation error from [`fit_scale`].
    pub fn update(&mut self, canvas: Size, content: Size) -> Result<bool, ConfigError> {
        if canvas == self.canvas && content == self.content {
            return Ok(false);
        }
        self.value = fit_scale(canvas, content)?;
        self.canvas = canvas;
        self.content = content;
        Ok(true)
    }
}
