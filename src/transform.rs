//! The transform state shared by every recognizer and the reset controller.
//!
//! DESIGN
//! ======
//! Persistent values (`zoom_scale`, `pan_offset`) survive between gestures.
//! Transient values (`pan_translate`, `pinch_scale`, `pinch_offset`) carry
//! in-gesture deltas and return to identity once folded. Derived values are
//! computed on read and never stored.
//!
//! The rendered transform scales the content about its own center, then
//! translates it so that a translate of zero keeps it centered in the canvas.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use serde::Serialize;

use crate::animation::{AnimatedValue, AnimatedVector};
use crate::bounds;
use crate::config::ZoomRange;
use crate::consts;
use crate::fit::FitScale;
use crate::geometry::{Point, Size, Vector};

/// Geometry a gesture is evaluated against: sizes, fit and the zoom range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub canvas: Size,
    pub content: Size,
    pub fit: FitScale,
    pub zoom_range: ZoomRange,
}

impl Viewport {
    /// Canvas pixels per content pixel at the given zoom multiplier.
    #[must_use]
    pub fn total_scale(&self, zoom: f64) -> f64 {
        zoom * self.fit.min_scale
    }

    /// How far the content may be translated from center at `zoom`.
    #[must_use]
    pub fn travel_limit(&self, zoom: f64) -> Vector {
        bounds::travel_limit(self.canvas, self.content, self.total_scale(zoom))
    }

    /// Half extent of the content as drawn at `zoom`.
    #[must_use]
    pub fn half_extent(&self, zoom: f64) -> Vector {
        let drawn = self.content.scale(self.total_scale(zoom));
        Vector::new(drawn.width * 0.5, drawn.height * 0.5)
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.canvas.center()
    }
}

/// A snapshot of what the presentation layer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// Offset of the content center from the canvas center, in canvas pixels.
    pub translate: Vector,
    /// Canvas pixels per content pixel.
    pub scale: f64,
    /// Zoom multiplier on top of fit-scale, including any live pinch.
    pub zoom: f64,
    pub canvas_center: Point,
    pub content_center: Point,
}

impl Transform {
    /// Convert a point in content pixels to canvas pixels.
    #[must_use]
    pub fn content_to_canvas(&self, content: Point) -> Point {
        self.canvas_center + self.translate + (content - self.content_center) * self.scale
    }

    /// Convert a point in canvas pixels to content pixels.
    #[must_use]
    pub fn canvas_to_content(&self, canvas: Point) -> Point {
        self.content_center + (canvas - self.canvas_center - self.translate) * (1.0 / self.scale)
    }
}

/// The animated values behind the rendered transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub zoom_scale: AnimatedValue,
    pub pan_offset: AnimatedVector,
    pub pan_translate: AnimatedVector,
    pub pinch_scale: AnimatedValue,
    pub pinch_offset: AnimatedVector,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            zoom_scale: AnimatedValue::new(1.0),
            pan_offset: AnimatedVector::default(),
            pan_translate: AnimatedVector::default(),
            pinch_scale: AnimatedValue::new(1.0),
            pinch_offset: AnimatedVector::default(),
        }
    }
}

impl TransformState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zoom multiplier currently on screen: `zoom_scale × pinch_scale`.
    #[must_use]
    pub fn effective_zoom(&self) -> f64 {
        self.zoom_scale.value() * self.pinch_scale.value()
    }

    /// `zoom_scale × min_content_scale`.
    #[must_use]
    pub fn total_scale(&self, viewport: &Viewport) -> f64 {
        viewport.total_scale(self.zoom_scale.value())
    }

    /// Whether the content sits at fit-scale so an enclosing pager may swipe.
    #[must_use]
    pub fn is_at_rest_for_pager(&self) -> bool {
        (self.zoom_scale.value() - 1.0).abs() <= consts::AT_REST_EPSILON
    }

    /// Combined translation: `pan_offset + pan_translate + pinch_offset`.
    #[must_use]
    pub fn translate(&self) -> Vector {
        self.pan_offset.value() + self.pan_translate.value() + self.pinch_offset.value()
    }

    #[must_use]
    pub fn transform(&self, viewport: &Viewport) -> Transform {
        let zoom = self.effective_zoom();
        Transform {
            translate: self.translate(),
            scale: viewport.total_scale(zoom),
            zoom,
            canvas_center: viewport.canvas.center(),
            content_center: viewport.content.center(),
        }
    }

    /// Zoom 1, every offset zero and no pinch delta.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn is_identity(&self) -> bool {
        self.is_at_rest_for_pager()
            && (self.pinch_scale.value() - 1.0).abs() <= consts::AT_REST_EPSILON
            && self.pan_offset.value() == Vector::ZERO
            && self.pan_translate.value() == Vector::ZERO
            && self.pinch_offset.value() == Vector::ZERO
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.zoom_scale.is_animating()
            || self.pinch_scale.is_animating()
            || self.pan_offset.is_animating()
            || self.pan_translate.is_animating()
            || self.pinch_offset.is_animating()
    }

    /// Advance every running animation. Returns whether any value moved.
    pub fn step(&mut self, dt_ms: f64) -> bool {
        let mut moved = self.zoom_scale.step(dt_ms);
        moved |= self.pinch_scale.step(dt_ms);
        moved |= self.pan_offset.step(dt_ms);
        moved |= self.pan_translate.step(dt_ms);
        moved |= self.pinch_offset.step(dt_ms);
        moved
    }

    /// Stop every running animation where it is.
    pub fn cancel_all(&mut self) -> bool {
        let mut cancelled = self.zoom_scale.cancel();
        cancelled |= self.pinch_scale.cancel();
        cancelled |= self.pan_offset.cancel();
        cancelled |= self.pan_translate.cancel();
        cancelled |= self.pinch_offset.cancel();
        cancelled
    }
}
