//! Input model: pointer events, the set of pointers currently down, and
//! release-velocity estimation.
//!
//! Pointers arrive already normalized by the platform (touch, pen and mouse
//! look the same here). Every event carries the host's timestamp in
//! milliseconds; the engine never reads a clock of its own.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::geometry::{Point, Vector};

/// Identifies one pointer for the lifetime of its contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PointerId(pub u32);

/// A normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down { id: PointerId, point: Point },
    Move { id: PointerId, point: Point },
    Up { id: PointerId, point: Point },
    /// The platform took the pointer away (system gesture, palm rejection).
    Cancel { id: PointerId },
}

impl PointerEvent {
    #[must_use]
    pub fn id(&self) -> PointerId {
        match *self {
            Self::Down { id, .. } | Self::Move { id, .. } | Self::Up { id, .. } | Self::Cancel { id } => id,
        }
    }
}

/// Pointers currently in contact, in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    pointers: Vec<(PointerId, Point)>,
}

impl PointerTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer. A repeated down for a known id only moves it.
    /// Returns whether the pointer is new.
    pub fn down(&mut self, id: PointerId, point: Point) -> bool {
        if self.update(id, point) {
            return false;
        }
        self.pointers.push((id, point));
        true
    }

    /// Move a known pointer. Returns `false` for an unknown id.
    pub fn update(&mut self, id: PointerId, point: Point) -> bool {
        match self.pointers.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => {
                entry.1 = point;
                true
            }
            None => false,
        }
    }

    /// Remove a pointer, returning its last position.
    pub fn up(&mut self, id: PointerId) -> Option<Point> {
        let index = self.pointers.iter().position(|(pid, _)| *pid == id)?;
        Some(self.pointers.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.pointers.clear();
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    #[must_use]
    pub fn position(&self, id: PointerId) -> Option<Point> {
        self.pointers.iter().find(|(pid, _)| *pid == id).map(|(_, p)| *p)
    }

    /// Id of the earliest pointer still down.
    #[must_use]
    pub fn primary(&self) -> Option<PointerId> {
        self.pointers.first().map(|(id, _)| *id)
    }

    /// Mean position of every pointer down.
    #[must_use]
    pub fn centroid(&self) -> Option<Point> {
        if self.pointers.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.pointers.len() as f64;
        let (sx, sy) = self.pointers.iter().fold((0.0, 0.0), |(sx, sy), (_, p)| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    /// The two earliest pointers, which drive a pinch.
    #[must_use]
    pub fn pair(&self) -> Option<(Point, Point)> {
        match self.pointers.as_slice() {
            [(_, a), (_, b), ..] => Some((*a, *b)),
            _ => None,
        }
    }
}

/// Estimates velocity from recent position samples.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    samples: VecDeque<(f64, Vector)>,
    window_ms: f64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(consts::VELOCITY_WINDOW_MS)
    }
}

impl VelocityTracker {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { samples: VecDeque::new(), window_ms }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Record `position` at `time_ms`. Samples that go back in time are dropped.
    pub fn push(&mut self, time_ms: f64, position: Vector) {
        if let Some(&(last, _)) = self.samples.back() {
            if time_ms < last {
                return;
            }
        }
        self.samples.push_back((time_ms, position));
        self.prune(time_ms);
    }

    fn prune(&mut self, now_ms: f64) {
        while let Some(&(t, _)) = self.samples.front() {
            if now_ms - t > self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Velocity in units per second over the window ending at `now_ms`.
    ///
    /// A pointer that rested for longer than the window reports zero.
    #[must_use]
    pub fn velocity_at(&self, now_ms: f64) -> Vector {
        let mut recent = self.samples.iter().filter(|(t, _)| now_ms - t <= self.window_ms);
        let Some(&(t0, p0)) = recent.next() else {
            return Vector::ZERO;
        };
        let Some(&(t1, p1)) = recent.last() else {
            return Vector::ZERO;
        };
        let dt = t1 - t0;
        if dt <= 0.0 {
            return Vector::ZERO;
        }
        (p1 - p0) * (1000.0 / dt)
    }
}
