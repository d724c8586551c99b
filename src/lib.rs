//! Gesture-driven viewport transform engine for a single zoomable canvas.
//!
//! The engine turns raw pointer events into a pan/zoom transform for a piece
//! of content (typically an image) drawn inside a fixed canvas. It fits the
//! content at zoom 1, recognizes pan, pinch, single tap and double tap, keeps
//! the content inside its travel limits with elastic overscroll, and hands
//! horizontal swipes to an enclosing pager while the content is at rest. The
//! host owns the screen and the clock: it feeds events and frame ticks to
//! [`engine::EngineCore`] and draws whatever [`transform::Transform`] it
//! reports.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::EngineCore`] and the [`engine::Action`]s it returns |
//! | [`config`] | Mount configuration, fallbacks and env-tunable gesture thresholds |
//! | [`fit`] | Contain/cover fit-scale and its memoized cache |
//! | [`transform`] | Animated transform state and the snapshot drawn by the host |
//! | [`animation`] | Analytic spring and decay drivers |
//! | [`bounds`] | Travel limits, clamping and overscroll resistance |
//! | [`input`] | Pointer events, pointer tracking and velocity estimation |
//! | [`pan`] | Drag recognizer with rubber-band and fling |
//! | [`pinch`] | Two-finger zoom recognizer with focal anchoring |
//! | [`tap`] | Single/double tap recognizer and double-tap zoom target |
//! | [`coordinator`] | Gesture arbitration: simultaneity, failure requirements, races |
//! | [`reset`] | Return-to-identity, programmatic or on deactivation |
//! | [`pager`] | Flags shared with an enclosing pager |
//! | [`geometry`] | Points, vectors and sizes |
//! | [`consts`] | Default thresholds and tuning constants |

pub mod animation;
pub mod bounds;
pub mod config;
pub mod consts;
pub mod coordinator;
pub mod engine;
pub mod fit;
pub mod geometry;
pub mod input;
pub mod pager;
pub mod pan;
pub mod pinch;
pub mod reset;
pub mod tap;
pub mod transform;
