//! Hand-off with an optional enclosing horizontal pager.
//!
//! The pager and the canvas share two boolean flags, each a single observable
//! value with last-write-wins semantics:
//!
//! | Flag | Writer | Meaning |
//! |------|--------|---------|
//! | `should_pager_scroll` | canvas | content is at fit-scale; horizontal swipes page |
//! | `is_swiping_in_pager` | pager | a page turn is in progress; pan must not move horizontally |
//!
//! The canvas never owns the pager; it only holds clones of the flag handles.
//! Without a pager the bridge keeps private flags nobody else reads.

#[cfg(test)]
#[path = "pager_test.rs"]
mod pager_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shareable boolean handle. Clones observe the same value.
#[derive(Debug, Clone, Default)]
pub struct SharedFlag(Arc<AtomicBool>);

impl SharedFlag {
    #[must_use]
    pub fn new(value: bool) -> Self {
        Self(Arc::new(AtomicBool::new(value)))
    }

    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Replace the value, returning the previous one.
    pub fn set(&self, value: bool) -> bool {
        self.0.swap(value, Ordering::AcqRel)
    }
}

/// Flag handles injected by a host that embeds the canvas in a pager.
#[derive(Debug, Clone, Default)]
pub struct PagerLink {
    pub should_pager_scroll: SharedFlag,
    pub is_swiping_in_pager: SharedFlag,
}

impl PagerLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// The pager state a pan decision needs, read once per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PagerSignals {
    pub should_pager_scroll: bool,
    pub is_swiping_in_pager: bool,
}

#[derive(Debug, Clone)]
pub struct PagerBridge {
    link: PagerLink,
    attached: bool,
    published: Option<bool>,
}

impl PagerBridge {
    #[must_use]
    pub fn new(link: Option<PagerLink>) -> Self {
        let attached = link.is_some();
        Self { link: link.unwrap_or_default(), attached, published: None }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Publish whether the content is at rest. Returns whether the published
    /// value changed.
    pub fn publish(&mut self, at_rest: bool) -> bool {
        if self.published == Some(at_rest) {
            return false;
        }
        self.published = Some(at_rest);
        self.link.should_pager_scroll.set(at_rest);
        true
    }

    #[must_use]
    pub fn signals(&self) -> PagerSignals {
        PagerSignals {
            should_pager_scroll: self.attached && self.link.should_pager_scroll.get(),
            is_swiping_in_pager: self.attached && self.link.is_swiping_in_pager.get(),
        }
    }
}
