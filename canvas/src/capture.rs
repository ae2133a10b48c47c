//! Scoped pointer capture for the lifetime of a gesture.
//!
//! Once a gesture starts, move/up events must reach the engine even when the
//! pointer leaves the element the gesture began on. The host exposes that
//! broader subscription as a [`PointerScope`]; the engine holds a
//! [`PointerCapture`] guard while any gesture is active. Dropping the guard
//! releases the scope, so every exit path (pointer-up, cancel, present mode,
//! engine teardown) unsubscribes exactly once.

#[cfg(test)]
#[path = "capture_test.rs"]
mod capture_test;

use std::rc::Rc;

/// A host-side, window-wide pointer move/up subscription.
pub trait PointerScope {
    /// Start forwarding move/up events from anywhere to the engine.
    fn acquire(&self);
    /// Stop forwarding.
    fn release(&self);
}

/// RAII guard over an acquired [`PointerScope`].
pub struct PointerCapture {
    scope: Rc<dyn PointerScope>,
}

impl PointerCapture {
    /// Acquire `scope` and return the guard that will release it.
    #[must_use]
    pub fn acquire(scope: &Rc<dyn PointerScope>) -> Self {
        scope.acquire();
        Self { scope: Rc::clone(scope) }
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.scope.release();
    }
}

impl std::fmt::Debug for PointerCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PointerCapture")
    }
}
