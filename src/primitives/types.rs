//! Primitive types - Callbacks and cleanup.
//!
//! These aliases define the functional contract between callers and the
//! registry. All callbacks are `Rc<dyn Fn>` so one configuration can be
//! shared by every registry it produces.

use std::rc::Rc;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by rendered content.
///
/// Call this to unmount the content and release its resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// A cleanup that does nothing.
pub fn noop_cleanup() -> Cleanup {
    Box::new(|| {})
}

// =============================================================================
// Callback Types
// =============================================================================

/// Reduces the data of every registered member, in registration order,
/// into one aggregate state.
pub type ReduceFn<P, S> = Rc<dyn Fn(&[&P]) -> S>;

/// Receives each freshly recomputed state in the interactive environment.
pub type ClientChangeFn<S> = Rc<dyn Fn(&S)>;

/// Maps a recomputed state before it is stored in the non-interactive
/// environment.
pub type MapStateFn<S> = Rc<dyn Fn(S) -> S>;

/// Renders a component with the data it was mounted with.
pub type RenderFn<P> = Rc<dyn Fn(&P) -> Cleanup>;
