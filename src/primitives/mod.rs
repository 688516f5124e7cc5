//! Primitives - Content definitions and the side effect wrapper.
//!
//! - [`Component`] - a named render function receiving data
//! - [`Content`] - any content definition; only components can be wrapped
//! - [`SideEffect`] - registers every mounted copy of a component

pub mod content;
pub mod side_effect;
pub mod types;

pub use content::{Component, Content, DEFAULT_COMPONENT_NAME};
pub use side_effect::{MountedSideEffect, SideEffect};
pub use types::*;
