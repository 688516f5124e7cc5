//! Content definitions.
//!
//! A [`Component`] is a named render function: it receives the data it was
//! mounted with and returns a [`Cleanup`]. Drawing is out of scope here, so a
//! render function is an opaque passthrough as far as the registry is
//! concerned. [`Content`] also covers definitions that render but take no
//! data, which is why only its `Component` variant can be wrapped.

use std::fmt;
use std::rc::Rc;

use crate::error::WrapError;
use crate::primitives::types::{Cleanup, RenderFn};

/// Name reported for components that were never given one.
pub const DEFAULT_COMPONENT_NAME: &str = "Component";

// =============================================================================
// Component
// =============================================================================

/// A renderable component definition.
pub struct Component<P> {
    name: Option<String>,
    render: RenderFn<P>,
}

impl<P> Component<P> {
    /// Create an unnamed component.
    pub fn new(render: impl Fn(&P) -> Cleanup + 'static) -> Self {
        Self {
            name: None,
            render: Rc::new(render),
        }
    }

    /// Create a component with a display name.
    pub fn named(name: impl Into<String>, render: impl Fn(&P) -> Cleanup + 'static) -> Self {
        Self {
            name: Some(name.into()),
            render: Rc::new(render),
        }
    }

    /// Display name, falling back to [`DEFAULT_COMPONENT_NAME`].
    pub fn name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_COMPONENT_NAME,
        }
    }

    /// Render with the given data.
    pub fn render(&self, props: &P) -> Cleanup {
        (self.render)(props)
    }
}

impl<P> Clone for Component<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            render: self.render.clone(),
        }
    }
}

impl<P> fmt::Debug for Component<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component").field("name", &self.name()).finish()
    }
}

// =============================================================================
// Content
// =============================================================================

/// Any content definition that can appear in a tree.
pub enum Content<P> {
    /// A component that receives data.
    Component(Component<P>),
    /// Literal text.
    Text(String),
    /// Renders nothing.
    Empty,
}

impl<P> Content<P> {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Component(_) => "component",
            Content::Text(_) => "text",
            Content::Empty => "empty",
        }
    }

    /// Extract the component definition, rejecting everything else.
    pub fn into_component(self) -> Result<Component<P>, WrapError> {
        match self {
            Content::Component(component) => Ok(component),
            other => Err(WrapError::NotAComponent { kind: other.kind() }),
        }
    }
}

impl<P> From<Component<P>> for Content<P> {
    fn from(component: Component<P>) -> Self {
        Content::Component(component)
    }
}

impl<P> fmt::Debug for Content<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Component(component) => f.debug_tuple("Component").field(component).finish(),
            Content::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Content::Empty => f.write_str("Empty"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
