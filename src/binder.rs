//! Binder - Wires content definitions to registries.
//!
//! A [`Binder`] holds one validated [`SideEffectConfig`]. Each call to
//! [`Binder::wrap`] creates a fresh context key and returns a matching
//! pair: the [`SideEffect`] wrapper and the [`ProviderDef`] whose mounts it
//! registers with. Pairs from different `wrap` calls never see each other.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::config::SideEffectConfig;
use crate::engine::ContextKey;
use crate::error::WrapError;
use crate::pipeline::ProviderDef;
use crate::primitives::content::Content;
use crate::primitives::side_effect::SideEffect;

/// A configured side effect, ready to wrap content.
pub struct Binder<P, S> {
    config: Rc<SideEffectConfig<P, S>>,
}

/// The two artifacts produced by [`Binder::wrap`].
pub struct Wrapped<P, S> {
    /// Wrapper that registers every mounted copy of the content.
    pub side_effect: SideEffect<P, S>,
    /// Provider boundary the wrapper registers with.
    pub provider: ProviderDef<P, S>,
}

impl<P, S> Binder<P, S> {
    pub fn new(config: SideEffectConfig<P, S>) -> Self {
        Self {
            config: Rc::new(config),
        }
    }

    /// The shared configuration.
    pub fn config(&self) -> &SideEffectConfig<P, S> {
        &self.config
    }
}

impl<P: 'static, S: 'static> Binder<P, S> {
    /// Wrap a component definition.
    ///
    /// # Errors
    /// [`WrapError::NotAComponent`] if `content` is not a component.
    pub fn wrap(&self, content: impl Into<Content<P>>) -> Result<Wrapped<P, S>, WrapError> {
        let component = content.into().into_component()?;
        let key = ContextKey::next();
        let side_effect = SideEffect::new(key, component);
        debug!(component = %side_effect.display_name(), "wrapped component");

        Ok(Wrapped {
            side_effect,
            provider: ProviderDef::new(key, self.config.clone()),
        })
    }
}

impl<P, S> Clone for Binder<P, S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
        }
    }
}

impl<P, S> fmt::Debug for Binder<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binder").field("config", &self.config).finish()
    }
}

impl<P, S> fmt::Debug for Wrapped<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wrapped")
            .field("side_effect", &self.side_effect)
            .field("provider", &self.provider)
            .finish()
    }
}
