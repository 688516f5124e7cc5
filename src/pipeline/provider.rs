//! Provider - The registry boundary of one tree.
//!
//! A [`ProviderDef`] is produced by [`Binder::wrap`](crate::Binder::wrap)
//! alongside its [`SideEffect`](crate::SideEffect). Mounting it creates a
//! [`Provider`], which owns exactly one [`Registry`]. Content rendered in the
//! provider's scope registers with that registry.
//!
//! # Update passes
//!
//! In the interactive environment, joins, updates and leaves only mark the
//! registry pending. The host calls [`Provider::flush`] once its update pass
//! is done, so every change made during the pass is reduced together.
//! [`Provider::render`] does this automatically after rendering children.
//!
//! ```ignore
//! let provider = wrapped.provider.mount(Environment::Interactive);
//! let cleanup = provider.render(&Scope::root(), |scope| {
//!     let title = wrapped.side_effect.mount(scope, "Home".to_string()).unwrap();
//!     Box::new(move || title.unmount())
//! });
//! // flushed: on_client_change saw the "Home" title
//! ```

use std::fmt;
use std::rc::Rc;

use spark_signals::Signal;
use tracing::debug;

use crate::config::SideEffectConfig;
use crate::engine::{ContextKey, Registry, Scope};
use crate::pipeline::environment::environment;
use crate::primitives::types::Cleanup;
use crate::types::Environment;

// =============================================================================
// Provider Definition
// =============================================================================

/// Recipe for providers of one binding.
pub struct ProviderDef<P, S> {
    key: ContextKey,
    config: Rc<SideEffectConfig<P, S>>,
}

impl<P: 'static, S: 'static> ProviderDef<P, S> {
    pub(crate) fn new(key: ContextKey, config: Rc<SideEffectConfig<P, S>>) -> Self {
        Self { key, config }
    }

    /// Mount a provider delivering through `environment`.
    pub fn mount(&self, environment: Environment) -> Provider<P, S> {
        debug!(%environment, "provider mounted");
        Provider {
            key: self.key,
            registry: Rc::new(Registry::new(self.config.clone(), environment)),
        }
    }

    /// Mount a provider delivering through the process-wide environment.
    pub fn mount_detected(&self) -> Provider<P, S> {
        self.mount(environment())
    }
}

impl<P, S> Clone for ProviderDef<P, S> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            config: self.config.clone(),
        }
    }
}

impl<P, S> fmt::Debug for ProviderDef<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderDef").field("key", &self.key).finish()
    }
}

// =============================================================================
// Provider
// =============================================================================

/// A mounted provider: one registry and the scope that exposes it.
pub struct Provider<P, S> {
    key: ContextKey,
    registry: Rc<Registry<P, S>>,
}

impl<P: 'static, S: 'static> Provider<P, S> {
    /// `parent` extended with this provider's registry.
    pub fn scope(&self, parent: &Scope) -> Scope {
        parent.provide(self.key, self.registry.clone())
    }

    /// Render `children` in this provider's scope, then flush.
    pub fn render(&self, parent: &Scope, children: impl FnOnce(&Scope) -> Cleanup) -> Cleanup {
        let scope = self.scope(parent);
        let cleanup = children(&scope);
        self.flush();
        cleanup
    }

    /// End of an update pass: recompute if anything changed during it.
    ///
    /// Returns whether a recomputation ran. Never runs in the
    /// non-interactive environment, where changes recompute immediately.
    pub fn flush(&self) -> bool {
        self.registry.flush()
    }

    /// Recompute now, whether or not anything changed.
    pub fn force_recompute(&self) {
        self.registry.recompute();
    }

    /// The latest aggregate state.
    pub fn state(&self) -> Option<Rc<S>> {
        self.registry.state()
    }

    /// Revision counter for reactive tracking of [`Provider::state`].
    pub fn revision_signal(&self) -> Signal<u64> {
        self.registry.revision_signal()
    }

    /// The environment this provider delivers through.
    pub fn environment(&self) -> Environment {
        self.registry.environment()
    }

    /// The registry owned by this provider.
    pub fn registry(&self) -> &Rc<Registry<P, S>> {
        &self.registry
    }
}

impl<P, S> fmt::Debug for Provider<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("registry", &self.registry)
            .finish()
    }
}
