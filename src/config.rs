//! Side effect configuration.
//!
//! The three caller-supplied functions are collected by a builder and
//! validated once, in [`SideEffectConfigBuilder::build`]. A built
//! [`SideEffectConfig`] is immutable and shared by every registry created
//! from it.
//!
//! # Example
//!
//! ```ignore
//! use side_effect_tui::SideEffectConfig;
//!
//! let binder = SideEffectConfig::builder()
//!     .reduce(|titles: &[&String]| titles.last().map(|t| t.to_string()))
//!     .on_client_change(|title: &Option<String>| set_window_title(title))
//!     .build()?
//!     .into_binder();
//! ```

use std::fmt;
use std::rc::Rc;

use crate::binder::Binder;
use crate::error::ConfigError;
use crate::primitives::types::{ClientChangeFn, MapStateFn, ReduceFn};

// =============================================================================
// Config
// =============================================================================

/// Validated configuration: how to reduce member data and where to send it.
pub struct SideEffectConfig<P, S> {
    pub(crate) reduce: ReduceFn<P, S>,
    pub(crate) on_client_change: ClientChangeFn<S>,
    pub(crate) map_for_non_interactive: Option<MapStateFn<S>>,
}

impl<P, S> SideEffectConfig<P, S> {
    /// Start building a configuration.
    pub fn builder() -> SideEffectConfigBuilder<P, S> {
        SideEffectConfigBuilder::default()
    }

    /// Whether a non-interactive mapping was supplied.
    pub fn maps_non_interactive(&self) -> bool {
        self.map_for_non_interactive.is_some()
    }

    /// Turn this configuration into a binder.
    pub fn into_binder(self) -> Binder<P, S> {
        Binder::new(self)
    }
}

impl<P, S> fmt::Debug for SideEffectConfig<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffectConfig")
            .field("maps_non_interactive", &self.maps_non_interactive())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`SideEffectConfig`].
pub struct SideEffectConfigBuilder<P, S> {
    reduce: Option<ReduceFn<P, S>>,
    on_client_change: Option<ClientChangeFn<S>>,
    map_for_non_interactive: Option<MapStateFn<S>>,
}

impl<P, S> Default for SideEffectConfigBuilder<P, S> {
    fn default() -> Self {
        Self {
            reduce: None,
            on_client_change: None,
            map_for_non_interactive: None,
        }
    }
}

impl<P, S> SideEffectConfigBuilder<P, S> {
    /// Set the reducer. Required.
    pub fn reduce(mut self, reduce: impl Fn(&[&P]) -> S + 'static) -> Self {
        self.reduce = Some(Rc::new(reduce));
        self
    }

    /// Set the interactive-environment handler. Required.
    pub fn on_client_change(mut self, handler: impl Fn(&S) + 'static) -> Self {
        self.on_client_change = Some(Rc::new(handler));
        self
    }

    /// Set the mapping applied to state in the non-interactive environment.
    pub fn map_for_non_interactive(mut self, map: impl Fn(S) -> S + 'static) -> Self {
        self.map_for_non_interactive = Some(Rc::new(map));
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// * [`ConfigError::MissingReduce`] - no reducer was set
    /// * [`ConfigError::MissingClientChange`] - no client handler was set
    pub fn build(self) -> Result<SideEffectConfig<P, S>, ConfigError> {
        let reduce = self.reduce.ok_or(ConfigError::MissingReduce)?;
        let on_client_change = self
            .on_client_change
            .ok_or(ConfigError::MissingClientChange)?;

        Ok(SideEffectConfig {
            reduce,
            on_client_change,
            map_for_non_interactive: self.map_for_non_interactive,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
