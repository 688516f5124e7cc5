//! # side-effect-tui
//!
//! Collect per-component side effects into one reduced state.
//!
//! Any number of independently mounted components contribute a piece of
//! data to a shared registry. The registry reduces the data of every
//! currently mounted component, in mount order, into one aggregate state
//! and delivers it: to a client handler in an interactive session, or into
//! storage (optionally mapped) in a one-shot render.
//!
//! ## Architecture
//!
//! ```text
//! SideEffectConfig → Binder::wrap → (SideEffect, ProviderDef)
//! ProviderDef::mount → Provider (one Registry) → Scope
//! SideEffect::mount(scope) → Member joins Registry → reduce → deliver
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use side_effect_tui::{Component, Environment, Scope, SideEffectConfig};
//!
//! let binder = SideEffectConfig::builder()
//!     .reduce(|titles: &[&String]| titles.last().map(|t| t.to_string()))
//!     .on_client_change(|title: &Option<String>| println!("title: {title:?}"))
//!     .build()?
//!     .into_binder();
//! let title = binder.wrap(Component::named("Title", |_: &String| Box::new(|| {})))?;
//!
//! let provider = title.provider.mount(Environment::Interactive);
//! let scope = provider.scope(&Scope::root());
//! let page = title.side_effect.mount(&scope, "Home".to_string())?;
//! provider.flush(); // prints: title: Some("Home")
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Member ids and the environment flag
//! - [`engine`] - Registry, members and scoped context
//! - [`pipeline`] - Environment detection and providers
//! - [`primitives`] - Content definitions and the side effect wrapper

pub mod binder;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use binder::{Binder, Wrapped};
pub use config::{SideEffectConfig, SideEffectConfigBuilder};
pub use error::{ConfigError, MountError, RegistryError, WrapError};

pub use engine::{ContextKey, Member, Registry, Scope};

pub use pipeline::{
    detect_environment, environment, parse_environment, Provider, ProviderDef, ENVIRONMENT_VAR,
};

pub use primitives::{
    noop_cleanup, Cleanup, ClientChangeFn, Component, Content, MapStateFn, MountedSideEffect,
    ReduceFn, RenderFn, SideEffect,
};
