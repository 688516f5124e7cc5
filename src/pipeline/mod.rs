//! Delivery Pipeline
//!
//! Connects the engine to its host: which environment recomputed state is
//! delivered through, and the provider boundary that owns one registry per
//! tree.
//!
//! ## Key Design Principles
//!
//! - **Resolved once**: the process environment is detected on first use and never changes
//! - **Injected**: providers take an explicit environment; detection is opt-in
//! - **Host-driven**: interactive recomputation waits for the host's flush

pub mod environment;
pub mod provider;

// Re-exports
pub use environment::{detect_environment, environment, parse_environment, ENVIRONMENT_VAR};
pub use provider::{Provider, ProviderDef};
