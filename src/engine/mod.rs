//! Engine - Registry, members and scoped context.
//!
//! The engine manages the core data structures:
//! - Registry: ordered member data, recomputation and delivery
//! - Member: one participant's join/update/leave lifecycle
//! - Context: the scope chain members use to find their registry
//!
//! # Data Flow
//!
//! ```text
//! Member join/update/leave → Registry (pending or immediate) → reduce → store → deliver
//! ```

mod context;
mod member;
mod registry;

pub use context::*;
pub use member::*;
pub use registry::*;
