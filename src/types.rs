//! Core types for side-effect-tui.
//!
//! Identities handed out to registered members and the environment flag
//! that picks the delivery path of every recomputation.

use std::fmt;

// =============================================================================
// Member Identity
// =============================================================================

/// Identity of one registered member.
///
/// Members are unique by identity, not by value: two members may carry
/// identical data and still occupy two slots in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u64);

impl MemberId {
    /// Create an id from a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

// =============================================================================
// Environment
// =============================================================================

/// Where recomputed state is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// A live session with an ongoing update loop.
    ///
    /// Recomputation is deferred until the host flushes its update pass,
    /// and the result is handed to `on_client_change`.
    Interactive,
    /// A one-shot render pass with no later flush opportunity.
    ///
    /// Recomputation is immediate, and the result is passed through
    /// `map_for_non_interactive` before being stored.
    NonInteractive,
}

impl Environment {
    /// True for [`Environment::Interactive`].
    pub const fn is_interactive(self) -> bool {
        matches!(self, Environment::Interactive)
    }

    /// Short lowercase name, as accepted by `SIDE_EFFECT_ENV`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Environment::Interactive => "interactive",
            Environment::NonInteractive => "static",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_display() {
        assert_eq!(MemberId::new(7).to_string(), "m7");
        assert_eq!(MemberId::new(7).raw(), 7);
    }

    #[test]
    fn test_member_id_ordering() {
        assert!(MemberId::new(1) < MemberId::new(2));
    }

    #[test]
    fn test_environment_flags() {
        assert!(Environment::Interactive.is_interactive());
        assert!(!Environment::NonInteractive.is_interactive());
        assert_eq!(Environment::NonInteractive.to_string(), "static");
    }
}
