//! Environment detection.
//!
//! The environment is resolved once per process and never changes
//! afterwards. Registries do not read it on their own: providers take an
//! explicit [`Environment`], and only [`ProviderDef::mount_detected`]
//! consults the resolved value, so tests can inject either environment.
//!
//! [`ProviderDef::mount_detected`]: crate::pipeline::ProviderDef::mount_detected

use std::io;
use std::sync::OnceLock;

use crossterm::tty::IsTty;
use tracing::{debug, warn};

use crate::types::Environment;

/// Variable that overrides terminal detection.
pub const ENVIRONMENT_VAR: &str = "SIDE_EFFECT_ENV";

static RESOLVED: OnceLock<Environment> = OnceLock::new();

// =============================================================================
// Detection
// =============================================================================

/// The process-wide environment, resolved on first use.
pub fn environment() -> Environment {
    *RESOLVED.get_or_init(detect_environment)
}

/// Detect the environment without caching it.
///
/// Order:
/// 1. `SIDE_EFFECT_ENV`, when set to a recognized value
/// 2. Interactive if stdout is a terminal, non-interactive otherwise
pub fn detect_environment() -> Environment {
    let override_value = std::env::var(ENVIRONMENT_VAR).ok();
    let environment = resolve(override_value.as_deref(), io::stdout().is_tty());
    debug!(%environment, "resolved environment");
    environment
}

fn resolve(override_value: Option<&str>, stdout_is_tty: bool) -> Environment {
    if let Some(value) = override_value {
        match parse_environment(value) {
            Some(environment) => return environment,
            None => warn!(value, "ignoring unrecognized {ENVIRONMENT_VAR}"),
        }
    }

    if stdout_is_tty {
        Environment::Interactive
    } else {
        Environment::NonInteractive
    }
}

/// Parse an environment name.
///
/// Accepts `interactive`/`client` and `static`/`server`/`non-interactive`,
/// ignoring case and surrounding whitespace.
pub fn parse_environment(value: &str) -> Option<Environment> {
    match value.trim().to_ascii_lowercase().as_str() {
        "interactive" | "client" => Some(Environment::Interactive),
        "static" | "server" | "non-interactive" => Some(Environment::NonInteractive),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
