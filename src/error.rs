//! Error types.
//!
//! Configuration and wrapping failures surface synchronously, before any
//! content exists. Failures raised inside caller-supplied functions are
//! not represented here: they unwind through whichever lifecycle event
//! triggered the recomputation.

use thiserror::Error;

use crate::types::MemberId;

/// Configuration was rejected while building the side effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No `reduce` function was supplied.
    #[error("expected reduce to be a function")]
    MissingReduce,
    /// No `on_client_change` function was supplied.
    #[error("expected on_client_change to be a function")]
    MissingClientChange,
}

/// The content handed to [`Binder::wrap`](crate::Binder::wrap) cannot be wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WrapError {
    /// Only component definitions receive data and can be wrapped.
    #[error("expected a component to wrap, got {kind} content")]
    NotAComponent { kind: &'static str },
}

/// Registry protocol violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("member {0} is already registered")]
    DuplicateMember(MemberId),
    #[error("member {0} is not registered")]
    UnknownMember(MemberId),
}

/// A wrapped component could not be mounted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    /// No provider for this component's binding is in scope.
    #[error("{component} was mounted outside of its provider")]
    NoProvider { component: String },
    /// A failed re-parenting left the mount outside of every registry.
    #[error("{component} is not registered with any provider")]
    Detached { component: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
