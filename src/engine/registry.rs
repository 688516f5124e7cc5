//! Registry - Ordered member set and the single recomputation authority.
//!
//! Manages:
//! - Insertion-ordered member data, unique by [`MemberId`]
//! - The most recently computed aggregate state
//! - Environment-dependent delivery (client handler vs. mapped storage)
//! - A reactive revision counter bumped after every recomputation
//!
//! No registry borrow is held while caller functions run, so `reduce` and
//! `on_client_change` may register, update or deregister members
//! re-entrantly.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, trace, warn};

use crate::config::SideEffectConfig;
use crate::error::RegistryError;
use crate::types::{Environment, MemberId};

// =============================================================================
// Registered Instance
// =============================================================================

struct RegisteredInstance<P> {
    id: MemberId,
    data: Rc<P>,
}

// =============================================================================
// Registry
// =============================================================================

/// Owns the ordered set of registered members of one tree.
pub struct Registry<P, S> {
    config: Rc<SideEffectConfig<P, S>>,
    environment: Environment,
    instances: RefCell<Vec<RegisteredInstance<P>>>,
    aggregate: RefCell<Option<Rc<S>>>,
    pending: Cell<bool>,
    next_id: Cell<u64>,
    revision: Signal<u64>,
}

impl<P, S> Registry<P, S> {
    /// Create an empty registry delivering through `environment`.
    pub fn new(config: Rc<SideEffectConfig<P, S>>, environment: Environment) -> Self {
        Self {
            config,
            environment,
            instances: RefCell::new(Vec::new()),
            aggregate: RefCell::new(None),
            pending: Cell::new(false),
            next_id: Cell::new(0),
            revision: signal(0),
        }
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Generate an id not yet handed out by this registry.
    ///
    /// Skips ids that were registered by hand.
    pub fn next_id(&self) -> MemberId {
        loop {
            let id = MemberId::new(self.next_id.get());
            self.next_id.set(id.raw() + 1);
            if !self.contains(id) {
                return id;
            }
        }
    }

    /// Append a member to the end of the sequence.
    ///
    /// Does not recompute; see [`Registry::request_recompute`].
    ///
    /// # Errors
    /// [`RegistryError::DuplicateMember`] if `id` is already registered.
    pub fn register(&self, id: MemberId, data: impl Into<Rc<P>>) -> Result<(), RegistryError> {
        let mut instances = self.instances.borrow_mut();
        if instances.iter().any(|instance| instance.id == id) {
            return Err(RegistryError::DuplicateMember(id));
        }
        instances.push(RegisteredInstance {
            id,
            data: data.into(),
        });
        trace!(member = %id, count = instances.len(), "registered");
        Ok(())
    }

    /// Replace a member's data, keeping its position.
    ///
    /// # Errors
    /// [`RegistryError::UnknownMember`] if `id` is not registered.
    pub fn update(&self, id: MemberId, data: impl Into<Rc<P>>) -> Result<(), RegistryError> {
        let mut instances = self.instances.borrow_mut();
        let instance = instances
            .iter_mut()
            .find(|instance| instance.id == id)
            .ok_or(RegistryError::UnknownMember(id))?;
        instance.data = data.into();
        trace!(member = %id, "updated");
        Ok(())
    }

    /// Remove a member, preserving the order of the others.
    ///
    /// Returns false, and logs a warning, if `id` was not registered.
    pub fn deregister(&self, id: MemberId) -> bool {
        let mut instances = self.instances.borrow_mut();
        match instances.iter().position(|instance| instance.id == id) {
            Some(index) => {
                instances.remove(index);
                trace!(member = %id, count = instances.len(), "deregistered");
                true
            }
            None => {
                warn!(member = %id, "deregistering a member that is not registered");
                false
            }
        }
    }

    /// Current data of a member.
    pub fn data(&self, id: MemberId) -> Option<Rc<P>> {
        self.instances
            .borrow()
            .iter()
            .find(|instance| instance.id == id)
            .map(|instance| instance.data.clone())
    }

    /// Whether `id` is registered.
    pub fn contains(&self, id: MemberId) -> bool {
        self.instances.borrow().iter().any(|instance| instance.id == id)
    }

    /// Registered ids in registration order.
    pub fn member_ids(&self) -> Vec<MemberId> {
        self.instances.borrow().iter().map(|instance| instance.id).collect()
    }

    /// Number of registered members.
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    /// True if no member is registered.
    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    // -------------------------------------------------------------------------
    // Recomputation
    // -------------------------------------------------------------------------

    /// Reduce the current member data and deliver the result.
    ///
    /// Interactive: the reduced state is stored, then handed to
    /// `on_client_change`. Non-interactive: the reduced state is passed
    /// through `map_for_non_interactive` (when configured) and stored.
    ///
    /// Panics raised by caller functions are not caught.
    pub fn recompute(&self) {
        self.pending.set(false);

        let data: Vec<Rc<P>> = self
            .instances
            .borrow()
            .iter()
            .map(|instance| instance.data.clone())
            .collect();
        let refs: Vec<&P> = data.iter().map(|data| &**data).collect();
        let candidate = (self.config.reduce)(&refs);

        debug!(
            members = refs.len(),
            environment = %self.environment,
            "recomputed aggregate state"
        );

        match self.environment {
            Environment::Interactive => {
                let state = Rc::new(candidate);
                self.store(state.clone());
                (self.config.on_client_change)(&*state);
            }
            Environment::NonInteractive => {
                let state = match &self.config.map_for_non_interactive {
                    Some(map) => map(candidate),
                    None => candidate,
                };
                self.store(Rc::new(state));
            }
        }
    }

    /// Recompute with the timing the environment calls for.
    ///
    /// Interactive: marks the registry pending until the host flushes.
    /// Non-interactive: recomputes immediately.
    pub fn request_recompute(&self) {
        match self.environment {
            Environment::Interactive => self.pending.set(true),
            Environment::NonInteractive => self.recompute(),
        }
    }

    /// Recompute if a change is pending. Returns whether it did.
    pub fn flush(&self) -> bool {
        if !self.pending.get() {
            return false;
        }
        self.recompute();
        true
    }

    /// Whether a change is waiting for [`Registry::flush`].
    pub fn has_pending(&self) -> bool {
        self.pending.get()
    }

    fn store(&self, state: Rc<S>) {
        *self.aggregate.borrow_mut() = Some(state);
        self.revision.set(self.revision.get() + 1);
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// The most recently computed state, None before the first recomputation.
    pub fn state(&self) -> Option<Rc<S>> {
        self.aggregate.borrow().clone()
    }

    /// Number of recomputations so far.
    pub fn revision(&self) -> u64 {
        self.revision.get()
    }

    /// Revision counter for reactive tracking.
    pub fn revision_signal(&self) -> Signal<u64> {
        self.revision.clone()
    }

    /// The environment this registry delivers through.
    pub fn environment(&self) -> Environment {
        self.environment
    }
}

impl<P, S> fmt::Debug for Registry<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("environment", &self.environment)
            .field("members", &self.member_ids())
            .field("pending", &self.pending.get())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    type Calls = Rc<RefCell<Vec<Vec<String>>>>;

    /// Registry that joins its data with commas and records every reduce input.
    fn joining_registry(
        environment: Environment,
        map: Option<fn(String) -> String>,
    ) -> (Registry<String, String>, Calls, Rc<RefCell<Vec<String>>>) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let delivered = Rc::new(RefCell::new(Vec::new()));

        let calls_clone = calls.clone();
        let delivered_clone = delivered.clone();
        let mut builder = SideEffectConfig::builder()
            .reduce(move |list: &[&String]| {
                calls_clone
                    .borrow_mut()
                    .push(list.iter().map(|s| s.to_string()).collect());
                list.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(",")
            })
            .on_client_change(move |state: &String| {
                delivered_clone.borrow_mut().push(state.clone())
            });
        if let Some(map) = map {
            builder = builder.map_for_non_interactive(map);
        }
        let config = builder.build().unwrap();

        (Registry::new(Rc::new(config), environment), calls, delivered)
    }

    fn state(registry: &Registry<String, String>) -> Option<String> {
        registry.state().map(|s| s.to_string())
    }

    #[test]
    fn test_register_preserves_order() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let a = registry.next_id();
        let b = registry.next_id();
        let c = registry.next_id();
        registry.register(a, "a".to_string()).unwrap();
        registry.register(b, "b".to_string()).unwrap();
        registry.register(c, "c".to_string()).unwrap();

        assert_eq!(registry.member_ids(), vec![a, b, c]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_duplicate_fails() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let id = registry.next_id();
        registry.register(id, "a".to_string()).unwrap();
        assert_eq!(
            registry.register(id, "b".to_string()),
            Err(RegistryError::DuplicateMember(id))
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.data(id).as_deref(), Some(&"a".to_string()));
    }

    #[test]
    fn test_next_id_skips_registered_ids() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        registry.register(MemberId::new(0), "a".to_string()).unwrap();
        registry.register(MemberId::new(1), "b".to_string()).unwrap();

        let id = registry.next_id();
        assert_eq!(id, MemberId::new(2));
        registry.register(id, "c".to_string()).unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_identical_data_is_distinct() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let a = registry.next_id();
        let b = registry.next_id();
        registry.register(a, "same".to_string()).unwrap();
        registry.register(b, "same".to_string()).unwrap();
        registry.recompute();

        assert_eq!(state(&registry).as_deref(), Some("same,same"));
    }

    #[test]
    fn test_deregister_keeps_survivor_order() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|data| {
                let id = registry.next_id();
                registry.register(id, data.to_string()).unwrap();
                id
            })
            .collect();

        assert!(registry.deregister(ids[1]));
        assert_eq!(registry.member_ids(), vec![ids[0], ids[2]]);

        registry.recompute();
        assert_eq!(state(&registry).as_deref(), Some("a,c"));
    }

    #[test]
    fn test_deregister_unknown_is_noop() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let id = registry.next_id();
        registry.register(id, "a".to_string()).unwrap();

        assert!(!registry.deregister(MemberId::new(99)));
        assert_eq!(registry.member_ids(), vec![id]);
    }

    #[test]
    fn test_update_in_place() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);

        let a = registry.next_id();
        let b = registry.next_id();
        registry.register(a, "a".to_string()).unwrap();
        registry.register(b, "b".to_string()).unwrap();

        registry.update(a, "z".to_string()).unwrap();
        registry.recompute();

        assert_eq!(registry.member_ids(), vec![a, b]);
        assert_eq!(state(&registry).as_deref(), Some("z,b"));
    }

    #[test]
    fn test_update_unknown_fails() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);
        let id = MemberId::new(5);
        assert_eq!(
            registry.update(id, "x".to_string()),
            Err(RegistryError::UnknownMember(id))
        );
    }

    #[test]
    fn test_recompute_interactive_delivers_unmapped() {
        let (registry, calls, delivered) =
            joining_registry(Environment::Interactive, Some(|s: String| s.to_uppercase()));

        let id = registry.next_id();
        registry.register(id, "x".to_string()).unwrap();
        registry.recompute();

        assert_eq!(state(&registry).as_deref(), Some("x"));
        assert_eq!(*delivered.borrow(), vec!["x".to_string()]);
        assert_eq!(*calls.borrow(), vec![vec!["x".to_string()]]);
    }

    #[test]
    fn test_recompute_non_interactive_maps_and_skips_client() {
        let (registry, _, delivered) =
            joining_registry(Environment::NonInteractive, Some(|s: String| s.to_uppercase()));

        let id = registry.next_id();
        registry.register(id, "x".to_string()).unwrap();
        registry.recompute();

        assert_eq!(state(&registry).as_deref(), Some("X"));
        assert!(delivered.borrow().is_empty());
    }

    #[test]
    fn test_recompute_empty_registry() {
        let (registry, calls, _) = joining_registry(Environment::NonInteractive, None);
        assert!(registry.state().is_none());

        registry.recompute();
        assert_eq!(state(&registry).as_deref(), Some(""));
        assert_eq!(*calls.borrow(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_request_recompute_timing() {
        let (interactive, calls, _) = joining_registry(Environment::Interactive, None);
        let id = interactive.next_id();
        interactive.register(id, "a".to_string()).unwrap();
        interactive.request_recompute();

        assert!(interactive.has_pending());
        assert!(calls.borrow().is_empty());
        assert!(interactive.flush());
        assert!(!interactive.has_pending());
        assert_eq!(calls.borrow().len(), 1);
        assert!(!interactive.flush());

        let (immediate, calls, _) = joining_registry(Environment::NonInteractive, None);
        let id = immediate.next_id();
        immediate.register(id, "a".to_string()).unwrap();
        immediate.request_recompute();

        assert!(!immediate.has_pending());
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_revision_bumps_on_every_recompute() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);
        assert_eq!(registry.revision(), 0);

        registry.recompute();
        registry.recompute();
        assert_eq!(registry.revision(), 2);
        assert_eq!(registry.revision_signal().get(), 2);
    }

    #[test]
    fn test_repeated_reads_are_stable() {
        let (registry, _, _) = joining_registry(Environment::NonInteractive, None);
        let id = registry.next_id();
        registry.register(id, "a".to_string()).unwrap();
        registry.recompute();

        let first = registry.state().unwrap();
        let second = registry.state().unwrap();
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_reentrant_deregister_from_client_change() {
        let slot: Rc<RefCell<Option<Rc<Registry<String, usize>>>>> = Rc::new(RefCell::new(None));
        let slot_clone = slot.clone();

        let config = SideEffectConfig::builder()
            .reduce(|list: &[&String]| list.len())
            .on_client_change(move |count: &usize| {
                if *count == 2 {
                    let registry = slot_clone.borrow().clone().unwrap();
                    assert!(registry.deregister(MemberId::new(0)));
                    registry.recompute();
                }
            })
            .build()
            .unwrap();
        let registry = Rc::new(Registry::new(Rc::new(config), Environment::Interactive));
        *slot.borrow_mut() = Some(registry.clone());

        for data in ["a", "b"] {
            let id = registry.next_id();
            registry.register(id, data.to_string()).unwrap();
        }
        registry.recompute();

        assert_eq!(registry.state().as_deref(), Some(&1));
        assert_eq!(registry.member_ids(), vec![MemberId::new(1)]);
        assert_eq!(registry.revision(), 2);

        slot.borrow_mut().take();
    }
}
