//! Member - One participant's lifecycle against exactly one registry.
//!
//! A member joins on creation, forwards data changes, and leaves exactly
//! once: either through [`Member::leave`] or when dropped. Every join,
//! update and leave is followed by a recomputation with the timing of the
//! registry's environment.

use std::fmt;
use std::rc::Rc;
use std::thread;

use tracing::debug;

use super::registry::Registry;
use crate::error::RegistryError;
use crate::types::MemberId;

/// A registered participant.
pub struct Member<P, S> {
    registry: Rc<Registry<P, S>>,
    id: MemberId,
    data: Rc<P>,
    attached: bool,
}

impl<P, S> Member<P, S> {
    /// Register `data` under a fresh id and request a recomputation.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateMember`] if the registry rejects the
    /// generated id.
    pub fn join(
        registry: &Rc<Registry<P, S>>,
        data: impl Into<Rc<P>>,
    ) -> Result<Self, RegistryError> {
        Self::join_as(registry, registry.next_id(), data)
    }

    /// Register `data` under an assigned id and request a recomputation.
    ///
    /// If the recomputation panics, the member is dropped while unwinding
    /// and leaves the registry again.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateMember`] if `id` is already registered.
    pub fn join_as(
        registry: &Rc<Registry<P, S>>,
        id: MemberId,
        data: impl Into<Rc<P>>,
    ) -> Result<Self, RegistryError> {
        let data = data.into();
        registry.register(id, data.clone())?;
        debug!(member = %id, "member joined");

        let member = Self {
            registry: registry.clone(),
            id,
            data,
            attached: true,
        };
        registry.request_recompute();
        Ok(member)
    }

    /// Replace this member's data in place and request a recomputation.
    ///
    /// # Errors
    /// [`RegistryError::UnknownMember`] if the registry dropped this member
    /// behind its back.
    pub fn update_data(&mut self, data: impl Into<Rc<P>>) -> Result<(), RegistryError> {
        let data = data.into();
        self.registry.update(self.id, data.clone())?;
        self.data = data;
        self.registry.request_recompute();
        Ok(())
    }

    /// Deregister and request a recomputation.
    pub fn leave(mut self) {
        self.detach();
    }

    /// This member's id within its registry.
    pub fn id(&self) -> MemberId {
        self.id
    }

    /// The data this member contributes.
    pub fn data(&self) -> Rc<P> {
        self.data.clone()
    }

    /// The registry this member is registered with.
    pub fn registry(&self) -> &Rc<Registry<P, S>> {
        &self.registry
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.registry.deregister(self.id);
        debug!(member = %self.id, "member left");
        // a second panic from reduce here would abort
        if thread::panicking() {
            return;
        }
        self.registry.request_recompute();
    }
}

impl<P, S> Drop for Member<P, S> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<P, S> fmt::Debug for Member<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .finish_non_exhaustive()
    }
}
