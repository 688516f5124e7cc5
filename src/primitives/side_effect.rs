//! SideEffect - The content wrapper produced by a binder.
//!
//! Every mount of a [`SideEffect`] finds the nearest matching provider in
//! its scope, joins that provider's registry as a [`Member`], and renders
//! the wrapped component with its data unchanged. The returned
//! [`MountedSideEffect`] forwards data updates, moves the member to another
//! provider on re-parenting, and leaves the registry when unmounted or
//! dropped.
//!
//! # Lifecycle
//!
//! - `mount` - join, then render the wrapped component
//! - `update` - replace the member's data in place, then re-render
//! - `reparent` - leave the old registry, join the new one, re-render
//!   (a mount whose re-parenting failed rejoins on the next `reparent`)
//! - `unmount` - leave, then run the wrapped component's cleanup

use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use tracing::debug;

use crate::engine::{ContextKey, Member, Registry, Scope};
use crate::error::MountError;
use crate::primitives::content::Component;
use crate::primitives::types::Cleanup;
use crate::types::MemberId;

// =============================================================================
// SideEffect
// =============================================================================

/// A component whose every mount contributes its data to a registry.
pub struct SideEffect<P, S> {
    key: ContextKey,
    component: Component<P>,
    _state: PhantomData<fn() -> S>,
}

impl<P: 'static, S: 'static> SideEffect<P, S> {
    pub(crate) fn new(key: ContextKey, component: Component<P>) -> Self {
        Self {
            key,
            component,
            _state: PhantomData,
        }
    }

    /// `SideEffect(<wrapped name>)`.
    pub fn display_name(&self) -> String {
        format!("SideEffect({})", self.component.name())
    }

    /// The wrapped component.
    pub fn component(&self) -> &Component<P> {
        &self.component
    }

    /// Mount under the nearest provider in `scope`.
    ///
    /// # Errors
    /// * [`MountError::NoProvider`] - no provider of this binding is in scope
    /// * [`MountError::Registry`] - the registry rejected the new member
    pub fn mount(
        &self,
        scope: &Scope,
        props: impl Into<Rc<P>>,
    ) -> Result<MountedSideEffect<P, S>, MountError> {
        let registry = self.find_registry(scope)?;
        let member = Member::join(&registry, props)?;
        debug!(component = %self.display_name(), member = %member.id(), "side effect mounted");

        let props = member.data();
        let cleanup = self.component.render(&props);
        Ok(MountedSideEffect {
            key: self.key,
            display_name: self.display_name(),
            component: self.component.clone(),
            props,
            member: Some(member),
            cleanup: Some(cleanup),
        })
    }

    fn find_registry(&self, scope: &Scope) -> Result<Rc<Registry<P, S>>, MountError> {
        scope
            .lookup::<Registry<P, S>>(self.key)
            .ok_or_else(|| MountError::NoProvider {
                component: self.display_name(),
            })
    }
}

impl<P, S> Clone for SideEffect<P, S> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            component: self.component.clone(),
            _state: PhantomData,
        }
    }
}

impl<P, S> fmt::Debug for SideEffect<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffect")
            .field("key", &self.key)
            .field("component", &self.component)
            .finish()
    }
}

// =============================================================================
// Mounted SideEffect
// =============================================================================

/// One mounted copy of a [`SideEffect`].
pub struct MountedSideEffect<P, S> {
    key: ContextKey,
    display_name: String,
    component: Component<P>,
    props: Rc<P>,
    member: Option<Member<P, S>>,
    cleanup: Option<Cleanup>,
}

impl<P: 'static, S: 'static> MountedSideEffect<P, S> {
    /// The member id within the current registry.
    pub fn id(&self) -> Option<MemberId> {
        self.member.as_ref().map(Member::id)
    }

    /// The data currently rendered.
    pub fn props(&self) -> Rc<P> {
        self.props.clone()
    }

    /// False after a failed re-parenting, until a `reparent` succeeds.
    pub fn is_registered(&self) -> bool {
        self.member.is_some()
    }

    /// The registry this mount is registered with.
    pub fn registry(&self) -> Option<&Rc<Registry<P, S>>> {
        self.member.as_ref().map(Member::registry)
    }

    /// Forward new data: update the member in place, then re-render.
    ///
    /// # Errors
    /// * [`MountError::Detached`] - a failed re-parenting left the mount
    ///   unregistered; nothing changes
    /// * [`MountError::Registry`] - the member is no longer registered
    pub fn update(&mut self, props: impl Into<Rc<P>>) -> Result<(), MountError> {
        let Some(member) = self.member.as_mut() else {
            return Err(MountError::Detached {
                component: self.display_name.clone(),
            });
        };
        member.update_data(props)?;
        self.props = member.data();
        let props = self.props.clone();
        self.rerender(&props);
        Ok(())
    }

    /// Move to the nearest provider in `scope`.
    ///
    /// A no-op when that provider owns the current registry. Otherwise the
    /// member leaves its registry before joining the new one, so it is never
    /// registered twice. A mount left unregistered by an earlier failure
    /// joins the new registry.
    ///
    /// # Errors
    /// * [`MountError::NoProvider`] - no provider of this binding is in
    ///   `scope`; the mount stays where it was
    /// * [`MountError::Registry`] - the new registry rejected the member;
    ///   the mount is left unregistered
    pub fn reparent(&mut self, scope: &Scope) -> Result<(), MountError> {
        let registry = scope
            .lookup::<Registry<P, S>>(self.key)
            .ok_or_else(|| MountError::NoProvider {
                component: self.display_name.clone(),
            })?;
        if let Some(current) = self.member.take() {
            if Rc::ptr_eq(current.registry(), &registry) {
                self.member = Some(current);
                return Ok(());
            }
            current.leave();
        }

        let member = Member::join(&registry, self.props.clone())?;
        debug!(component = %self.display_name, member = %member.id(), "side effect reparented");
        self.member = Some(member);
        let props = self.props.clone();
        self.rerender(&props);
        Ok(())
    }

    /// Leave the registry, then clean up the wrapped component.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn rerender(&mut self, data: &P) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
        self.cleanup = Some(self.component.render(data));
    }
}

impl<P, S> MountedSideEffect<P, S> {
    fn teardown(&mut self) {
        if let Some(member) = self.member.take() {
            member.leave();
        }
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<P, S> Drop for MountedSideEffect<P, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<P, S> fmt::Debug for MountedSideEffect<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountedSideEffect")
            .field("display_name", &self.display_name)
            .field("member", &self.member)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
