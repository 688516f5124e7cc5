//! Scoped context - How members find their registry.
//!
//! A [`Scope`] is an immutable chain of frames, each binding one
//! [`ContextKey`] to a value. Providers extend the scope they are rendered
//! in; content rendered beneath reads the nearest frame for its key. Scopes
//! are passed explicitly, so independent trees never see each other's
//! registries, and an inner provider shadows an outer one with the same key.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// Context Key
// =============================================================================

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Identity of one context, created once per wrapped component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextKey(u64);

impl ContextKey {
    /// Allocate a key distinct from every other key in the process.
    pub fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Scope
// =============================================================================

struct Frame {
    key: ContextKey,
    value: Rc<dyn Any>,
    parent: Option<Rc<Frame>>,
}

/// Chain of provided context values.
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Rc<Frame>>,
}

impl Scope {
    /// An empty scope with nothing provided.
    pub fn root() -> Self {
        Self::default()
    }

    /// A child scope that additionally provides `value` under `key`.
    pub fn provide<T: 'static>(&self, key: ContextKey, value: Rc<T>) -> Scope {
        Scope {
            head: Some(Rc::new(Frame {
                key,
                value,
                parent: self.head.clone(),
            })),
        }
    }

    /// Nearest value provided under `key`.
    ///
    /// Returns None if nothing was provided, or if the nearest value is not
    /// a `T`.
    pub fn lookup<T: 'static>(&self, key: ContextKey) -> Option<Rc<T>> {
        let mut frame = self.head.as_ref();
        while let Some(current) = frame {
            if current.key == key {
                return current.value.clone().downcast::<T>().ok();
            }
            frame = current.parent.as_ref();
        }
        None
    }

    /// Number of frames in the chain.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut frame = self.head.as_ref();
        while let Some(current) = frame {
            depth += 1;
            frame = current.parent.as_ref();
        }
        depth
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").field("depth", &self.depth()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let root = Scope::root();
        assert_eq!(root.depth(), 0);
        assert!(root.lookup::<u32>(ContextKey::next()).is_none());
    }

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(ContextKey::next(), ContextKey::next());
    }

    #[test]
    fn test_provide_and_lookup() {
        let key = ContextKey::next();
        let scope = Scope::root().provide(key, Rc::new(42u32));

        assert_eq!(scope.lookup::<u32>(key).as_deref(), Some(&42));
        assert_eq!(scope.depth(), 1);
    }

    #[test]
    fn test_inner_frame_shadows_outer() {
        let key = ContextKey::next();
        let outer = Scope::root().provide(key, Rc::new(1u32));
        let inner = outer.provide(key, Rc::new(2u32));

        assert_eq!(inner.lookup::<u32>(key).as_deref(), Some(&2));
        assert_eq!(outer.lookup::<u32>(key).as_deref(), Some(&1));
    }

    #[test]
    fn test_lookup_skips_other_keys() {
        let a = ContextKey::next();
        let b = ContextKey::next();
        let scope = Scope::root()
            .provide(a, Rc::new("a"))
            .provide(b, Rc::new("b"));

        assert_eq!(scope.lookup::<&str>(a).as_deref(), Some(&"a"));
        assert_eq!(scope.lookup::<&str>(b).as_deref(), Some(&"b"));
    }

    #[test]
    fn test_lookup_wrong_type_is_none() {
        let key = ContextKey::next();
        let scope = Scope::root().provide(key, Rc::new(1u32));
        assert!(scope.lookup::<String>(key).is_none());
    }

    #[test]
    fn test_sibling_scopes_are_independent() {
        let key = ContextKey::next();
        let root = Scope::root();
        let left = root.provide(key, Rc::new(1u32));
        let right = root.provide(key, Rc::new(2u32));

        assert_eq!(left.lookup::<u32>(key).as_deref(), Some(&1));
        assert_eq!(right.lookup::<u32>(key).as_deref(), Some(&2));
        assert!(root.lookup::<u32>(key).is_none());
    }
}
