//! Shared, identity-comparable module handles.
//!
//! The registry never owns modules; it holds handles. A handle compares by
//! the identity of the underlying instance, so the same module registered
//! under several keys collapses to one reverse-index entry while two
//! structurally identical modules stay distinct.

use crate::module::KeyModule;
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Cloneable reference to a [`KeyModule`] with per-instance identity.
///
/// Equality, ordering, and hashing all follow the address of the shared
/// instance, which stays stable for as long as any handle to it is alive.
/// This makes handles usable as map keys in reverse-index and bulk results.
pub struct ModuleHandle<R: 'static> {
    inner: Arc<dyn KeyModule<R>>,
}

impl<R: 'static> ModuleHandle<R> {
    /// Wraps a module value into a shared handle.
    pub fn new(module: impl KeyModule<R> + 'static) -> Self {
        Self {
            inner: Arc::new(module),
        }
    }

    /// Adopts an already shared module.
    pub fn from_arc(module: Arc<dyn KeyModule<R>>) -> Self {
        Self { inner: module }
    }

    /// Stable in-process identity of the underlying instance.
    ///
    /// Opaque; only useful for identity comparison and log correlation.
    pub fn instance_id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Whether two handles point at the same module instance.
    pub fn same_instance(&self, other: &Self) -> bool {
        self.instance_id() == other.instance_id()
    }
}

impl<R: 'static> Clone for ModuleHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: 'static> Deref for ModuleHandle<R> {
    type Target = dyn KeyModule<R>;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl<R: 'static> PartialEq for ModuleHandle<R> {
    fn eq(&self, other: &Self) -> bool {
        self.same_instance(other)
    }
}

impl<R: 'static> Eq for ModuleHandle<R> {}

impl<R: 'static> PartialOrd for ModuleHandle<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: 'static> Ord for ModuleHandle<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instance_id().cmp(&other.instance_id())
    }
}

impl<R: 'static> Hash for ModuleHandle<R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.instance_id());
    }
}

impl<R: 'static> Debug for ModuleHandle<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModuleHandle({:#x})", self.instance_id())
    }
}
