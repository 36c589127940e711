//! Closure-backed key module.

use crate::module::handle::ModuleHandle;
use crate::module::listeners::LifecycleListeners;
use crate::module::KeyModule;
use serde_json::Value;

/// [`KeyModule`] built from a parse closure.
///
/// Covers the common case of a handler with no state of its own; bespoke
/// module types only become necessary when parsing needs configuration or
/// shared resources.
pub struct FnModule<R: 'static> {
    parse_fn: Box<dyn Fn(&Value) -> R + Send + Sync>,
    lifecycle: LifecycleListeners<R>,
}

impl<R: 'static> FnModule<R> {
    /// Creates a module that delegates [`KeyModule::parse`] to `parse_fn`.
    pub fn new(parse_fn: impl Fn(&Value) -> R + Send + Sync + 'static) -> Self {
        Self {
            parse_fn: Box::new(parse_fn),
            lifecycle: LifecycleListeners::new(),
        }
    }

    /// Creates a module and wraps it into a registrable handle.
    pub fn handle(parse_fn: impl Fn(&Value) -> R + Send + Sync + 'static) -> ModuleHandle<R> {
        ModuleHandle::new(Self::new(parse_fn))
    }
}

impl<R: 'static> KeyModule<R> for FnModule<R> {
    fn parse(&self, input: &Value) -> R {
        (self.parse_fn)(input)
    }

    fn lifecycle(&self) -> &LifecycleListeners<R> {
        &self.lifecycle
    }
}
