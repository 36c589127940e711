//! Key module contracts.
//!
//! # Responsibility
//! - Define the handler contract a registry dispatches to (`KeyModule`).
//! - Keep lifecycle listener storage owned by the module, not the registry.
//!
//! # Invariants
//! - `fire_register`/`fire_unregister` invoke every currently attached
//!   listener exactly once, in attachment order.
//! - Modules never mutate registry state from inside the contract itself;
//!   listeners may, since they run outside the registry's critical section.

use crate::module::listeners::{LifecycleListener, LifecycleListeners};
use crate::registry::core::Mosaique;
use serde_json::Value;

pub mod fn_module;
pub mod handle;
pub mod listeners;

/// Handler bound to one or more keys of a [`Mosaique`].
///
/// A key module converts the JSON value found under its key into the
/// registry's result type `R` and exposes lifecycle hooks the registry fires
/// on every effective binding change.
///
/// Implementors embed a [`LifecycleListeners`] value and hand it out through
/// [`KeyModule::lifecycle`]; the firing and attachment entry points are
/// provided on top of that accessor.
pub trait KeyModule<R: 'static>: Send + Sync {
    /// Converts the value found under a bound key into the result type.
    ///
    /// The registry never validates the value's grammar; that is entirely
    /// this module's concern.
    fn parse(&self, input: &Value) -> R;

    /// Returns the listener storage owned by this module.
    fn lifecycle(&self) -> &LifecycleListeners<R>;

    /// Called by the registry after this module was bound under `key`.
    fn fire_register(&self, key: &str, mosaique: &Mosaique<R>) {
        self.lifecycle().fire_register(key, mosaique);
    }

    /// Called by the registry after this module was unbound from `key`.
    fn fire_unregister(&self, key: &str, mosaique: &Mosaique<R>) {
        self.lifecycle().fire_unregister(key, mosaique);
    }

    /// Attaches a listener invoked on every [`KeyModule::fire_register`].
    fn on_register(&self, listener: LifecycleListener<R>) {
        self.lifecycle().add_register(listener);
    }

    /// Attaches a listener invoked on every [`KeyModule::fire_unregister`].
    fn on_unregister(&self, listener: LifecycleListener<R>) {
        self.lifecycle().add_unregister(listener);
    }
}
