//! Bulk operations: per-element application of the single-entry operations.
//!
//! # Invariants
//! - Each element is processed independently and atomically with respect to
//!   itself; there is no cross-element atomicity and no ordering guarantee
//!   between elements of one batch.
//! - Lookup results cover every requested element; unregistration results
//!   cover only elements that had an effect. That asymmetry is part of the
//!   contract.

use crate::module::handle::ModuleHandle;
use crate::registry::core::Mosaique;
use std::collections::{BTreeMap, BTreeSet};

impl<R: 'static> Mosaique<R> {
    /// Looks up every key of the set.
    ///
    /// The result's key set is exactly the input set; unbound keys map to
    /// `None`.
    pub fn get_modules_for_keys(
        &self,
        keys: &BTreeSet<String>,
    ) -> BTreeMap<String, Option<ModuleHandle<R>>> {
        keys.iter()
            .map(|key| (key.clone(), self.get_module_for_key(key)))
            .collect()
    }

    /// Looks up the bound keys of every module of the set.
    ///
    /// The result's key set is exactly the input set; unbound modules map to
    /// `None`.
    pub fn get_keys_for_modules(
        &self,
        modules: &BTreeSet<ModuleHandle<R>>,
    ) -> BTreeMap<ModuleHandle<R>, Option<BTreeSet<String>>> {
        modules
            .iter()
            .map(|module| (module.clone(), self.get_keys_for_module(module)))
            .collect()
    }

    /// Applies [`Mosaique::register_module_for_key`] per pair.
    ///
    /// One failing pair does not block the others; the result reports the
    /// per-key outcome.
    pub fn register_modules_for_keys(
        &self,
        bindings: BTreeMap<String, ModuleHandle<R>>,
    ) -> BTreeMap<String, bool> {
        bindings
            .into_iter()
            .map(|(key, module)| {
                let registered = self.register_module_for_key(&key, module);
                (key, registered)
            })
            .collect()
    }

    /// Applies [`Mosaique::unregister_key`] per key.
    ///
    /// The result's key set is the subset of input keys that were actually
    /// bound; keys without effect are dropped, not mapped to an empty value.
    pub fn unregister_keys(&self, keys: &BTreeSet<String>) -> BTreeMap<String, ModuleHandle<R>> {
        keys.iter()
            .filter_map(|key| {
                self.unregister_key(key)
                    .map(|module| (key.clone(), module))
            })
            .collect()
    }

    /// Applies [`Mosaique::unregister_module`] per module.
    ///
    /// `None` if, and only if, none of the input modules were bound;
    /// otherwise the result is restricted to modules with effective removals,
    /// each mapped to the full set of keys removed for it.
    pub fn unregister_modules(
        &self,
        modules: &BTreeSet<ModuleHandle<R>>,
    ) -> Option<BTreeMap<ModuleHandle<R>, BTreeSet<String>>> {
        let removed: BTreeMap<_, _> = modules
            .iter()
            .filter_map(|module| {
                self.unregister_module(module)
                    .map(|keys| (module.clone(), keys))
            })
            .collect();
        if removed.is_empty() {
            None
        } else {
            Some(removed)
        }
    }

    /// Applies [`Mosaique::force_register`] per pair.
    pub fn force_registers(
        &self,
        bindings: BTreeMap<String, ModuleHandle<R>>,
    ) -> BTreeMap<String, bool> {
        bindings
            .into_iter()
            .map(|(key, module)| {
                let registered = self.force_register(&key, module);
                (key, registered)
            })
            .collect()
    }
}
