//! List-argument adapters over the bulk layer.
//!
//! Plain argument lists are de-duplicated, then handed to the set-based bulk
//! operation, so the underlying single-entry operation runs exactly once per
//! distinct element. An empty list yields an empty result and performs no
//! mutation and no listener firing.

use crate::module::handle::ModuleHandle;
use crate::registry::core::Mosaique;
use std::collections::{BTreeMap, BTreeSet};

impl<R: 'static> Mosaique<R> {
    /// List adapter for [`Mosaique::get_modules_for_keys`].
    pub fn get_modules_for_keys_list(
        &self,
        keys: &[&str],
    ) -> BTreeMap<String, Option<ModuleHandle<R>>> {
        self.get_modules_for_keys(&distinct_keys(keys))
    }

    /// List adapter for [`Mosaique::get_keys_for_modules`].
    pub fn get_keys_for_modules_list(
        &self,
        modules: &[ModuleHandle<R>],
    ) -> BTreeMap<ModuleHandle<R>, Option<BTreeSet<String>>> {
        self.get_keys_for_modules(&distinct_modules(modules))
    }

    /// List adapter for [`Mosaique::register_modules_for_keys`].
    ///
    /// The first pair for a key wins; later duplicates are dropped before
    /// delegation.
    pub fn register_modules_for_keys_list(
        &self,
        bindings: &[(&str, ModuleHandle<R>)],
    ) -> BTreeMap<String, bool> {
        self.register_modules_for_keys(distinct_bindings(bindings))
    }

    /// List adapter for [`Mosaique::unregister_keys`].
    pub fn unregister_keys_list(&self, keys: &[&str]) -> BTreeMap<String, ModuleHandle<R>> {
        self.unregister_keys(&distinct_keys(keys))
    }

    /// List adapter for [`Mosaique::unregister_modules`].
    pub fn unregister_modules_list(
        &self,
        modules: &[ModuleHandle<R>],
    ) -> Option<BTreeMap<ModuleHandle<R>, BTreeSet<String>>> {
        self.unregister_modules(&distinct_modules(modules))
    }

    /// List adapter for [`Mosaique::force_registers`].
    ///
    /// The first pair for a key wins; later duplicates are dropped before
    /// delegation.
    pub fn force_registers_list(
        &self,
        bindings: &[(&str, ModuleHandle<R>)],
    ) -> BTreeMap<String, bool> {
        self.force_registers(distinct_bindings(bindings))
    }
}

fn distinct_keys(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|key| (*key).to_string()).collect()
}

fn distinct_modules<R: 'static>(modules: &[ModuleHandle<R>]) -> BTreeSet<ModuleHandle<R>> {
    modules.iter().cloned().collect()
}

fn distinct_bindings<R: 'static>(
    pairs: &[(&str, ModuleHandle<R>)],
) -> BTreeMap<String, ModuleHandle<R>> {
    let mut bindings = BTreeMap::new();
    for (key, module) in pairs {
        bindings
            .entry((*key).to_string())
            .or_insert_with(|| module.clone());
    }
    bindings
}
