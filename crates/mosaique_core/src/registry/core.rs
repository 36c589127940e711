//! Registry core: the dual index and single-entry operations.
//!
//! # Responsibility
//! - Keep the key→module and module→keys indices mutually consistent.
//! - Fire lifecycle listeners exactly once per effective binding change,
//!   synchronously, before the mutating call returns.
//! - Dispatch structured input to the module of the first bound key.
//!
//! # Invariants
//! - `forward[k] == m` iff `k ∈ reverse[m]`; checked and updated inside one
//!   write critical section.
//! - The reverse index never holds an empty key set.
//! - Listeners run after the write guard is released; a listener calling
//!   back into the registry cannot deadlock.

use crate::module::handle::ModuleHandle;
use crate::module::KeyModule;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Dispatch errors of [`Mosaique::parse`].
///
/// Binding conflicts and missing bindings are ordinary return values on the
/// mutation surface; only dispatch has enum-typed failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input value is not a JSON object.
    NotAnObject,
    /// No key of the input object is bound in the registry.
    NoRegisteredKey,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "input is not a JSON object"),
            Self::NoRegisteredKey => {
                write!(f, "no key of the input object is bound in the registry")
            }
        }
    }
}

impl Error for ParseError {}

struct RegistryState<R: 'static> {
    forward: BTreeMap<String, ModuleHandle<R>>,
    reverse: BTreeMap<ModuleHandle<R>, BTreeSet<String>>,
}

impl<R: 'static> RegistryState<R> {
    /// Removes `key` from the module's reverse entry, dropping the entry
    /// once its key set runs empty.
    fn detach(&mut self, module: &ModuleHandle<R>, key: &str) {
        if let Some(keys) = self.reverse.get_mut(module) {
            keys.remove(key);
            if keys.is_empty() {
                self.reverse.remove(module);
            }
        }
    }

    fn attach(&mut self, key: &str, module: &ModuleHandle<R>) {
        self.forward.insert(key.to_string(), module.clone());
        self.reverse
            .entry(module.clone())
            .or_default()
            .insert(key.to_string());
    }
}

impl<R: 'static> Default for RegistryState<R> {
    fn default() -> Self {
        Self {
            forward: BTreeMap::new(),
            reverse: BTreeMap::new(),
        }
    }
}

/// Bidirectional key/module registry.
///
/// Keys are unique; a module may sit under several keys. The registry is a
/// passive, thread-safe shared object: all operations are synchronous,
/// bounded, and safe to call from concurrent threads.
pub struct Mosaique<R: 'static> {
    state: RwLock<RegistryState<R>>,
}

impl<R: 'static> Mosaique<R> {
    pub fn new() -> Self {
        Self::default()
    }

    // Lock poisoning cannot expose a half-updated dual index: write sections
    // decide first, then apply both index updates back to back, so a
    // recovered guard always sees either state.
    fn read_state(&self) -> RwLockReadGuard<'_, RegistryState<R>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RegistryState<R>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the module bound to `key`, if any. Pure read.
    pub fn get_module_for_key(&self, key: &str) -> Option<ModuleHandle<R>> {
        self.read_state().forward.get(key).cloned()
    }

    /// Returns the keys `module` is bound under.
    ///
    /// `None` if, and only if, the module is not bound under any key; the
    /// returned set is never empty.
    pub fn get_keys_for_module(&self, module: &ModuleHandle<R>) -> Option<BTreeSet<String>> {
        self.read_state().reverse.get(module).cloned()
    }

    /// Binds `module` under `key` if the key is currently unbound.
    ///
    /// Returns `false` and leaves the registry untouched when the key is
    /// already bound, including to the same module. On success, every
    /// register-listener of the module has run before this returns.
    pub fn register_module_for_key(&self, key: &str, module: ModuleHandle<R>) -> bool {
        {
            let mut state = self.write_state();
            if state.forward.contains_key(key) {
                debug!("event=key_register_conflict module=registry status=noop key={key}");
                return false;
            }
            state.attach(key, &module);
        }
        debug!(
            "event=key_registered module=registry status=ok key={key} handle={:#x}",
            module.instance_id()
        );
        module.fire_register(key, self);
        true
    }

    /// Removes the binding of `key` and returns the evicted module.
    ///
    /// `None` and no effect when the key is unbound. On an effective
    /// removal, every unregister-listener of the module has run before this
    /// returns.
    pub fn unregister_key(&self, key: &str) -> Option<ModuleHandle<R>> {
        let module = {
            let mut state = self.write_state();
            let module = state.forward.remove(key)?;
            state.detach(&module, key);
            module
        };
        debug!(
            "event=key_unregistered module=registry status=ok key={key} handle={:#x}",
            module.instance_id()
        );
        module.fire_unregister(key, self);
        Some(module)
    }

    /// Removes every binding of `module` in one logical step.
    ///
    /// Returns the full set of removed keys, or `None` (no effect, no
    /// listener firing) when the module is unbound. Unregister-listeners
    /// fire once per removed key.
    pub fn unregister_module(&self, module: &ModuleHandle<R>) -> Option<BTreeSet<String>> {
        let keys = {
            let mut state = self.write_state();
            let keys = state.reverse.remove(module)?;
            for key in &keys {
                state.forward.remove(key);
            }
            keys
        };
        debug!(
            "event=module_unregistered module=registry status=ok handle={:#x} removed_keys={}",
            module.instance_id(),
            keys.len()
        );
        for key in &keys {
            module.fire_unregister(key, self);
        }
        Some(keys)
    }

    /// Evicts any current holder of `key`, then binds `module` under it.
    ///
    /// Eviction and insertion happen in one write critical section; the
    /// binding can therefore never be observed vacant in between. Listener
    /// order is the evicted module's unregister-listeners first, then the
    /// new module's register-listeners. A vacant key proceeds straight to
    /// registration.
    pub fn force_register(&self, key: &str, module: ModuleHandle<R>) -> bool {
        let evicted = {
            let mut state = self.write_state();
            let evicted = state.forward.remove(key);
            if let Some(prev) = &evicted {
                state.detach(prev, key);
            }
            state.attach(key, &module);
            evicted
        };
        debug!(
            "event=key_force_registered module=registry status=ok key={key} handle={:#x} replaced={}",
            module.instance_id(),
            evicted.is_some()
        );
        if let Some(prev) = &evicted {
            prev.fire_unregister(key, self);
        }
        module.fire_register(key, self);
        true
    }

    /// Dispatches `input` to the module of the first bound key.
    ///
    /// Only objects are dispatchable; the object's entries are scanned in
    /// iteration order and the first key bound in the forward index wins.
    /// The module receives the value stored under that key and its output is
    /// returned unchanged.
    pub fn parse(&self, input: &Value) -> Result<R, ParseError> {
        let Some(object) = input.as_object() else {
            return Err(ParseError::NotAnObject);
        };
        let dispatch = {
            let state = self.read_state();
            object
                .iter()
                .find_map(|(key, value)| state.forward.get(key).map(|m| (m.clone(), value)))
        };
        match dispatch {
            Some((module, value)) => Ok(module.parse(value)),
            None => {
                debug!(
                    "event=parse_dispatch module=registry status=error reason=no_registered_key"
                );
                Err(ParseError::NoRegisteredKey)
            }
        }
    }

    /// Number of currently bound keys.
    pub fn len(&self) -> usize {
        self.read_state().forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().forward.is_empty()
    }

    /// Whether `key` is currently bound.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read_state().forward.contains_key(key)
    }

    /// Returns sorted bound keys.
    pub fn registered_keys(&self) -> Vec<String> {
        self.read_state().forward.keys().cloned().collect()
    }
}

impl<R: 'static> Default for Mosaique<R> {
    fn default() -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
        }
    }
}
