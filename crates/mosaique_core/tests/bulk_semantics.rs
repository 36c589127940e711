use mosaique_core::{FnModule, ModuleHandle, Mosaique};
use std::collections::{BTreeMap, BTreeSet};

fn constant_module(value: i64) -> ModuleHandle<i64> {
    FnModule::handle(move |_input| value)
}

fn key_set(keys: &[&str]) -> BTreeSet<String> {
    keys.iter().map(|key| (*key).to_string()).collect()
}

#[test]
fn unregister_keys_reports_only_the_effective_subset() {
    let mosaique = Mosaique::new();
    assert!(mosaique.register_module_for_key("a", constant_module(1)));
    assert!(mosaique.register_module_for_key("c", constant_module(2)));

    let removed = mosaique.unregister_keys(&key_set(&["a", "b", "c"]));
    let removed_keys: Vec<_> = removed.keys().cloned().collect();
    assert_eq!(removed_keys, ["a", "c"], "unbound `b` must be dropped");
    assert!(mosaique.is_empty());
}

#[test]
fn get_modules_for_keys_reports_every_requested_key() {
    let mosaique = Mosaique::new();
    assert!(mosaique.register_module_for_key("a", constant_module(1)));

    let looked_up = mosaique.get_modules_for_keys(&key_set(&["a", "b", "c"]));
    assert_eq!(looked_up.len(), 3, "lookups keep unbound keys in the result");
    assert!(looked_up["a"].is_some());
    assert!(looked_up["b"].is_none());
    assert!(looked_up["c"].is_none());
}

#[test]
fn get_keys_for_modules_reports_every_requested_module() {
    let mosaique = Mosaique::new();
    let bound = constant_module(1);
    let unbound = constant_module(2);
    assert!(mosaique.register_module_for_key("a", bound.clone()));
    assert!(mosaique.register_module_for_key("b", bound.clone()));

    let modules: BTreeSet<_> = [bound.clone(), unbound.clone()].into();
    let looked_up = mosaique.get_keys_for_modules(&modules);
    assert_eq!(looked_up.len(), 2);
    let bound_keys = looked_up[&bound].as_ref().expect("bound module has keys");
    assert_eq!(bound_keys.len(), 2);
    assert!(looked_up[&unbound].is_none());
}

#[test]
fn unregister_modules_is_restricted_to_effective_removals() {
    let mosaique = Mosaique::new();
    let bound = constant_module(1);
    let unbound = constant_module(2);
    assert!(mosaique.register_module_for_key("a", bound.clone()));
    assert!(mosaique.register_module_for_key("b", bound.clone()));

    let modules: BTreeSet<_> = [bound.clone(), unbound.clone()].into();
    let removed = mosaique
        .unregister_modules(&modules)
        .expect("at least one module was bound");
    assert_eq!(removed.len(), 1, "unbound module must not appear");
    assert_eq!(removed[&bound], key_set(&["a", "b"]));
    assert!(mosaique.unregister_modules(&modules).is_none());
}

#[test]
fn register_batch_reports_per_key_outcomes_independently() {
    let mosaique = Mosaique::new();
    assert!(mosaique.register_module_for_key("taken", constant_module(1)));

    let mut bindings = BTreeMap::new();
    bindings.insert("taken".to_string(), constant_module(2));
    bindings.insert("free_one".to_string(), constant_module(3));
    bindings.insert("free_two".to_string(), constant_module(4));

    let outcome = mosaique.register_modules_for_keys(bindings);
    assert!(!outcome["taken"]);
    assert!(outcome["free_one"]);
    assert!(outcome["free_two"]);
    assert_eq!(mosaique.len(), 3);
}

#[test]
fn force_register_batch_evicts_and_binds_per_key() {
    let mosaique = Mosaique::new();
    let original = constant_module(1);
    assert!(mosaique.register_module_for_key("held", original.clone()));

    let replacement = constant_module(2);
    let mut bindings = BTreeMap::new();
    bindings.insert("held".to_string(), replacement.clone());
    bindings.insert("vacant".to_string(), constant_module(3));

    let outcome = mosaique.force_registers(bindings);
    assert!(outcome.values().all(|registered| *registered));
    assert!(mosaique
        .get_module_for_key("held")
        .expect("held stays bound")
        .same_instance(&replacement));
    assert!(mosaique.get_keys_for_module(&original).is_none());
}

#[test]
fn list_adapters_deduplicate_before_delegating() {
    let mosaique = Mosaique::new();
    assert!(mosaique.register_module_for_key("a", constant_module(1)));
    assert!(mosaique.register_module_for_key("c", constant_module(2)));

    // Duplicated and unbound arguments: one lookup per distinct key, subset
    // rule intact.
    let removed = mosaique.unregister_keys_list(&["a", "b", "a", "c", "b"]);
    let removed_keys: Vec<_> = removed.keys().cloned().collect();
    assert_eq!(removed_keys, ["a", "c"]);
    assert!(mosaique.is_empty());
}
