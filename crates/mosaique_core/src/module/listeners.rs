//! Lifecycle listener storage and firing order.
//!
//! # Responsibility
//! - Hold the ordered register-/unregister-listener lists of one module.
//! - Fire every attached listener exactly once per event, in attachment
//!   order.
//!
//! # Invariants
//! - Duplicate attachments of the same listener are invoked independently;
//!   no de-duplication happens here.
//! - A panicking listener does not rob later listeners of their
//!   notification: the first panic payload is re-raised only after the whole
//!   list ran.

use crate::registry::core::Mosaique;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

/// Callback invoked with the affected key and the registry that changed.
pub type LifecycleListener<R> = Arc<dyn Fn(&str, &Mosaique<R>) + Send + Sync>;

/// Ordered listener lists owned by one module.
///
/// Attachment takes `&self` so modules can stay behind shared handles; the
/// lists sit behind their own mutex, independent of any registry lock.
pub struct LifecycleListeners<R: 'static> {
    register: Mutex<Vec<LifecycleListener<R>>>,
    unregister: Mutex<Vec<LifecycleListener<R>>>,
}

impl<R: 'static> LifecycleListeners<R> {
    pub fn new() -> Self {
        Self {
            register: Mutex::new(Vec::new()),
            unregister: Mutex::new(Vec::new()),
        }
    }

    /// Appends one register-listener; order of attachment is order of firing.
    pub fn add_register(&self, listener: LifecycleListener<R>) {
        self.register
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Appends one unregister-listener.
    pub fn add_unregister(&self, listener: LifecycleListener<R>) {
        self.unregister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Returns the number of currently attached register-listeners.
    pub fn register_count(&self) -> usize {
        self.register
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the number of currently attached unregister-listeners.
    pub fn unregister_count(&self) -> usize {
        self.unregister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Fires every register-listener with `(key, mosaique)`.
    pub fn fire_register(&self, key: &str, mosaique: &Mosaique<R>) {
        let snapshot = self
            .register
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        fire_in_order(&snapshot, key, mosaique);
    }

    /// Fires every unregister-listener with `(key, mosaique)`.
    pub fn fire_unregister(&self, key: &str, mosaique: &Mosaique<R>) {
        let snapshot = self
            .unregister
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        fire_in_order(&snapshot, key, mosaique);
    }
}

impl<R: 'static> Default for LifecycleListeners<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Invokes listeners in attachment order.
///
/// The list is a snapshot: a listener attaching further listeners affects
/// later events, never the one currently firing. Panics are deferred until
/// every listener of this event has run, then the first payload is re-raised.
fn fire_in_order<R: 'static>(
    listeners: &[LifecycleListener<R>],
    key: &str,
    mosaique: &Mosaique<R>,
) {
    let mut first_panic = None;
    for listener in listeners {
        let outcome = catch_unwind(AssertUnwindSafe(|| (**listener)(key, mosaique)));
        if let Err(payload) = outcome {
            if first_panic.is_none() {
                first_panic = Some(payload);
            }
        }
    }
    if let Some(payload) = first_panic {
        resume_unwind(payload);
    }
}

#[cfg(test)]
mod tests {
    use super::{LifecycleListener, LifecycleListeners};
    use crate::registry::core::Mosaique;
    use std::panic::catch_unwind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn counting_listener(
        hits: &Arc<AtomicUsize>,
    ) -> LifecycleListener<i64> {
        let hits = Arc::clone(hits);
        Arc::new(move |_key, _mosaique| {
            hits.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn fires_listeners_in_attachment_order() {
        let listeners = LifecycleListeners::<i64>::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            listeners.add_register(Arc::new(move |_key, _mosaique| {
                order.lock().expect("order lock").push(tag);
            }));
        }

        let mosaique = Mosaique::<i64>::new();
        listeners.fire_register("k", &mosaique);
        assert_eq!(
            order.lock().expect("order lock").as_slice(),
            &["first", "second", "third"]
        );
    }

    #[test]
    fn duplicate_listener_is_invoked_independently() {
        let listeners = LifecycleListeners::<i64>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let listener = counting_listener(&hits);
        listeners.add_unregister(Arc::clone(&listener));
        listeners.add_unregister(listener);

        let mosaique = Mosaique::<i64>::new();
        listeners.fire_unregister("k", &mosaique);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn panicking_listener_does_not_skip_later_listeners() {
        let listeners = LifecycleListeners::<i64>::new();
        let hits = Arc::new(AtomicUsize::new(0));
        listeners.add_register(Arc::new(|_key, _mosaique| panic!("listener fault")));
        listeners.add_register(counting_listener(&hits));

        let mosaique = Mosaique::<i64>::new();
        let outcome = catch_unwind(|| listeners.fire_register("k", &mosaique));
        assert!(outcome.is_err(), "first panic must surface to the caller");
        assert_eq!(
            hits.load(Ordering::SeqCst),
            1,
            "later listener must still have run"
        );
    }

    #[test]
    fn counts_reflect_attachments() {
        let listeners = LifecycleListeners::<i64>::new();
        assert_eq!(listeners.register_count(), 0);
        assert_eq!(listeners.unregister_count(), 0);

        let hits = Arc::new(AtomicUsize::new(0));
        listeners.add_register(counting_listener(&hits));
        listeners.add_register(counting_listener(&hits));
        listeners.add_unregister(counting_listener(&hits));

        assert_eq!(listeners.register_count(), 2);
        assert_eq!(listeners.unregister_count(), 1);
    }
}
