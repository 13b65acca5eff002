// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit observer registry.
//!
//! Replaces ad hoc `onmessage`-style callbacks: components hold an
//! [`Observers`] list, invoke it synchronously when something happens, and
//! consumers cancel by unregistering rather than waiting for the owner to be
//! dropped.

use std::sync::Mutex;

/// Handle returned by [`Observers::register`]; pass to
/// [`Observers::unregister`] to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// A set of registered listeners invoked synchronously on each emit.
pub struct Observers<T> {
    inner: Mutex<Registry<T>>,
}

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Box<dyn Fn(&T) + Send + Sync>)>,
}

impl<T> Observers<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Observers {
            inner: Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            }),
        }
    }

    /// Register a listener; returns a handle for cancellation.
    pub fn register<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));
        SubscriptionId(id)
    }

    /// Remove a listener. Removing an already-removed listener is a no-op.
    pub fn unregister(&self, id: SubscriptionId) {
        let mut registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        registry.listeners.retain(|(lid, _)| *lid != id.0);
    }

    /// Invoke every registered listener with the value, in registration order.
    pub fn emit(&self, value: &T) {
        let registry = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        for (_, listener) in &registry.listeners {
            listener(value);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .listeners
            .len()
    }

    /// Check if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Observers::new()
    }
}
