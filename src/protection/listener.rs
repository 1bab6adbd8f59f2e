//! Observers of protection transitions.

use super::tracker::Notification;
use std::sync::Arc;

/// Callbacks telling an observer that a protected camera turned on or off.
///
/// Invoked synchronously on the controller's worker thread, so
/// implementations must not block.
pub trait ProtectionListener<R>: Send + Sync {
    /// Protection should be drawn over `region`.
    fn on_apply_protection(&self, region: &R);

    /// Protection should be removed.
    fn on_hide_protection(&self);
}

/// Registered listeners, notified in registration order.
///
/// Identity is pointer identity of the `Arc`, so the same listener may be
/// registered twice and is then notified twice.
pub struct ListenerSet<R> {
    listeners: Vec<Arc<dyn ProtectionListener<R>>>,
}

impl<R> ListenerSet<R> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add(&mut self, listener: Arc<dyn ProtectionListener<R>>) {
        self.listeners.push(listener);
    }

    /// Removes the first registration of `listener`. Returns `false` if it
    /// was not registered.
    pub fn remove(&mut self, listener: &Arc<dyn ProtectionListener<R>>) -> bool {
        match self
            .listeners
            .iter()
            .position(|registered| Arc::ptr_eq(registered, listener))
        {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Delivers a notification to every listener.
    pub fn notify(&self, notification: &Notification<R>) {
        for listener in &self.listeners {
            match notification {
                Notification::Activated(region) => listener.on_apply_protection(region),
                Notification::Deactivated => listener.on_hide_protection(),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<R> Default for ListenerSet<R> {
    fn default() -> Self {
        Self::new()
    }
}
