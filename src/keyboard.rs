//! Scoped registration of the window-level key listener.

use std::{
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

/// Keys the map reacts to. Everything else is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other(String),
}

impl Key {
    /// Map a DOM-style key name ("Escape", "a", ...) to a [`Key`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" | "Esc" => Key::Escape,
            other => Key::Other(other.to_string()),
        }
    }
}

/// Identifies one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The host's global key event target (e.g. the browser window).
///
/// The host routes key events for a registered listener back through
/// `MapOrchestrator::handle_key`.
pub trait KeyEventTarget {
    fn add_key_listener(&self, id: ListenerId);
    fn remove_key_listener(&self, id: ListenerId);
}

/// Holds one listener registration; removes it exactly once on drop.
pub struct KeyListenerGuard {
    target: Rc<dyn KeyEventTarget>,
    id: ListenerId,
}

impl KeyListenerGuard {
    pub fn register(target: Rc<dyn KeyEventTarget>) -> Self {
        let id = ListenerId::next();
        target.add_key_listener(id);
        debug!(listener = id.0, "registered key listener");
        Self { target, id }
    }

    pub fn id(&self) -> ListenerId { self.id }
}

impl Drop for KeyListenerGuard {
    fn drop(&mut self) {
        self.target.remove_key_listener(self.id);
        debug!(listener = self.id.0, "removed key listener");
    }
}

impl std::fmt::Debug for KeyListenerGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyListenerGuard").field("id", &self.id).finish()
    }
}
