/// Listener and shortcut registrations of a controller.
use crate::input::{Action, KeyEvent, Shortcut};

/// Event kinds a controller can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listener {
    KeyDown,
    KeyPress,
    Paste,
    Cut,
    CaretMove,
}

/// The set of active registrations. Empty means unbound.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    listeners: Vec<Listener>,
    shortcuts: Vec<(Shortcut, Action)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a listener. Registering twice is a no-op.
    pub fn bind_listener(&mut self, listener: Listener) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    /// Registers a shortcut. Registering the same pair twice is a no-op.
    pub fn bind_shortcut(&mut self, shortcut: Shortcut, action: Action) {
        if !self.shortcuts.contains(&(shortcut, action)) {
            self.shortcuts.push((shortcut, action));
        }
    }

    /// Drops every listener and shortcut.
    pub fn unbind_all(&mut self) {
        self.listeners.clear();
        self.shortcuts.clear();
    }

    pub fn is_listening(&self, listener: Listener) -> bool {
        self.listeners.contains(&listener)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty() && self.shortcuts.is_empty()
    }

    /// Actions whose shortcut matches `event`, in registration order.
    pub fn actions_for(&self, event: &KeyEvent) -> Vec<Action> {
        self.shortcuts
            .iter()
            .filter(|(shortcut, _)| shortcut.matches(event))
            .map(|(_, action)| *action)
            .collect()
    }
}
