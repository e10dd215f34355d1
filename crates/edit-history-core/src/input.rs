//! Host input events and keyboard shortcuts.
//!
//! The host translates its native key and clipboard events into
//! [`EditorEvent`]s and hands them to the controller.

/// A key identity, independent of the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

impl Key {
    /// Keys that remove content without raising a key-press on every platform.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Key::Backspace | Key::Delete)
    }

    /// Case-insensitive key comparison, so Shift+Z still matches `z`.
    fn same_key(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::Character(a), Key::Character(b)) => a.eq_ignore_ascii_case(b),
            _ => self == other,
        }
    }
}

/// Modifier keys held during a key event.
///
/// `command` is the platform's primary shortcut modifier (Cmd on macOS,
/// Ctrl elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        command: false,
        shift: false,
        alt: false,
    };

    pub const COMMAND: Self = Self {
        command: true,
        shift: false,
        alt: false,
    };

    pub const COMMAND_SHIFT: Self = Self {
        command: true,
        shift: true,
        alt: false,
    };

    /// Whether every modifier required by `self` is held in `held`.
    fn satisfied_by(&self, held: &Modifiers) -> bool {
        (!self.command || held.command) && (!self.shift || held.shift) && (!self.alt || held.alt)
    }
}

/// A key event. Handlers may suppress the host's default handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            default_prevented: false,
        }
    }

    /// An unmodified key.
    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// An unmodified character key.
    pub fn character(c: char) -> Self {
        Self::plain(Key::Character(c))
    }

    /// Asks the host to skip its native handling of this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Events the controller can listen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    KeyDown(KeyEvent),
    KeyPress(KeyEvent),
    Paste,
    Cut,
    /// The caret moved without an edit (click, arrow navigation).
    CaretMoved,
}

/// What a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Undo,
    Redo,
}

/// A key chord.
///
/// A chord matches when the key is equal and every required modifier is
/// held; extra modifiers don't prevent a match. Command+Z therefore also
/// fires for Command+Shift+Z, which the undo handler ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl Shortcut {
    pub const UNDO: Self = Self {
        key: Key::Character('z'),
        modifiers: Modifiers::COMMAND,
    };

    pub const REDO: Self = Self {
        key: Key::Character('z'),
        modifiers: Modifiers::COMMAND_SHIFT,
    };

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.same_key(&event.key) && self.modifiers.satisfied_by(&event.modifiers)
    }
}
