//! Snapshot-based undo/redo for editable text regions.
//!
//! [`EditHistory`] binds to an element through the [`Editable`] and
//! [`SelectionAccessor`] seams, coalesces bursts of typing into single undo
//! steps and restores content and selection on undo/redo.

pub mod bindings;
pub mod controller;
pub mod events;
pub mod input;
pub mod surface;
pub mod timer;

pub use bindings::{Bindings, Listener};
pub use controller::EditHistory;
pub use events::{HistoryEvent, Notifier, SubscriptionId};
pub use input::{Action, EditorEvent, Key, KeyEvent, Modifiers, Shortcut};
pub use surface::{Editable, MemoryElement, MemorySelection, SelectionAccessor, SelectionRange};
pub use timer::{Clock, IdleTimer, ManualClock, SystemClock};

pub use edit_history_mod_history::{HistoryConfig, HistoryStack, Snapshot};
