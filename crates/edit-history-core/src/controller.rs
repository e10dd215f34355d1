//! Snapshot-based undo/redo controller for one editable element.
//!
//! The controller watches key and caret events, captures a snapshot of
//! content and selection at the start of each burst of typing, and walks
//! the captured snapshots back and forth on the undo/redo shortcuts.
//!
//! Typing is coalesced: the first key press after an idle period captures
//! the state *before* the edit, later presses within the idle window do not.
//! A non-empty selection always forces a capture because the next key press
//! is about to replace it.

use edit_history_mod_history::{HistoryConfig, HistoryStack, Snapshot};

use crate::bindings::{Bindings, Listener};
use crate::events::{HistoryEvent, Notifier, SubscriptionId};
use crate::input::{Action, EditorEvent, KeyEvent, Shortcut};
use crate::surface::{Editable, SelectionAccessor};
use crate::timer::{Clock, IdleTimer, SystemClock};

/// Undo/redo history bound to one editable element.
pub struct EditHistory<E, S, C = SystemClock> {
    element: E,
    selection: S,
    history: HistoryStack,
    /// Whether a snapshot was captured since the last idle period.
    added_to_history: bool,
    /// Whether an edit happened since the last undo/redo. The next undo
    /// must first capture the in-progress state.
    first_undo: bool,
    idle: IdleTimer,
    bindings: Bindings,
    notifier: Notifier,
    clock: C,
}

impl<E, S, C> std::fmt::Debug for EditHistory<E, S, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditHistory")
            .field("history_len", &self.history.len())
            .field("cursor", &self.history.cursor())
            .field("added_to_history", &self.added_to_history)
            .field("first_undo", &self.first_undo)
            .field("bound", &!self.bindings.is_empty())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl<E: Editable, S: SelectionAccessor<E>> EditHistory<E, S, SystemClock> {
    /// Creates a controller with an empty history and binds it.
    pub fn new(element: E, selection: S, config: &HistoryConfig) -> Self {
        Self::with_history(element, selection, config, Vec::new())
    }

    /// Creates a controller primed with previously saved snapshots,
    /// positioned on the newest one, and binds it.
    pub fn with_history(
        element: E,
        selection: S,
        config: &HistoryConfig,
        snapshots: Vec<Snapshot>,
    ) -> Self {
        let history = HistoryStack::from_snapshots(snapshots, config.max_history_depth);
        Self::with_clock(element, selection, config, history, SystemClock)
    }
}

impl<E: Editable, S: SelectionAccessor<E>, C: Clock> EditHistory<E, S, C> {
    /// Creates a controller over an existing stack and time source, and binds it.
    pub fn with_clock(
        element: E,
        selection: S,
        config: &HistoryConfig,
        history: HistoryStack,
        clock: C,
    ) -> Self {
        let mut this = Self {
            element,
            selection,
            history,
            added_to_history: false,
            first_undo: false,
            idle: IdleTimer::new(config.idle_timeout()),
            bindings: Bindings::new(),
            notifier: Notifier::new(),
            clock,
        };
        this.bind();
        this
    }

    /// Registers the edit, caret and shortcut listeners. Idempotent.
    pub fn bind(&mut self) {
        if !self.bindings.is_empty() {
            return;
        }
        for listener in [
            Listener::KeyDown,
            Listener::KeyPress,
            Listener::Paste,
            Listener::Cut,
            Listener::CaretMove,
        ] {
            self.bindings.bind_listener(listener);
        }
        self.bindings.bind_shortcut(Shortcut::UNDO, Action::Undo);
        self.bindings.bind_shortcut(Shortcut::REDO, Action::Redo);
        tracing::debug!("edit history bound");
    }

    /// Removes every registration, cancels the idle timer and closes the
    /// coalescing window so the next burst after a rebind is captured.
    pub fn unbind(&mut self) {
        self.bindings.unbind_all();
        self.idle.cancel();
        self.prepare_to_add();
        tracing::debug!("edit history unbound");
    }

    pub fn is_bound(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Routes a host event to its handler. Unregistered events are ignored.
    pub fn handle_event(&mut self, event: &mut EditorEvent) {
        match event {
            EditorEvent::KeyDown(key) => {
                if !self.bindings.is_listening(Listener::KeyDown) {
                    return;
                }
                for action in self.bindings.actions_for(key) {
                    match action {
                        Action::Undo => self.undo(Some(&mut *key)),
                        Action::Redo => self.redo(Some(&mut *key)),
                    }
                }
                self.on_key_down(key);
            }
            EditorEvent::KeyPress(key) => {
                if self.bindings.is_listening(Listener::KeyPress) {
                    self.on_key_press(Some(&*key));
                }
            }
            EditorEvent::Paste => {
                if self.bindings.is_listening(Listener::Paste) {
                    self.on_change(&EditorEvent::Paste);
                }
            }
            EditorEvent::Cut => {
                if self.bindings.is_listening(Listener::Cut) {
                    self.on_change(&EditorEvent::Cut);
                }
            }
            EditorEvent::CaretMoved => {
                if self.bindings.is_listening(Listener::CaretMove) {
                    self.prepare_to_add();
                }
            }
        }
    }

    /// Treats Delete and Backspace as key presses; some hosts raise no
    /// key-press for them even though they change content.
    pub fn on_key_down(&mut self, event: &KeyEvent) {
        if event.key.is_destructive() {
            self.on_key_press(None);
        }
    }

    /// Captures when a range is selected or nothing was captured since the
    /// last idle period, then restarts the idle window.
    pub fn on_key_press(&mut self, _event: Option<&KeyEvent>) {
        let now = self.clock.now();
        if self.idle.fire_if_due(now) {
            self.prepare_to_add();
        }

        if !self.selection.is_collapsed(&self.element) || !self.added_to_history {
            self.added_to_history = true;
            self.notifier.emit(&HistoryEvent::AddToHistory);
            self.add(false);
        }
        self.idle.schedule(now);
    }

    /// Paste and cut. Not captured; hosts that want them undoable can call
    /// `add` before applying the clipboard change.
    pub fn on_change(&mut self, _event: &EditorEvent) {}

    /// The element's current content.
    pub fn contents(&self) -> String {
        self.element.contents()
    }

    /// Replaces the element's content.
    pub fn set_contents(&mut self, content: &str) {
        self.element.set_contents(content);
    }

    /// Captures the current content and selection.
    ///
    /// Marks that an edit happened even when the capture turns out to be a
    /// duplicate of the current entry and is discarded. With `stay` the
    /// stack cursor does not move onto the new entry.
    pub fn add(&mut self, stay: bool) {
        self.first_undo = true;

        let content = self.element.contents();
        let snapshot = match self.selection.range(&self.element) {
            Some(range) => Snapshot::with_range(content, range.start, range.end),
            None => Snapshot::with_caret(content, 0),
        };

        if self.history.current() == Some(&snapshot) {
            tracing::trace!("capture matches current entry, skipped");
            return;
        }
        self.history.push(snapshot, stay);
        tracing::debug!(len = self.history.len(), stay, "captured snapshot");
    }

    /// Moves the selection to the snapshot's offsets, if it has any.
    pub fn restore_cursor(&mut self, snapshot: &Snapshot) {
        if let Some(start) = snapshot.start {
            self.selection.select(&mut self.element, start, snapshot.end);
        }
    }

    /// Steps back one entry and restores it.
    ///
    /// The first undo after an edit instead captures the in-progress state
    /// (without moving onto it) and restores the entry it was captured
    /// against, so the edit stays reachable through redo.
    pub fn undo(&mut self, event: Option<&mut KeyEvent>) {
        if let Some(event) = event {
            event.prevent_default();
            if event.modifiers.shift {
                return;
            }
        }

        if self.first_undo {
            self.add(true);
            self.first_undo = false;
        } else {
            self.history.back();
        }

        let Some(snapshot) = self.history.current().cloned() else {
            return;
        };
        self.restore(&snapshot);
        tracing::debug!(cursor = ?self.history.cursor(), "undo");
        self.notifier.emit(&HistoryEvent::Undo(snapshot.clone()));
        self.notifier.emit(&HistoryEvent::Restore(snapshot));
    }

    /// Steps forward one entry and restores it.
    pub fn redo(&mut self, event: Option<&mut KeyEvent>) {
        if let Some(event) = event {
            event.prevent_default();
        }
        self.first_undo = false;
        self.history.forward();

        let Some(snapshot) = self.history.current().cloned() else {
            return;
        };
        self.restore(&snapshot);
        tracing::debug!(cursor = ?self.history.cursor(), "redo");
        self.notifier.emit(&HistoryEvent::Redo(snapshot.clone()));
        self.notifier.emit(&HistoryEvent::Restore(snapshot));
    }

    /// Ends the current coalescing window; the next key press captures.
    pub fn prepare_to_add(&mut self) {
        self.added_to_history = false;
    }

    /// Fires the idle timer if it is due. Hosts call this from their loop.
    pub fn tick(&mut self) {
        if self.idle.fire_if_due(self.clock.now()) {
            self.prepare_to_add();
        }
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        self.element.set_contents(&snapshot.content);
        self.restore_cursor(snapshot);
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&HistoryEvent) + 'static) -> SubscriptionId {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Captured snapshots, oldest first.
    pub fn snapshots(&self) -> &[Snapshot] {
        self.history.snapshots()
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Whether a snapshot was captured in the current idle window.
    pub fn is_capturing(&self) -> bool {
        self.added_to_history
    }

    /// Whether the next undo will capture the in-progress state first.
    pub fn is_first_undo_pending(&self) -> bool {
        self.first_undo
    }
}
