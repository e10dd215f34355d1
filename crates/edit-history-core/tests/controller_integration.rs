// Integration tests for the edit history controller.
//
// These drive the controller purely through host events, the way an
// editor front end would, and observe it through emitted notifications.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use edit_history_core::{
    EditHistory, EditorEvent, HistoryConfig, HistoryEvent, HistoryStack, Key, KeyEvent,
    ManualClock, MemoryElement, MemorySelection, Modifiers, SelectionRange, Snapshot,
};

type Controller = EditHistory<MemoryElement, MemorySelection, ManualClock>;

fn config() -> HistoryConfig {
    HistoryConfig {
        idle_timeout_ms: 1000,
        max_history_depth: 1000,
        data_dir: PathBuf::from("."),
    }
}

fn controller(text: &str) -> (Controller, ManualClock) {
    let clock = ManualClock::new();
    let h = EditHistory::with_clock(
        MemoryElement::with_caret_at_end(text),
        MemorySelection,
        &config(),
        HistoryStack::new(1000),
        clock.clone(),
    );
    (h, clock)
}

fn record_events(h: &mut Controller) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    h.subscribe(move |e| sink.borrow_mut().push(e.name().to_string()));
    log
}

fn type_text(h: &mut Controller, text: &str) {
    for c in text.chars() {
        h.handle_event(&mut EditorEvent::KeyDown(KeyEvent::character(c)));
        h.handle_event(&mut EditorEvent::KeyPress(KeyEvent::character(c)));
        h.element_mut().insert(&c.to_string());
    }
}

fn backspace(h: &mut Controller) {
    h.handle_event(&mut EditorEvent::KeyDown(KeyEvent::plain(Key::Backspace)));
    h.element_mut().backspace();
}

fn undo_key() -> EditorEvent {
    EditorEvent::KeyDown(KeyEvent::new(Key::Character('z'), Modifiers::COMMAND))
}

fn redo_key() -> EditorEvent {
    EditorEvent::KeyDown(KeyEvent::new(Key::Character('z'), Modifiers::COMMAND_SHIFT))
}

// ── Stack Navigation ───────────────────────────────────────────────────

#[test]
fn test_undo_to_first_and_redo_to_last_over_primed_history() {
    let snapshots: Vec<Snapshot> = ["one", "one two", "one two three", "one two three four"]
        .iter()
        .map(|t| Snapshot::with_caret(*t, t.len()))
        .collect();
    let n = snapshots.len();
    let mut h = EditHistory::with_history(
        MemoryElement::with_caret_at_end("one two three four"),
        MemorySelection,
        &config(),
        snapshots.clone(),
    );

    for _ in 0..n - 1 {
        h.undo(None);
    }
    assert_eq!(h.contents(), "one");
    assert_eq!(h.history().current(), Some(&snapshots[0]));

    for _ in 0..n - 1 {
        h.redo(None);
    }
    assert_eq!(h.contents(), "one two three four");
    assert_eq!(h.history().current(), Some(&snapshots[n - 1]));
}

#[test]
fn test_typing_sessions_undo_in_bursts() {
    let (mut h, clock) = controller("");

    type_text(&mut h, "hello");
    clock.advance(Duration::from_millis(1200));
    type_text(&mut h, " world");
    clock.advance(Duration::from_millis(1200));
    type_text(&mut h, "!");
    assert_eq!(h.contents(), "hello world!");

    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "hello world");
    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "hello");
    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "");

    h.handle_event(&mut redo_key());
    h.handle_event(&mut redo_key());
    h.handle_event(&mut redo_key());
    assert_eq!(h.contents(), "hello world!");
    assert_eq!(h.element().selection(), Some(SelectionRange::caret(12)));
}

#[test]
fn test_editing_after_undo_discards_redo_tail() {
    let (mut h, clock) = controller("");
    type_text(&mut h, "abc");
    clock.advance(Duration::from_secs(2));
    type_text(&mut h, "def");

    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "abc");

    clock.advance(Duration::from_secs(2));
    type_text(&mut h, "X");
    assert_eq!(h.contents(), "abcX");

    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "abc");
    h.handle_event(&mut redo_key());
    assert_eq!(h.contents(), "abcX");
    h.handle_event(&mut redo_key());
    assert_eq!(h.contents(), "abcX");
    assert!(!h.snapshots().iter().any(|s| s.content == "abcdef"));
}

#[test]
fn test_backspace_burst_is_one_step() {
    let (mut h, clock) = controller("");
    type_text(&mut h, "draft");
    clock.advance(Duration::from_secs(2));
    for _ in 0..3 {
        backspace(&mut h);
    }
    assert_eq!(h.contents(), "dr");

    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "draft");
}

// ── Shortcut Handling ──────────────────────────────────────────────────

#[test]
fn test_shortcuts_prevent_default() {
    let (mut h, _) = controller("ab");
    type_text(&mut h, "c");

    let mut undo = undo_key();
    h.handle_event(&mut undo);
    let mut redo = redo_key();
    h.handle_event(&mut redo);

    for event in [undo, redo] {
        match event {
            EditorEvent::KeyDown(key) => assert!(key.default_prevented()),
            other => panic!("unexpected event {other:?}"),
        }
    }
}

#[test]
fn test_shift_chord_only_redoes() {
    let (mut h, _) = controller("ab");
    type_text(&mut h, "c");
    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "ab");
    let log = record_events(&mut h);

    h.handle_event(&mut redo_key());

    assert_eq!(h.contents(), "abc");
    assert_eq!(*log.borrow(), vec!["redo", "restore"]);
}

// ── Notifications ──────────────────────────────────────────────────────

#[test]
fn test_event_sequence() {
    let (mut h, _) = controller("ab");
    let log = record_events(&mut h);

    type_text(&mut h, "cd");
    h.handle_event(&mut undo_key());
    h.handle_event(&mut redo_key());

    assert_eq!(
        *log.borrow(),
        vec!["add-to-history", "undo", "restore", "redo", "restore"]
    );
}

#[test]
fn test_restore_events_carry_snapshot() {
    let (mut h, _) = controller("ab");
    let restored = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&restored);
    h.subscribe(move |e| {
        if let HistoryEvent::Restore(snapshot) = e {
            sink.borrow_mut().push(snapshot.clone());
        }
    });

    type_text(&mut h, "c");
    h.handle_event(&mut undo_key());
    h.handle_event(&mut redo_key());

    assert_eq!(
        *restored.borrow(),
        vec![Snapshot::with_caret("ab", 2), Snapshot::with_caret("abc", 3)]
    );
}

#[test]
fn test_exhausted_stack_emits_nothing() {
    let (mut h, _) = controller("text");
    h.element_mut().clear_selection();
    let log = record_events(&mut h);

    h.handle_event(&mut undo_key());
    h.handle_event(&mut redo_key());

    assert!(log.borrow().is_empty());
    assert_eq!(h.contents(), "text");
}

#[test]
fn test_unsubscribed_observer_is_not_called() {
    let (mut h, _) = controller("");
    let count = Rc::new(RefCell::new(0));
    let c = Rc::clone(&count);
    let id = h.subscribe(move |_| *c.borrow_mut() += 1);

    type_text(&mut h, "a");
    assert!(h.unsubscribe(id));
    h.handle_event(&mut undo_key());

    assert_eq!(*count.borrow(), 1);
}

// ── Bind / Unbind ──────────────────────────────────────────────────────

#[test]
fn test_unbind_silences_all_events() {
    let (mut h, clock) = controller("ab");
    let log = record_events(&mut h);
    h.unbind();

    type_text(&mut h, "cd");
    backspace(&mut h);
    h.handle_event(&mut EditorEvent::CaretMoved);
    h.handle_event(&mut EditorEvent::Paste);
    h.handle_event(&mut undo_key());
    h.handle_event(&mut redo_key());
    clock.advance(Duration::from_secs(5));
    h.tick();

    assert!(log.borrow().is_empty());
    assert!(h.history().is_empty());
    assert_eq!(h.contents(), "abc");
}

#[test]
fn test_rebind_restores_handling() {
    let (mut h, _) = controller("ab");
    h.unbind();
    h.bind();
    h.bind();

    type_text(&mut h, "c");
    assert_eq!(h.history().len(), 1);
    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "ab");
}

#[test]
fn test_burst_after_rebind_captures_its_start() {
    let (mut h, clock) = controller("");
    type_text(&mut h, "a");
    h.unbind();
    clock.advance(Duration::from_secs(5));
    h.bind();

    type_text(&mut h, "b");
    assert_eq!(
        h.snapshots(),
        &[Snapshot::with_caret("", 0), Snapshot::with_caret("a", 1)]
    );

    h.handle_event(&mut undo_key());
    assert_eq!(h.contents(), "a");
}
