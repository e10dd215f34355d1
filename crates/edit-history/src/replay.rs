//! Scripted editing sessions.
//!
//! A script is a JSON object with optional starting text and a list of
//! steps. Each step is turned into the host events an editor would raise,
//! followed by the edit itself, so the controller sees key presses before
//! the content changes.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use edit_history_core::{
    EditHistory, EditorEvent, Key, KeyEvent, ManualClock, MemoryElement, MemorySelection,
    Modifiers,
};

pub type ReplayHistory = EditHistory<MemoryElement, MemorySelection, ManualClock>;

fn one() -> usize {
    1
}

/// One user action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Types each character of `text`.
    Type { text: String },
    Backspace {
        #[serde(default = "one")]
        count: usize,
    },
    Delete {
        #[serde(default = "one")]
        count: usize,
    },
    /// Selects a range by dragging (raises a caret move).
    Select { start: usize, end: usize },
    /// Moves the caret (raises a caret move).
    Caret { offset: usize },
    Paste { text: String },
    Cut,
    /// Lets time pass without input.
    Wait { ms: u64 },
    Undo,
    Redo,
}

/// A scripted session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Element content before the first step. Defaults to the restored
    /// history entry, or empty.
    #[serde(default)]
    pub initial: Option<String>,
    pub steps: Vec<Step>,
}

impl Script {
    /// Reads a script from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse script: {}", path.display()))
    }
}

/// Applies one step to the controller and its element.
pub fn apply(history: &mut ReplayHistory, clock: &ManualClock, step: &Step) {
    match step {
        Step::Type { text } => {
            for c in text.chars() {
                let key = if c == '\n' {
                    Key::Enter
                } else {
                    Key::Character(c)
                };
                history.handle_event(&mut EditorEvent::KeyDown(KeyEvent::plain(key)));
                history.handle_event(&mut EditorEvent::KeyPress(KeyEvent::plain(key)));
                history.element_mut().insert(&c.to_string());
            }
        }
        Step::Backspace { count } => {
            for _ in 0..*count {
                history.handle_event(&mut EditorEvent::KeyDown(KeyEvent::plain(Key::Backspace)));
                history.element_mut().backspace();
            }
        }
        Step::Delete { count } => {
            for _ in 0..*count {
                history.handle_event(&mut EditorEvent::KeyDown(KeyEvent::plain(Key::Delete)));
                history.element_mut().delete_forward();
            }
        }
        Step::Select { start, end } => {
            history.element_mut().set_selection(*start, *end);
            history.handle_event(&mut EditorEvent::CaretMoved);
        }
        Step::Caret { offset } => {
            history.element_mut().collapse(*offset);
            history.handle_event(&mut EditorEvent::CaretMoved);
        }
        Step::Paste { text } => {
            history.handle_event(&mut EditorEvent::Paste);
            history.element_mut().insert(text);
        }
        Step::Cut => {
            history.handle_event(&mut EditorEvent::Cut);
            history.element_mut().cut();
        }
        Step::Wait { ms } => {
            clock.advance(Duration::from_millis(*ms));
            history.tick();
        }
        Step::Undo => {
            let mut event =
                EditorEvent::KeyDown(KeyEvent::new(Key::Character('z'), Modifiers::COMMAND));
            history.handle_event(&mut event);
        }
        Step::Redo => {
            let mut event = EditorEvent::KeyDown(KeyEvent::new(
                Key::Character('z'),
                Modifiers::COMMAND_SHIFT,
            ));
            history.handle_event(&mut event);
        }
    }
}

/// Applies every step in order.
pub fn run(history: &mut ReplayHistory, clock: &ManualClock, steps: &[Step]) {
    for (i, step) in steps.iter().enumerate() {
        tracing::debug!(step = i, ?step, "replaying");
        apply(history, clock, step);
    }
}
