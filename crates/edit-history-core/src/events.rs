/// Notifications emitted by the controller and the channel that carries them.
use edit_history_mod_history::Snapshot;

/// Something observers may care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    /// A capture is about to happen.
    AddToHistory,
    /// A snapshot was restored by stepping back.
    Undo(Snapshot),
    /// A snapshot was restored by stepping forward.
    Redo(Snapshot),
    /// A snapshot was restored in either direction.
    Restore(Snapshot),
}

impl HistoryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HistoryEvent::AddToHistory => "add-to-history",
            HistoryEvent::Undo(_) => "undo",
            HistoryEvent::Redo(_) => "redo",
            HistoryEvent::Restore(_) => "restore",
        }
    }

    /// The restored snapshot, if this event carries one.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            HistoryEvent::AddToHistory => None,
            HistoryEvent::Undo(s) | HistoryEvent::Redo(s) | HistoryEvent::Restore(s) => Some(s),
        }
    }
}

/// Handle returned by [`Notifier::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&HistoryEvent)>;

/// Broadcasts events to subscribed handlers, in subscription order.
#[derive(Default)]
pub struct Notifier {
    handlers: Vec<(SubscriptionId, Handler)>,
    next_id: u64,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&HistoryEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn emit(&mut self, event: &HistoryEvent) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
