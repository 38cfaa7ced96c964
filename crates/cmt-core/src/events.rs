//! Comment lifecycle notifications
//!
//! Listeners are invoked synchronously, in registration order, after the
//! triggering operation has been applied and before it returns to the
//! caller. Slow work should be handed off by the listener itself.

use crate::comment::Comment;
use std::fmt;
use std::sync::Arc;

/// Which lifecycle transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A comment was created
    Created,
    /// A comment was changed (includes restore from trash)
    Updated,
    /// A comment was soft- or force-deleted
    Deleted,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Created => write!(f, "created"),
            EventKind::Updated => write!(f, "updated"),
            EventKind::Deleted => write!(f, "deleted"),
        }
    }
}

/// A notification carrying the affected comment
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEvent {
    pub kind: EventKind,
    pub comment: Comment,
}

/// Subscriber to comment lifecycle notifications
pub trait CommentListener: Send + Sync {
    /// Handle one notification
    fn handle(&self, event: &CommentEvent);
}

impl<F> CommentListener for F
where
    F: Fn(&CommentEvent) + Send + Sync,
{
    fn handle(&self, event: &CommentEvent) {
        self(event)
    }
}

/// Ordered set of listeners
#[derive(Clone, Default)]
pub struct EventDispatcher {
    listeners: Vec<Arc<dyn CommentListener>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn subscribe(&mut self, listener: impl CommentListener + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    /// Deliver an event to every listener
    pub fn dispatch(&self, kind: EventKind, comment: &Comment) {
        if self.listeners.is_empty() {
            return;
        }

        tracing::trace!(%kind, comment = %comment.id, "dispatching comment event");
        let event = CommentEvent {
            kind,
            comment: comment.clone(),
        };
        for listener in &self.listeners {
            listener.handle(&event);
        }
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Listener that records every event, for tests and audit trails
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<std::sync::Mutex<Vec<CommentEvent>>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<CommentEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded event kinds, in order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

impl CommentListener for EventLog {
    fn handle(&self, event: &CommentEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBuilder;
    use crate::types::MorphRef;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_comment() -> Comment {
        CommentBuilder::on(MorphRef::new("Article", 1u64)).build()
    }

    #[test]
    fn test_dispatch_in_order() {
        let mut dispatcher = EventDispatcher::new();
        let log = EventLog::new();
        dispatcher.subscribe(log.clone());

        let comment = create_test_comment();
        dispatcher.dispatch(EventKind::Created, &comment);
        dispatcher.dispatch(EventKind::Deleted, &comment);

        assert_eq!(log.kinds(), vec![EventKind::Created, EventKind::Deleted]);
        assert_eq!(log.events()[0].comment.id, comment.id);
    }

    #[test]
    fn test_closure_listener() {
        let counter = Arc::new(AtomicUsize::new(0));
        let seen = counter.clone();

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(move |event: &CommentEvent| {
            if event.kind == EventKind::Updated {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        });

        let comment = create_test_comment();
        dispatcher.dispatch(EventKind::Updated, &comment);
        dispatcher.dispatch(EventKind::Created, &comment);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(dispatcher.len(), 1);
    }

    #[test]
    fn test_event_kind_display() {
        assert_eq!(EventKind::Created.to_string(), "created");
        assert_eq!(EventKind::Deleted.to_string(), "deleted");
    }
}
