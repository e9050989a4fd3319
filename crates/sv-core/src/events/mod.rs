use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use crate::ids::{AppId, PublisherKey};
use crate::time::TimeFilter;

/// Every cross-view interaction in the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// The brushed release-date window changed
    TimeRangeChanged(TimeFilter),
    /// A game was picked (or the pick was cleared)
    GameSelected(Option<AppId>),
    /// A publisher bubble was picked (or the pick was cleared)
    PublisherSelected(Option<PublisherKey>),
    /// Leave the per-publisher game view
    ReturnToOverview,
    /// Minimum peak concurrent players changed
    PeakThresholdChanged(f64),
    /// Indie games shown or hidden
    IndieVisibilityChanged(bool),
}

/// Fieldless discriminant of [`DashboardEvent`], used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    TimeRangeChanged,
    GameSelected,
    PublisherSelected,
    ReturnToOverview,
    PeakThresholdChanged,
    IndieVisibilityChanged,
}

impl DashboardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::TimeRangeChanged(_) => EventKind::TimeRangeChanged,
            Self::GameSelected(_) => EventKind::GameSelected,
            Self::PublisherSelected(_) => EventKind::PublisherSelected,
            Self::ReturnToOverview => EventKind::ReturnToOverview,
            Self::PeakThresholdChanged(_) => EventKind::PeakThresholdChanged,
            Self::IndieVisibilityChanged(_) => EventKind::IndieVisibilityChanged,
        }
    }
}

/// Name a subscriber registers under, e.g. `"selection-store"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberId(String);

impl SubscriberId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubscriberId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors surfaced by [`EventBus::emit`]
#[derive(Error, Debug)]
pub enum EventError {
    #[error("subscriber `{subscriber}` failed to handle {kind:?}")]
    Handler {
        kind: EventKind,
        subscriber: SubscriberId,
        #[source]
        source: anyhow::Error,
    },

    #[error("subscriber `{subscriber}` re-entered its own {kind:?} handler")]
    Reentrant {
        kind: EventKind,
        subscriber: SubscriberId,
    },
}

type Handler = dyn FnMut(&DashboardEvent) -> anyhow::Result<()> + Send + Sync;

struct Subscription {
    subscriber: SubscriberId,
    handler: Arc<Mutex<Box<Handler>>>,
}

/// Synchronous publish/subscribe bus keyed by `(EventKind, SubscriberId)`
pub struct EventBus {
    handlers: RwLock<AHashMap<EventKind, Vec<Subscription>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(AHashMap::new()),
        }
    }

    /// Register `handler` for `kind`. Subscribing an existing key replaces the
    /// handler but keeps its position in the dispatch order.
    pub fn subscribe<F>(&self, kind: EventKind, subscriber: impl Into<SubscriberId>, handler: F)
    where
        F: FnMut(&DashboardEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let subscriber = subscriber.into();
        let handler: Arc<Mutex<Box<Handler>>> = Arc::new(Mutex::new(Box::new(handler)));

        let mut handlers = self.handlers.write();
        let subscriptions = handlers.entry(kind).or_default();
        match subscriptions.iter_mut().find(|s| s.subscriber == subscriber) {
            Some(existing) => existing.handler = handler,
            None => subscriptions.push(Subscription { subscriber, handler }),
        }
    }

    /// Remove one handler. Returns whether anything was registered under the key.
    pub fn unsubscribe(&self, kind: EventKind, subscriber: &SubscriberId) -> bool {
        let mut handlers = self.handlers.write();
        let Some(subscriptions) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = subscriptions.len();
        subscriptions.retain(|s| &s.subscriber != subscriber);
        before != subscriptions.len()
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers.read().get(&kind).map_or(0, Vec::len)
    }

    /// Dispatch `event` to every handler of its kind, in registration order.
    ///
    /// Stops at the first failing handler and returns its error.
    pub fn emit(&self, event: DashboardEvent) -> Result<(), EventError> {
        let kind = event.kind();
        tracing::debug!(?event, "emit");

        // Snapshot so handlers can emit or subscribe without holding the registry lock.
        let targets: Vec<(SubscriberId, Arc<Mutex<Box<Handler>>>)> = self
            .handlers
            .read()
            .get(&kind)
            .map(|subs| {
                subs.iter()
                    .map(|s| (s.subscriber.clone(), Arc::clone(&s.handler)))
                    .collect()
            })
            .unwrap_or_default();

        for (subscriber, handler) in targets {
            let Some(mut handler) = handler.try_lock() else {
                return Err(EventError::Reentrant { kind, subscriber });
            };
            if let Err(source) = (&mut **handler)(&event) {
                return Err(EventError::Handler { kind, subscriber, source });
            }
        }
        Ok(())
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = log.clone();
            bus.subscribe(EventKind::ReturnToOverview, name, move |_| {
                log.lock().push(name);
                Ok(())
            });
        }

        bus.emit(DashboardEvent::ReturnToOverview).unwrap();
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_only_matching_kind_is_dispatched() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        bus.subscribe(EventKind::PeakThresholdChanged, "store", move |event| {
            sink.lock().push(event.clone());
            Ok(())
        });

        bus.emit(DashboardEvent::IndieVisibilityChanged(false)).unwrap();
        bus.emit(DashboardEvent::PeakThresholdChanged(7500.0)).unwrap();
        assert_eq!(*seen.lock(), vec![DashboardEvent::PeakThresholdChanged(7500.0)]);
    }

    #[test]
    fn test_resubscribe_replaces_in_place() {
        let bus = EventBus::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for (name, tag) in [("a", "a1"), ("b", "b1"), ("a", "a2")] {
            let log = log.clone();
            bus.subscribe(EventKind::GameSelected, name, move |_| {
                log.lock().push(tag);
                Ok(())
            });
        }

        assert_eq!(bus.subscriber_count(EventKind::GameSelected), 2);
        bus.emit(DashboardEvent::GameSelected(None)).unwrap();
        assert_eq!(*log.lock(), vec!["a2", "b1"]);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        bus.subscribe(EventKind::GameSelected, "a", |_| Ok(()));

        assert!(bus.unsubscribe(EventKind::GameSelected, &"a".into()));
        assert!(!bus.unsubscribe(EventKind::GameSelected, &"a".into()));
        assert!(!bus.unsubscribe(EventKind::ReturnToOverview, &"a".into()));
        assert_eq!(bus.subscriber_count(EventKind::GameSelected), 0);
    }

    #[test]
    fn test_failing_handler_stops_dispatch() {
        let bus = EventBus::new();
        let reached = Arc::new(Mutex::new(false));

        bus.subscribe(EventKind::ReturnToOverview, "broken", |_| {
            Err(anyhow::anyhow!("boom"))
        });
        let flag = reached.clone();
        bus.subscribe(EventKind::ReturnToOverview, "after", move |_| {
            *flag.lock() = true;
            Ok(())
        });

        let err = bus.emit(DashboardEvent::ReturnToOverview).unwrap_err();
        assert!(matches!(
            err,
            EventError::Handler { kind: EventKind::ReturnToOverview, ref subscriber, .. }
                if subscriber.as_str() == "broken"
        ));
        assert!(!*reached.lock());
    }

    #[test]
    fn test_nested_emit_to_other_kind() {
        let bus = Arc::new(EventBus::new());
        let cleared = Arc::new(Mutex::new(false));

        let inner = bus.clone();
        bus.subscribe(EventKind::ReturnToOverview, "orchestrator", move |_| {
            inner.emit(DashboardEvent::GameSelected(None))?;
            Ok(())
        });
        let flag = cleared.clone();
        bus.subscribe(EventKind::GameSelected, "store", move |_| {
            *flag.lock() = true;
            Ok(())
        });

        bus.emit(DashboardEvent::ReturnToOverview).unwrap();
        assert!(*cleared.lock());
    }

    #[test]
    fn test_self_reentry_is_reported() {
        let bus = Arc::new(EventBus::new());

        let inner = bus.clone();
        bus.subscribe(EventKind::ReturnToOverview, "loop", move |_| {
            inner.emit(DashboardEvent::ReturnToOverview)?;
            Ok(())
        });

        let err = bus.emit(DashboardEvent::ReturnToOverview).unwrap_err();
        let EventError::Handler { source, .. } = err else {
            panic!("expected the outer handler to fail");
        };
        assert!(matches!(
            source.downcast_ref::<EventError>(),
            Some(EventError::Reentrant { .. })
        ));
    }
}
