//! A process-wide registry of named events.
//!
//! Each event is keyed by its payload type and a name and is backed by a
//! [`SingleValueSubject`], so a late subscriber still sees the most recent
//! publication.
//!
//! ```rust
//! use rxpipe::{events::event, prelude::*};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct UserLoggedIn(String);
//!
//! event::<UserLoggedIn>().subscribe(|e| println!("welcome {}", e.0));
//! event::<UserLoggedIn>().publish(UserLoggedIn("ada".into()));
//! ```

use std::{
  any::{Any, TypeId},
  collections::HashMap,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::debug;

use crate::{
  error::RxError,
  observable::{ChainBuilder, PipeObservable, Subscribable},
  pipe::IntoPipe,
  subject::SingleValueSubject,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Name used by [`event`].
pub const DEFAULT_EVENT_NAME: &str = "__default__";

static BROADCASTER: Lazy<EventBroadcaster> = Lazy::new(EventBroadcaster::default);

/// The process-wide registry.
pub fn events() -> &'static EventBroadcaster { &BROADCASTER }

/// The default event for payload type `T`, created on first use.
pub fn event<T: Clone + Send + 'static>() -> Event<T> { BROADCASTER.event(DEFAULT_EVENT_NAME) }

/// The event called `name` for payload type `T`, created on first use.
pub fn named_event<T: Clone + Send + 'static>(name: &str) -> Event<T> { BROADCASTER.event(name) }

/// A publish/subscribe channel for one payload type.
pub struct Event<T> {
  subject: SingleValueSubject<T>,
}

impl<T> Clone for Event<T> {
  fn clone(&self) -> Self { Event { subject: self.subject.clone() } }
}

impl<T: Clone + Send + 'static> Event<T> {
  fn new() -> Self { Event { subject: SingleValueSubject::new(None) } }

  pub fn publish(&self, value: T) { self.subject.next(value) }

  /// Publishes `value` only if it satisfies `predicate`. Returns whether it
  /// was published.
  pub fn publish_if<F>(&self, value: T, predicate: F) -> bool
  where
    F: FnOnce(&T) -> bool,
  {
    let publish = predicate(&value);
    if publish {
      self.publish(value);
    }
    publish
  }

  /// Calls `handler` with exactly one value (the latest publication, if
  /// there is one, otherwise the next) and then unsubscribes.
  pub fn subscribe_once<F>(&self, handler: F) -> Subscription
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    let fired = Arc::new(AtomicBool::new(false));
    let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
    let (c_fired, c_slot) = (fired.clone(), slot.clone());
    let subscription = self.subject.subscribe(move |value| {
      if c_fired.swap(true, Ordering::AcqRel) {
        return;
      }
      handler(value);
      let subscription = c_slot.lock().take();
      if let Some(subscription) = subscription {
        subscription.cancel();
      }
    });
    *slot.lock() = Some(subscription.clone());
    if fired.load(Ordering::Acquire) {
      subscription.cancel();
    }
    subscription
  }

  /// The latest publication.
  pub fn latest(&self) -> Option<T> { self.subject.latest() }

  pub fn pipe<M, P>(&self, ops: P) -> PipeObservable<T, P::Out>
  where
    P: IntoPipe<T, M>,
    P::Out: Send + 'static,
  {
    self.subject.pipe(ops)
  }

  pub fn chain(&self) -> ChainBuilder<T, T> { self.subject.chain() }

  fn destroy(&self) { self.subject.dispose() }
}

impl<T: Clone + Send + 'static> Subscribable<T> for Event<T> {
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    self.subject.subscribe_with(subscriber)
  }
}

trait ErasedEvent: Send + Sync {
  fn as_any(&self) -> &dyn Any;

  fn destroy(&self);
}

impl<T: Clone + Send + 'static> ErasedEvent for Event<T> {
  fn as_any(&self) -> &dyn Any { self }

  fn destroy(&self) { Event::destroy(self) }
}

type NamedEvents = HashMap<String, Box<dyn ErasedEvent>>;

/// Events grouped by payload type, then by name.
#[derive(Default)]
pub struct EventBroadcaster {
  events: Mutex<HashMap<TypeId, NamedEvents>>,
}

impl EventBroadcaster {
  /// The event called `name` for payload type `T`, created on first use.
  pub fn event<T: Clone + Send + 'static>(&self, name: &str) -> Event<T> {
    let mut events = self.events.lock();
    let named = events.entry(TypeId::of::<T>()).or_default();
    if let Some(existing) = named.get(name).and_then(|e| e.as_any().downcast_ref::<Event<T>>()) {
      return existing.clone();
    }
    debug!(event = name, payload = std::any::type_name::<T>(), "event created");
    let created = Event::new();
    named.insert(name.to_owned(), Box::new(created.clone()));
    created
  }

  /// Whether any event with payload type `T` exists.
  pub fn has_event<T: 'static>(&self) -> bool {
    self.events.lock().contains_key(&TypeId::of::<T>())
  }

  /// Disposes and forgets every event.
  pub fn clear(&self) -> &Self {
    let removed: Vec<_> = self.events.lock().drain().map(|(_, named)| named).collect();
    removed.iter().flat_map(|named| named.values()).for_each(|event| event.destroy());
    self
  }

  /// Disposes and forgets every event with payload type `T`.
  pub fn clear_event<T: 'static>(&self) -> &Self {
    let removed = self.events.lock().remove(&TypeId::of::<T>());
    if let Some(named) = removed {
      named.values().for_each(|event| event.destroy());
    }
    self
  }
}
