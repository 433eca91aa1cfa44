use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::trace;

use crate::{
  error::RxError,
  subscriber::Subscriber,
  subscription::{ObservableSubscription, Registry, Subscribers, SubscriptionId, SubscriptionLike},
};

/// Subscription bookkeeping and fan-out shared by every hot source.
///
/// A publisher keeps its registrations in subscription order and remembers
/// the last value it emitted. Delivery always iterates over a snapshot, so a
/// callback may subscribe, cancel or publish again without deadlocking.
pub struct Publisher<T> {
  core: Arc<Core<T>>,
}

struct Core<T> {
  subscribers: Mutex<Subscribers<T>>,
  last_value: Mutex<Option<T>>,
}

impl<T: Send + 'static> Registry for Core<T> {
  fn remove(&self, id: SubscriptionId) { self.subscribers.lock().remove(id); }
}

impl<T> Clone for Publisher<T> {
  fn clone(&self) -> Self { Publisher { core: self.core.clone() } }
}

impl<T> Default for Publisher<T> {
  fn default() -> Self {
    let subscribers = Mutex::new(Subscribers::default());
    Publisher { core: Arc::new(Core { subscribers, last_value: Mutex::new(None) }) }
  }
}

impl<T: Clone + Send + 'static> Publisher<T> {
  pub fn new() -> Self { Self::default() }

  /// Validates `subscriber` and registers a new dispatch unit for it.
  pub fn register(&self, subscriber: Subscriber<T>) -> Result<ObservableSubscription<T>, RxError> {
    subscriber.validate()?;
    let registry: Arc<dyn Registry> = self.core.clone();
    let parent: Weak<dyn Registry> = Arc::downgrade(&registry);
    let subscription = ObservableSubscription::new(parent, subscriber);
    self.core.subscribers.lock().add(subscription.clone());
    trace!(subscription = %subscription.id(), "registered");
    Ok(subscription)
  }

  /// Emits `value` to every registered subscription: asynchronous ones first
  /// so their threads start before synchronous handlers run inline.
  pub fn notify_all(&self, value: T) {
    *self.core.last_value.lock() = Some(value.clone());
    let (asynchronous, synchronous): (Vec<_>, Vec<_>) =
      self.snapshot().into_iter().partition(|sub| sub.is_asynchronous());

    let mut iter = asynchronous.iter().chain(synchronous.iter()).peekable();
    while let Some(sub) = iter.next() {
      if iter.peek().is_some() {
        sub.on_next(value.clone());
      } else {
        sub.on_next(value);
        break;
      }
    }
  }

  /// Delivers `err` to every registered subscription.
  pub fn on_error(&self, err: RxError) {
    for sub in self.snapshot() {
      sub.on_error(err.clone());
    }
  }

  /// Signals completion to every registered subscription, then disposes.
  pub fn on_completed(&self, value: Option<T>) {
    for sub in self.snapshot() {
      sub.on_completed(value.clone());
    }
    self.dispose();
  }

  /// Fires every dispose handler and drops all registrations.
  pub fn dispose(&self) {
    let drained = self.core.subscribers.lock().drain();
    trace!(count = drained.len(), "disposing subscriptions");
    for sub in drained {
      sub.retire();
      sub.dispose();
    }
  }

  /// Pauses every registered subscription.
  pub fn pause_all(&self) {
    for sub in self.snapshot() {
      sub.pause();
    }
  }

  /// Resumes every paused subscription.
  pub fn resume_paused(&self) {
    for sub in self.snapshot().into_iter().filter(|sub| sub.is_paused()) {
      sub.resume();
    }
  }

  pub fn subscriber_count(&self) -> usize { self.core.subscribers.lock().len() }

  /// The most recent value passed to [`notify_all`](Self::notify_all).
  pub fn last_value(&self) -> Option<T> { self.core.last_value.lock().clone() }

  fn snapshot(&self) -> Vec<ObservableSubscription<T>> { self.core.subscribers.lock().snapshot() }
}
