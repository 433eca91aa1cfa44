use std::{
  fmt,
  panic::{self, AssertUnwindSafe},
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Weak,
  },
};

use tracing::{debug, error, trace, warn};

use super::{Registry, SubscriptionId, SubscriptionLike};
use crate::{
  error::RxError,
  scheduler,
  subscriber::{BackpressureStrategy, Subscriber},
};

/// The dispatch unit behind every [`Subscription`](super::Subscription).
///
/// It owns the subscriber's callbacks together with the flags that decide
/// whether, where and how a value is delivered:
///
/// - a paused or cancelled unit drops values silently;
/// - a synchronous unit calls `on_next` inline on the publishing thread;
/// - an asynchronous unit calls `on_next` on a new thread and, while that
///   thread runs, applies its backpressure strategy to any further value.
///
/// A panic raised by `on_next` (or by an operator running inside it) is
/// caught and routed to `on_error`.
pub struct ObservableSubscription<T> {
  inner: Arc<Inner<T>>,
}

struct Inner<T> {
  id: SubscriptionId,
  parent: Weak<dyn Registry>,
  subscriber: Subscriber<T>,
  paused: AtomicBool,
  busy: AtomicBool,
  cancelled: AtomicBool,
  disposed: AtomicBool,
}

struct Detached;

impl Registry for Detached {
  fn remove(&self, _: SubscriptionId) {}
}

impl<T> Clone for ObservableSubscription<T> {
  fn clone(&self) -> Self { ObservableSubscription { inner: self.inner.clone() } }
}

impl<T: Send + 'static> ObservableSubscription<T> {
  pub(crate) fn new(parent: Weak<dyn Registry>, subscriber: Subscriber<T>) -> Self {
    ObservableSubscription {
      inner: Arc::new(Inner {
        id: SubscriptionId::next(),
        parent,
        subscriber,
        paused: AtomicBool::new(false),
        busy: AtomicBool::new(false),
        cancelled: AtomicBool::new(false),
        disposed: AtomicBool::new(false),
      }),
    }
  }

  /// A unit with no publisher behind it.
  pub(crate) fn detached(subscriber: Subscriber<T>) -> Self {
    let parent: Weak<dyn Registry> = Weak::<Detached>::new();
    Self::new(parent, subscriber)
  }

  pub fn is_asynchronous(&self) -> bool { self.inner.subscriber.asynchronous }

  pub fn backpressure(&self) -> Option<BackpressureStrategy> { self.inner.subscriber.backpressure }

  /// Delivers one value according to the dispatch mode.
  pub fn on_next(&self, value: T) {
    let inner = &self.inner;
    if inner.paused.load(Ordering::Acquire) || inner.cancelled.load(Ordering::Acquire) {
      return;
    }
    if !inner.subscriber.asynchronous {
      inner.deliver(value);
      return;
    }

    let guarded =
      inner.busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_ok();
    if !guarded {
      match inner.subscriber.backpressure {
        Some(BackpressureStrategy::Drop) => {
          trace!(subscription = %inner.id, "busy, value dropped");
          return;
        }
        Some(BackpressureStrategy::Error) => {
          debug!(subscription = %inner.id, "busy, reporting missed value");
          inner.on_error(RxError::missed_value());
          return;
        }
        // Without a strategy, emissions are allowed to overlap.
        None => {}
      }
    }

    let task = self.inner.clone();
    let spawned = scheduler::new_thread(move || {
      task.deliver(value);
      if guarded {
        task.busy.store(false, Ordering::Release);
      }
    });
    if let Err(err) = spawned {
      if guarded {
        inner.busy.store(false, Ordering::Release);
      }
      error!(subscription = %inner.id, error = %err, "could not dispatch value");
      inner.on_error(err);
    }
  }

  /// Routes an error to the `on_error` handler, if there is one.
  pub fn on_error(&self, err: RxError) { self.inner.on_error(err) }

  /// Calls the `on_completed` handler, if there is one.
  pub fn on_completed(&self, value: Option<T>) {
    let inner = &self.inner;
    if let Some(handler) = &inner.subscriber.on_completed {
      let handler = handler.clone();
      if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(value))) {
        inner.report(RxError::from_panic(payload));
      }
    }
  }

  /// Marks the unit cancelled without touching the publisher. Used when the
  /// publisher itself drops every registration.
  pub(crate) fn retire(&self) { self.inner.cancelled.store(true, Ordering::Release); }
}

impl<T> Inner<T> {
  fn deliver(&self, value: T) {
    let result = panic::catch_unwind(AssertUnwindSafe(|| (self.subscriber.on_next)(value)));
    if let Err(payload) = result {
      self.report(RxError::from_panic(payload));
    }
  }

  /// Error raised while handling a value.
  fn report(&self, err: RxError) {
    if self.subscriber.on_error.is_none() {
      warn!(subscription = %self.id, error = %err, "unhandled error in subscriber");
      return;
    }
    self.on_error(err);
  }

  fn on_error(&self, err: RxError) {
    let Some(handler) = &self.subscriber.on_error else {
      trace!(subscription = %self.id, error = %err, "no error handler");
      return;
    };
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler(err))) {
      error!(
        subscription = %self.id,
        error = %RxError::from_panic(payload),
        "error handler failed"
      );
    }
  }
}

impl<T: Send + 'static> SubscriptionLike for ObservableSubscription<T> {
  fn id(&self) -> SubscriptionId { self.inner.id }

  fn cancel(&self) {
    if self.inner.cancelled.swap(true, Ordering::AcqRel) {
      return;
    }
    trace!(subscription = %self.inner.id, "cancelled");
    if let Some(parent) = self.inner.parent.upgrade() {
      parent.remove(self.inner.id);
    }
  }

  fn pause(&self) { self.inner.paused.store(true, Ordering::Release) }

  fn resume(&self) { self.inner.paused.store(false, Ordering::Release) }

  fn is_paused(&self) -> bool { self.inner.paused.load(Ordering::Acquire) }

  fn is_cancelled(&self) -> bool { self.inner.cancelled.load(Ordering::Acquire) }

  fn dispose(&self) {
    if self.inner.disposed.swap(true, Ordering::AcqRel) {
      return;
    }
    trace!(subscription = %self.inner.id, "disposed");
    if let Some(handler) = &self.inner.subscriber.on_dispose {
      if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| handler())) {
        error!(
          subscription = %self.inner.id,
          error = %RxError::from_panic(payload),
          "dispose handler failed"
        );
      }
    }
  }
}

impl<T> fmt::Debug for ObservableSubscription<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ObservableSubscription")
      .field("id", &self.inner.id)
      .field("subscriber", &self.inner.subscriber)
      .field("paused", &self.inner.paused.load(Ordering::Relaxed))
      .field("cancelled", &self.inner.cancelled.load(Ordering::Relaxed))
      .finish()
  }
}
