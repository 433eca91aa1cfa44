//! Sources that can be subscribed to, and the free functions that build the
//! cold ones.

use crate::{error::RxError, subscriber::Subscriber, subscription::Subscription};

mod chain;
mod defer;
mod flowable;
mod into_stream;
mod pipe_observable;
mod publisher;
mod trivial;

pub use chain::{ChainBuilder, ChainSubscribe};
pub use defer::{defer, Defer};
pub use flowable::{Flowable, Single};
pub use into_stream::{IntoStream, SubscriptionStream};
pub use pipe_observable::PipeObservable;
pub use publisher::Publisher;
pub use trivial::{empty, never, throw, throw_with, Empty, Never, Throw};

/// Anything a [`Subscriber`] can be attached to.
///
/// The trait is object safe: `Arc<dyn Subscribable<T>>` is how pipes keep
/// hold of their source.
pub trait Subscribable<T>: Send + Sync {
  /// Attaches `subscriber` and returns the handle controlling it.
  ///
  /// Fails only when the subscriber itself is invalid (backpressure on a
  /// synchronous subscriber); failures while handling values go to the
  /// subscriber's `on_error`.
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError>;

  /// Shortcut for a synchronous subscriber with only a `next` handler.
  fn subscribe<F>(&self, on_next: F) -> Subscription
  where
    F: Fn(T) + Send + Sync + 'static,
    Self: Sized,
  {
    // A synchronous subscriber without backpressure always validates.
    self.subscribe_with(Subscriber::new(on_next)).unwrap_or_else(|_| Subscription::detached())
  }
}

impl<T, S: Subscribable<T> + ?Sized> Subscribable<T> for std::sync::Arc<S> {
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    (**self).subscribe_with(subscriber)
  }
}

/// A cold source that replays `values` to each subscriber.
pub fn of<T, I>(values: I) -> Flowable<T>
where
  T: Clone + Send + 'static,
  I: IntoIterator<Item = T>,
{
  Flowable::new(values)
}

/// A cold source of `count` consecutive integers starting at `start`.
///
/// A `count` of zero yields a source with no values.
pub fn range(start: i64, count: i64) -> Result<Flowable<i64>, RxError> {
  if count < 0 {
    return Err(RxError::NegativeCount(count));
  }
  if count == 0 {
    return Ok(Flowable::new([]));
  }
  let last = start.checked_add(count - 1).ok_or(RxError::RangeOverflow { start, count })?;
  Ok(Flowable::new(start..=last))
}
