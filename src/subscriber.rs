//! The callback set and dispatch mode a caller hands to `subscribe_with`.

use std::{fmt, sync::Arc};

use crate::error::RxError;

/// Handler invoked for every value that reaches a subscription.
pub type NextHandler<T> = Arc<dyn Fn(T) + Send + Sync>;
/// Handler invoked with errors routed to a subscription.
pub type ErrorHandler = Arc<dyn Fn(RxError) + Send + Sync>;
/// Handler invoked when the publisher completes, with its final value if any.
pub type CompletedHandler<T> = Arc<dyn Fn(Option<T>) + Send + Sync>;
/// Handler invoked once when the subscription is disposed.
pub type DisposeHandler = Arc<dyn Fn() + Send + Sync>;

/// Policy applied when a value reaches an asynchronous subscription whose
/// previous value is still being handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackpressureStrategy {
  /// Discard the new value silently.
  Drop,
  /// Discard the new value and report [`RxError::missed_value`] to
  /// `on_error`.
  Error,
}

/// Everything needed to create a subscription.
///
/// ```rust
/// use rxpipe::prelude::*;
///
/// let subject = PublishSubject::<i32>::new();
/// let subscription = subject
///   .subscribe_with(
///     Subscriber::new(|v: i32| println!("{v}"))
///       .on_error(|e| eprintln!("{e}"))
///       .asynchronous(true)
///       .backpressure(BackpressureStrategy::Drop),
///   )
///   .unwrap();
/// subscription.cancel();
/// ```
pub struct Subscriber<T> {
  pub(crate) on_next: NextHandler<T>,
  pub(crate) on_error: Option<ErrorHandler>,
  pub(crate) on_completed: Option<CompletedHandler<T>>,
  pub(crate) on_dispose: Option<DisposeHandler>,
  pub(crate) asynchronous: bool,
  pub(crate) backpressure: Option<BackpressureStrategy>,
}

impl<T> Subscriber<T> {
  /// A synchronous subscriber with only a `next` handler.
  pub fn new<F>(on_next: F) -> Self
  where
    F: Fn(T) + Send + Sync + 'static,
  {
    Self::from_handler(Arc::new(on_next))
  }

  pub(crate) fn from_handler(on_next: NextHandler<T>) -> Self {
    Subscriber {
      on_next,
      on_error: None,
      on_completed: None,
      on_dispose: None,
      asynchronous: false,
      backpressure: None,
    }
  }

  #[must_use]
  pub fn on_error<F>(mut self, handler: F) -> Self
  where
    F: Fn(RxError) + Send + Sync + 'static,
  {
    self.on_error = Some(Arc::new(handler));
    self
  }

  #[must_use]
  pub fn on_completed<F>(mut self, handler: F) -> Self
  where
    F: Fn(Option<T>) + Send + Sync + 'static,
  {
    self.on_completed = Some(Arc::new(handler));
    self
  }

  #[must_use]
  pub fn on_dispose<F>(mut self, handler: F) -> Self
  where
    F: Fn() + Send + Sync + 'static,
  {
    self.on_dispose = Some(Arc::new(handler));
    self
  }

  /// Run the `next` handler on a new thread for every accepted value instead
  /// of inline on the publishing thread.
  #[must_use]
  pub fn asynchronous(mut self, asynchronous: bool) -> Self {
    self.asynchronous = asynchronous;
    self
  }

  /// Only valid together with `asynchronous(true)`; subscribing fails with
  /// [`RxError::BackpressureMismatch`] otherwise.
  #[must_use]
  pub fn backpressure(mut self, strategy: BackpressureStrategy) -> Self {
    self.backpressure = Some(strategy);
    self
  }

  pub fn is_asynchronous(&self) -> bool { self.asynchronous }

  pub fn backpressure_strategy(&self) -> Option<BackpressureStrategy> { self.backpressure }

  pub(crate) fn validate(&self) -> Result<(), RxError> {
    if self.backpressure.is_some() && !self.asynchronous {
      return Err(RxError::BackpressureMismatch);
    }
    Ok(())
  }
}

impl<T> Clone for Subscriber<T> {
  fn clone(&self) -> Self {
    Subscriber {
      on_next: self.on_next.clone(),
      on_error: self.on_error.clone(),
      on_completed: self.on_completed.clone(),
      on_dispose: self.on_dispose.clone(),
      asynchronous: self.asynchronous,
      backpressure: self.backpressure,
    }
  }
}

impl<T> fmt::Debug for Subscriber<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscriber")
      .field("on_error", &self.on_error.is_some())
      .field("on_completed", &self.on_completed.is_some())
      .field("on_dispose", &self.on_dispose.is_some())
      .field("asynchronous", &self.asynchronous)
      .field("backpressure", &self.backpressure)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn synchronous_backpressure_is_rejected() {
    let sub = Subscriber::new(|_: i32| {}).backpressure(BackpressureStrategy::Drop);
    assert_eq!(sub.validate(), Err(RxError::BackpressureMismatch));

    let sub = sub.asynchronous(true);
    assert_eq!(sub.validate(), Ok(()));
    assert_eq!(sub.backpressure_strategy(), Some(BackpressureStrategy::Drop));
  }

  #[test]
  fn defaults_to_synchronous_without_handlers() {
    let sub = Subscriber::new(|_: ()| {});
    assert!(!sub.is_asynchronous());
    assert!(sub.on_error.is_none() && sub.on_completed.is_none() && sub.on_dispose.is_none());
  }
}
