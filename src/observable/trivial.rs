use std::{marker::PhantomData, sync::Arc};

use tracing::error;

use super::Subscribable;
use crate::{
  error::RxError,
  scheduler,
  subscriber::Subscriber,
  subscription::{ObservableSubscription, Subscription, SubscriptionLike},
};

/// Runs a terminal action inline, or on a new thread for an asynchronous
/// subscriber, and returns a handle that is already finished.
fn finish<T, F>(subscriber: Subscriber<T>, action: F) -> Result<Subscription, RxError>
where
  T: Send + 'static,
  F: FnOnce(&ObservableSubscription<T>) + Send + 'static,
{
  subscriber.validate()?;
  let asynchronous = subscriber.asynchronous;
  let subscription = ObservableSubscription::detached(subscriber);
  let task = subscription.clone();
  let run = move || {
    action(&task);
    task.dispose();
  };
  if asynchronous {
    if let Err(err) = scheduler::new_thread(run) {
      error!(error = %err, "could not dispatch terminal signal");
      subscription.on_error(err);
    }
  } else {
    run();
  }
  Ok(subscription.into())
}

/// Creates a source that emits nothing and completes immediately.
///
/// # Examples
/// ```
/// use rxpipe::prelude::*;
///
/// observable::empty::<i32>().subscribe(|v| println!("{v}"));
/// // Result: nothing printed
/// ```
pub fn empty<T>() -> Empty<T> { Empty(PhantomData) }

pub struct Empty<T>(PhantomData<fn() -> T>);

impl<T: Send + 'static> Subscribable<T> for Empty<T> {
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    finish(subscriber, |sub| sub.on_completed(None))
  }
}

/// Creates a source that emits nothing and never terminates.
pub fn never<T>() -> Never<T> { Never(PhantomData) }

pub struct Never<T>(PhantomData<fn() -> T>);

impl<T: Send + 'static> Subscribable<T> for Never<T> {
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    subscriber.validate()?;
    Ok(ObservableSubscription::detached(subscriber).into())
  }
}

/// Creates a source that emits no values and terminates every subscriber
/// with `err`.
pub fn throw<T>(err: RxError) -> Throw<T> { throw_with(move || err.clone()) }

/// Like [`throw`], but builds a fresh error for each subscriber.
pub fn throw_with<T, F>(factory: F) -> Throw<T>
where
  F: Fn() -> RxError + Send + Sync + 'static,
{
  Throw { factory: Arc::new(factory), _hint: PhantomData }
}

pub struct Throw<T> {
  factory: Arc<dyn Fn() -> RxError + Send + Sync>,
  _hint: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Subscribable<T> for Throw<T> {
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    let err = (self.factory)();
    finish(subscriber, move |sub| sub.on_error(err))
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{mpsc::channel, Mutex},
    time::Duration,
  };

  use super::*;

  #[test]
  fn empty_completes_then_disposes() {
    let log = Arc::new(Mutex::new(vec![]));
    let (c_log, d_log) = (log.clone(), log.clone());
    empty::<i32>()
      .subscribe_with(
        Subscriber::new(|_| unreachable!())
          .on_completed(move |v| c_log.lock().unwrap().push(format!("completed {v:?}")))
          .on_dispose(move || d_log.lock().unwrap().push("disposed".to_owned())),
      )
      .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["completed None", "disposed"]);
  }

  #[test]
  fn empty_can_complete_asynchronously() {
    let (tx, rx) = channel();
    let tx = Mutex::new(tx);
    empty::<i32>()
      .subscribe_with(
        Subscriber::new(|_| {})
          .on_dispose(move || {
            let _ = tx.lock().unwrap().send(());
          })
          .asynchronous(true),
      )
      .unwrap();
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
  }

  #[test]
  fn never_stays_silent() {
    let sub = never::<i32>()
      .subscribe_with(Subscriber::new(|_| unreachable!()).on_completed(|_| unreachable!()))
      .unwrap();
    assert!(!sub.is_cancelled());
    sub.cancel();
  }

  #[test]
  fn throw_reaches_on_error() {
    let errors = Arc::new(Mutex::new(vec![]));
    let c_errors = errors.clone();
    throw::<i32>(RxError::NegativeIndex(-1))
      .subscribe_with(Subscriber::new(|_| {}).on_error(move |e| c_errors.lock().unwrap().push(e)))
      .unwrap();
    assert_eq!(*errors.lock().unwrap(), vec![RxError::NegativeIndex(-1)]);
  }

  #[test]
  fn throw_with_builds_per_subscriber() {
    let built = Arc::new(Mutex::new(0));
    let c_built = built.clone();
    let source = throw_with::<i32, _>(move || {
      *c_built.lock().unwrap() += 1;
      RxError::missed_value()
    });
    source.subscribe(|_| {});
    source.subscribe(|_| {});
    assert_eq!(*built.lock().unwrap(), 2);
  }

  #[test]
  fn invalid_subscriber_is_rejected_before_running() {
    let result = empty::<i32>().subscribe_with(
      Subscriber::new(|_| {})
        .on_completed(|_| unreachable!())
        .backpressure(crate::subscriber::BackpressureStrategy::Error),
    );
    assert_eq!(result.unwrap_err(), RxError::BackpressureMismatch);
  }
}
