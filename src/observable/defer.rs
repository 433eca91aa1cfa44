use std::marker::PhantomData;

use tracing::debug;

use super::{trivial::throw, Subscribable};
use crate::{error::RxError, subscriber::Subscriber, subscription::Subscription};

/// Creates a source that, on each subscription, asks `factory` for the
/// source to subscribe to.
///
/// When the factory fails, the subscriber receives the error through
/// `on_error` followed by `on_dispose`.
///
/// ```rust
/// use rxpipe::prelude::*;
///
/// observable::defer(|| {
///   println!("Hi!");
///   Ok(observable::of(["Hello!"]))
/// })
/// .subscribe(move |v| println!("{v}"));
/// // Prints: Hi!\nHello!\n
/// ```
pub fn defer<T, S, F>(factory: F) -> Defer<T, F>
where
  F: Fn() -> Result<S, RxError> + Send + Sync,
  S: Subscribable<T>,
{
  Defer { factory, _hint: PhantomData }
}

pub struct Defer<T, F> {
  factory: F,
  _hint: PhantomData<fn() -> T>,
}

impl<T, S, F> Subscribable<T> for Defer<T, F>
where
  T: Send + 'static,
  F: Fn() -> Result<S, RxError> + Send + Sync,
  S: Subscribable<T>,
{
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    match (self.factory)() {
      Ok(source) => source.subscribe_with(subscriber),
      Err(err) => {
        debug!(error = %err, "deferred factory failed");
        throw(err).subscribe_with(subscriber)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::observable::of;

  #[test]
  fn calls_factory_per_subscription() {
    let calls = Arc::new(Mutex::new(0));
    let c_calls = calls.clone();
    let source = defer(move || {
      let mut calls = c_calls.lock().unwrap();
      *calls += 1;
      Ok(of([*calls]))
    });

    let values = Arc::new(Mutex::new(vec![]));
    let (a, b) = (values.clone(), values.clone());
    source.subscribe(move |v| a.lock().unwrap().push(v));
    source.subscribe(move |v| b.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn factory_error_goes_to_on_error_then_dispose() {
    let log = Arc::new(Mutex::new(vec![]));
    let (e_log, d_log) = (log.clone(), log.clone());
    let source = defer(|| Err::<crate::observable::Flowable<i32>, _>(RxError::NegativeCount(-2)));
    source
      .subscribe_with(
        Subscriber::new(|_| {})
          .on_error(move |e| e_log.lock().unwrap().push(e.to_string()))
          .on_dispose(move || d_log.lock().unwrap().push("disposed".to_owned())),
      )
      .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["count must be non-negative, got -2", "disposed"]);
  }
}
