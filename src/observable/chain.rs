//! Fluent operator chains.
//!
//! `chain()` is the method-call spelling of `pipe`: operators are appended
//! one call at a time, and the chain either turns into a subscribable with
//! [`build`](ChainBuilder::build) or goes straight to a subscription.
//!
//! ```rust
//! use rxpipe::prelude::*;
//!
//! let subject = SingleValueSubject::new(Some(1));
//! subject
//!   .chain()
//!   .distinct_until_changed()
//!   .skip(2)
//!   .filter(|v| *v > 10)
//!   .buffer_count(5)
//!   .catch(|e| eprintln!("{e}"))
//!   .next(|batch| println!("{batch:?}"))
//!   .subscribe()
//!   .unwrap();
//! ```

use std::{hash::Hash, sync::Arc, time::Duration};

use super::{PipeObservable, Subscribable};
use crate::{
  error::RxError,
  ops::{self, Operator, Timestamped},
  pipe::{IntoPipe, Pipe},
  subscriber::{BackpressureStrategy, Subscriber},
  subscription::Subscription,
};

/// Accumulates operators on top of a source.
pub struct ChainBuilder<T, V> {
  source: Arc<dyn Subscribable<T>>,
  pipe: Pipe<T, V>,
}

impl<T: Send + 'static> ChainBuilder<T, T> {
  pub(crate) fn new(source: Arc<dyn Subscribable<T>>) -> Self {
    ChainBuilder { source, pipe: Pipe::identity() }
  }
}

impl<T, V> ChainBuilder<T, V>
where
  T: Send + 'static,
  V: Send + 'static,
{
  pub(crate) fn from_pipe(source: Arc<dyn Subscribable<T>>, pipe: Pipe<T, V>) -> Self {
    ChainBuilder { source, pipe }
  }

  /// Appends any operator.
  pub fn op<O>(self, op: O) -> ChainBuilder<T, O::Out>
  where
    O: Operator<In = V>,
    O::Out: Send + 'static,
  {
    ChainBuilder { source: self.source, pipe: self.pipe.then(op) }
  }

  /// Appends a single operator, a pipe or a tuple of operators.
  pub fn pipe<M, P>(self, ops: P) -> ChainBuilder<T, P::Out>
  where
    P: IntoPipe<V, M>,
    P::Out: Send + 'static,
  {
    self.op(ops.into_pipe())
  }

  /// Finishes the chain as a subscribable.
  pub fn build(self) -> PipeObservable<T, V> { PipeObservable::new(self.source, self.pipe) }

  pub fn filter<F>(self, predicate: F) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::filter(predicate))
  }

  pub fn ignore<F>(self, predicate: F) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::ignore(predicate))
  }

  pub fn ignore_all(self) -> Self { self.op(ops::ignore_all()) }

  pub fn map<W, F>(self, mapper: F) -> ChainBuilder<T, W>
  where
    W: Send + 'static,
    F: Fn(V) -> W + Send + Sync + 'static,
  {
    self.op(ops::map(mapper))
  }

  pub fn map_to<W: Clone + Send + 'static>(self, value: W) -> ChainBuilder<T, W> {
    self.op(ops::map_to(value))
  }

  pub fn tap<F>(self, action: F) -> Self
  where
    F: Fn(&V) + Send + Sync + 'static,
  {
    self.op(ops::tap(action))
  }

  pub fn take(self, count: usize) -> Self { self.op(ops::take(count)) }

  pub fn take_while<F>(self, predicate: F, include_stop: bool) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::take_while(predicate, include_stop))
  }

  pub fn take_until<F>(self, predicate: F, include_stop: bool) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::take_until(predicate, include_stop))
  }

  pub fn skip(self, count: usize) -> Self { self.op(ops::skip(count)) }

  pub fn skip_while<F>(self, predicate: F) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::skip_while(predicate))
  }

  pub fn skip_until<F>(self, predicate: F) -> Self
  where
    F: Fn(&V) -> bool + Send + Sync + 'static,
  {
    self.op(ops::skip_until(predicate))
  }

  pub fn reduce<F>(self, reducer: F) -> Self
  where
    V: Clone + PartialEq,
    F: Fn(V, V) -> V + Send + Sync + 'static,
  {
    self.op(ops::reduce(reducer))
  }

  pub fn distinct(self) -> Self
  where
    V: Clone + Eq + Hash,
  {
    self.op(ops::distinct())
  }

  pub fn distinct_by<K, F>(self, key: F) -> Self
  where
    K: Eq + Hash + Send + 'static,
    F: Fn(&V) -> K + Send + Sync + 'static,
  {
    self.op(ops::distinct_by(key))
  }

  pub fn distinct_until_changed(self) -> Self
  where
    V: Clone + PartialEq,
  {
    self.op(ops::distinct_until_changed())
  }

  pub fn distinct_until_changed_by<K, F>(self, key: F) -> Self
  where
    K: PartialEq + Send + 'static,
    F: Fn(&V) -> K + Send + Sync + 'static,
  {
    self.op(ops::distinct_until_changed_by(key))
  }

  pub fn debounce(self, span: Duration) -> Self { self.op(ops::debounce(span)) }

  pub fn throttle(self, span: Duration) -> Self { self.op(ops::throttle(span)) }

  pub fn element_at(self, index: i64) -> Result<Self, RxError> {
    Ok(self.op(ops::element_at(index)?))
  }

  pub fn scan<A, F>(self, accumulator: F, seed: A) -> ChainBuilder<T, A>
  where
    A: Clone + Send + 'static,
    F: Fn(A, V) -> A + Send + Sync + 'static,
  {
    self.op(ops::scan(accumulator, seed))
  }

  pub fn buffer(self, span: Duration) -> ChainBuilder<T, Vec<V>> { self.op(ops::buffer(span)) }

  pub fn buffer_count(self, count: usize) -> ChainBuilder<T, Vec<V>> {
    self.op(ops::buffer_count(count))
  }

  pub fn timestamp(self) -> ChainBuilder<T, Timestamped<V>> { self.op(ops::timestamp()) }

  // ==== straight to a subscription ==========================================

  /// Sets the handler for values that make it through the chain.
  pub fn next<F>(self, on_next: F) -> ChainSubscribe<T, V>
  where
    F: Fn(V) + Send + Sync + 'static,
  {
    ChainSubscribe::new(self.build()).next(on_next)
  }

  pub fn catch<F>(self, on_error: F) -> ChainSubscribe<T, V>
  where
    F: Fn(RxError) + Send + Sync + 'static,
  {
    ChainSubscribe::new(self.build()).catch(on_error)
  }

  pub fn completed<F>(self, on_completed: F) -> ChainSubscribe<T, V>
  where
    F: Fn(Option<V>) + Send + Sync + 'static,
  {
    ChainSubscribe::new(self.build()).completed(on_completed)
  }

  pub fn disposed<F>(self, on_dispose: F) -> ChainSubscribe<T, V>
  where
    F: Fn() + Send + Sync + 'static,
  {
    ChainSubscribe::new(self.build()).disposed(on_dispose)
  }

  pub fn asynchronous(self, asynchronous: bool) -> ChainSubscribe<T, V> {
    ChainSubscribe::new(self.build()).asynchronous(asynchronous)
  }

  pub fn backpressure(self, strategy: BackpressureStrategy) -> ChainSubscribe<T, V> {
    ChainSubscribe::new(self.build()).backpressure(strategy)
  }
}

/// A finished chain waiting for its subscriber settings.
pub struct ChainSubscribe<T, V> {
  observable: PipeObservable<T, V>,
  subscriber: Subscriber<V>,
}

impl<T, V> ChainSubscribe<T, V>
where
  T: Send + 'static,
  V: Send + 'static,
{
  fn new(observable: PipeObservable<T, V>) -> Self {
    ChainSubscribe { observable, subscriber: Subscriber::new(|_| {}) }
  }

  pub fn next<F>(mut self, on_next: F) -> Self
  where
    F: Fn(V) + Send + Sync + 'static,
  {
    self.subscriber.on_next = Arc::new(on_next);
    self
  }

  pub fn catch<F>(mut self, on_error: F) -> Self
  where
    F: Fn(RxError) + Send + Sync + 'static,
  {
    self.subscriber = self.subscriber.on_error(on_error);
    self
  }

  pub fn completed<F>(mut self, on_completed: F) -> Self
  where
    F: Fn(Option<V>) + Send + Sync + 'static,
  {
    self.subscriber = self.subscriber.on_completed(on_completed);
    self
  }

  pub fn disposed<F>(mut self, on_dispose: F) -> Self
  where
    F: Fn() + Send + Sync + 'static,
  {
    self.subscriber = self.subscriber.on_dispose(on_dispose);
    self
  }

  pub fn asynchronous(mut self, asynchronous: bool) -> Self {
    self.subscriber = self.subscriber.asynchronous(asynchronous);
    self
  }

  pub fn backpressure(mut self, strategy: BackpressureStrategy) -> Self {
    self.subscriber = self.subscriber.backpressure(strategy);
    self
  }

  pub fn subscribe(self) -> Result<Subscription, RxError> {
    self.observable.subscribe_with(self.subscriber)
  }
}
