//! Hot sources that are also sinks.
//!
//! Every subject here is one generic [`Subject`] parameterized by what it
//! retains for late subscribers:
//!
//! | alias                  | retention      | replay on subscribe            |
//! |------------------------|----------------|--------------------------------|
//! | [`SingleValueSubject`] | [`Latest`]     | the latest value, if any       |
//! | [`BehaviorSubject`]    | [`Current`]    | the current value              |
//! | [`PublishSubject`]     | [`Nothing`]    | nothing                        |
//! | [`ReplaySubject`]      | [`History`]    | seed values, then every value  |
//! | [`Flowable`]           | [`Sequence`]   | the fixed sequence             |
//!
//! A subject's emissions are serialized: concurrent `next` calls from
//! different threads take turns, while a callback calling `next` again on
//! the same thread is allowed through.

use std::{fmt, sync::Arc};

use parking_lot::{Mutex, ReentrantMutex};

use crate::{
  error::RxError,
  observable::{ChainBuilder, PipeObservable, Publisher, Subscribable},
  pipe::IntoPipe,
  subscriber::Subscriber,
  subscription::Subscription,
};

mod retention;

pub use crate::observable::Flowable;
pub use retention::{Current, History, Latest, Nothing, Record, Retention, Sequence};

pub type SingleValueSubject<T> = Subject<T, Latest<T>>;
pub type BehaviorSubject<T> = Subject<T, Current<T>>;
pub type PublishSubject<T> = Subject<T, Nothing>;
pub type ReplaySubject<T> = Subject<T, History<T>>;

pub struct Subject<T, R> {
  pub(crate) publisher: Publisher<T>,
  pub(crate) retained: Arc<Mutex<R>>,
  emitting: Arc<ReentrantMutex<()>>,
}

impl<T, R> Clone for Subject<T, R> {
  fn clone(&self) -> Self {
    Subject {
      publisher: self.publisher.clone(),
      retained: self.retained.clone(),
      emitting: self.emitting.clone(),
    }
  }
}

impl<T, R> Subject<T, R>
where
  T: Clone + Send + 'static,
  R: Retention<T>,
{
  pub(crate) fn with_retention(retained: R) -> Self {
    Subject {
      publisher: Publisher::new(),
      retained: Arc::new(Mutex::new(retained)),
      emitting: Arc::new(ReentrantMutex::new(())),
    }
  }

  /// Emits every retained value to every current subscriber.
  pub(crate) fn emit_retained(&self) {
    let _emitting = self.emitting.lock();
    let values = self.retained.lock().replay();
    for value in values {
      self.publisher.notify_all(value);
    }
  }

  /// Delivers `err` to every subscriber.
  pub fn on_error(&self, err: RxError) { self.publisher.on_error(err) }

  /// Signals completion to every subscriber and then disposes the subject.
  pub fn on_completed(&self, value: Option<T>) {
    let _emitting = self.emitting.lock();
    self.publisher.on_completed(value);
    self.retained.lock().clear();
  }

  /// Fires every dispose handler, drops every subscription and forgets the
  /// retained values.
  pub fn dispose(&self) {
    let _emitting = self.emitting.lock();
    self.publisher.dispose();
    self.retained.lock().clear();
  }

  pub fn pause_all(&self) { self.publisher.pause_all() }

  pub fn resume_paused(&self) { self.publisher.resume_paused() }

  pub fn subscriber_count(&self) -> usize { self.publisher.subscriber_count() }

  /// Lazily applies `ops` to this subject's values for each subscriber.
  ///
  /// `ops` is a single operator, a [`Pipe`](crate::pipe::Pipe) or a tuple of
  /// up to fourteen operators whose types line up.
  pub fn pipe<M, P>(&self, ops: P) -> PipeObservable<T, P::Out>
  where
    P: IntoPipe<T, M>,
    P::Out: Send + 'static,
  {
    PipeObservable::new(Arc::new(self.clone()), ops.into_pipe())
  }

  /// Starts a fluent operator chain.
  pub fn chain(&self) -> ChainBuilder<T, T> { ChainBuilder::new(Arc::new(self.clone())) }
}

impl<T, R> Subject<T, R>
where
  T: Clone + Send + 'static,
  R: Record<T>,
{
  /// Retains `value` as this subject's policy dictates and emits it to every
  /// subscriber.
  pub fn next(&self, value: T) {
    let _emitting = self.emitting.lock();
    self.retained.lock().record(&value);
    self.publisher.notify_all(value);
  }
}

impl<T, R> Subscribable<T> for Subject<T, R>
where
  T: Clone + Send + 'static,
  R: Retention<T>,
{
  fn subscribe_with(&self, subscriber: Subscriber<T>) -> Result<Subscription, RxError> {
    let _emitting = self.emitting.lock();
    let subscription = self.publisher.register(subscriber)?;
    let replay = self.retained.lock().replay();
    for value in replay {
      subscription.on_next(value);
    }
    Ok(subscription.into())
  }
}

impl<T, R> fmt::Debug for Subject<T, R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subject").field("retention", &std::any::type_name::<R>()).finish()
  }
}

// ==== constructors ==========================================================

impl<T: Clone + Send + 'static> Subject<T, Latest<T>> {
  pub fn new(value: Option<T>) -> Self { Self::with_retention(Latest(value)) }

  pub fn latest(&self) -> Option<T> { self.retained.lock().0.clone() }
}

impl<T: Clone + Send + 'static> Subject<T, Current<T>> {
  pub fn new(value: T) -> Self { Self::with_retention(Current(Some(value))) }

  /// The current value; `None` only after the subject was disposed.
  pub fn value(&self) -> Option<T> { self.retained.lock().0.clone() }

  /// Same as [`value`](Self::value).
  pub fn latest(&self) -> Option<T> { self.value() }
}

impl<T: Clone + Send + 'static> Subject<T, Nothing> {
  pub fn new() -> Self { Self::with_retention(Nothing) }

  /// The last value emitted, even though it is never replayed.
  pub fn latest(&self) -> Option<T> { self.publisher.last_value() }
}

impl<T: Clone + Send + 'static> Default for Subject<T, Nothing> {
  fn default() -> Self { Self::new() }
}

impl<T: Clone + Send + 'static> Subject<T, History<T>> {
  /// A replay subject that replays `seed` before anything it records.
  pub fn new<I: IntoIterator<Item = T>>(seed: I) -> Self {
    Self::with_retention(History::new(seed.into_iter().collect()))
  }

  pub fn empty() -> Self { Self::new(vec![]) }

  /// Everything a new subscriber would be replayed.
  pub fn values(&self) -> Vec<T> { self.retained.lock().replay() }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex as StdMutex;

  use super::*;

  fn collector<T: Send + 'static>() -> (Arc<StdMutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
    let values = Arc::new(StdMutex::new(vec![]));
    let c_values = values.clone();
    (values, move |v| c_values.lock().unwrap().push(v))
  }

  #[test]
  fn single_value_replays_latest() {
    let subject = SingleValueSubject::new(Some("1".to_owned()));
    let (values, f) = collector();
    subject.subscribe(f);
    subject.next("2".to_owned());
    assert_eq!(*values.lock().unwrap(), vec!["1", "2"]);

    let (late, f) = collector();
    subject.subscribe(f);
    assert_eq!(*late.lock().unwrap(), vec!["2"]);
    assert_eq!(subject.latest().as_deref(), Some("2"));
  }

  #[test]
  fn latest_on_behavior_and_publish() {
    let behavior = BehaviorSubject::new(0);
    assert_eq!(behavior.latest(), Some(0));
    behavior.next(4);
    assert_eq!(behavior.latest(), Some(4));

    let publish = PublishSubject::new();
    assert_eq!(publish.latest(), None);
    publish.next("x");
    let (values, f) = collector();
    publish.subscribe(f);
    assert_eq!(publish.latest(), Some("x"));
    assert!(values.lock().unwrap().is_empty());
  }

  #[test]
  fn panicking_subscribers_do_not_block_delivery() {
    let subject = ReplaySubject::new([1]);
    subject
      .subscribe_with(
        Subscriber::new(|v: i32| panic!("next {v}")).on_error(|e| panic!("on_error: {e}")),
      )
      .unwrap();
    subject.subscribe(|v: i32| if v > 0 { panic!("unhandled {v}") });
    let (values, f) = collector();
    subject.subscribe(f);
    (2..=4).for_each(|v| subject.next(v));
    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3, 4]);
  }

  #[test]
  fn single_value_without_initial_replays_nothing() {
    let subject = SingleValueSubject::<i32>::new(None);
    let (values, f) = collector();
    subject.subscribe(f);
    assert!(values.lock().unwrap().is_empty());
    assert_eq!(subject.latest(), None);
  }

  #[test]
  fn behavior_always_has_a_value() {
    let subject = BehaviorSubject::new(1);
    let (values, f) = collector();
    subject.subscribe(f);
    subject.next(2);
    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
    assert_eq!(subject.value(), Some(2));
  }

  #[test]
  fn publish_never_replays() {
    let subject = PublishSubject::new();
    subject.next(1);
    let (values, f) = collector();
    subject.subscribe(f);
    subject.next(2);
    assert_eq!(*values.lock().unwrap(), vec![2]);
  }

  #[test]
  fn replay_emits_seed_then_history() {
    let subject = ReplaySubject::new(["A", "B", "C"]);
    let (first, f) = collector();
    subject.subscribe(f);
    subject.next("1");
    subject.next("2");
    let (second, f) = collector();
    subject.subscribe(f);
    assert_eq!(*first.lock().unwrap(), vec!["A", "B", "C", "1", "2"]);
    assert_eq!(*second.lock().unwrap(), vec!["A", "B", "C", "1", "2"]);
  }

  #[test]
  fn dispose_forgets_retained_values() {
    let subject = ReplaySubject::new([1, 2]);
    let (values, f) = collector();
    let sub = subject.subscribe(f);
    subject.dispose();
    assert!(sub.is_cancelled());
    assert!(subject.values().is_empty());
    subject.next(3);
    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
    assert_eq!(subject.values(), vec![3]);
  }

  #[test]
  fn cancel_keeps_other_subscribers() {
    let subject = PublishSubject::new();
    let (a, f) = collector();
    let sub_a = subject.subscribe(f);
    let (b, f) = collector();
    subject.subscribe(f);
    subject.next(1);
    sub_a.cancel();
    subject.next(2);
    assert_eq!(*a.lock().unwrap(), vec![1]);
    assert_eq!(*b.lock().unwrap(), vec![1, 2]);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[test]
  fn reentrant_next_from_a_callback() {
    let subject = PublishSubject::new();
    let inner = subject.clone();
    let (values, f) = collector();
    subject.subscribe(move |v: i32| {
      f(v);
      if v == 1 {
        inner.next(2);
      }
    });
    subject.next(1);
    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn concurrent_emitters_are_serialized() {
    let subject = PublishSubject::new();
    let (values, f) = collector();
    subject.subscribe(f);
    let handles: Vec<_> = (0..4)
      .map(|t| {
        let subject = subject.clone();
        std::thread::spawn(move || (0..100).for_each(|i| subject.next(t * 100 + i)))
      })
      .collect();
    handles.into_iter().for_each(|h| h.join().unwrap());
    let mut values = values.lock().unwrap().clone();
    assert_eq!(values.len(), 400);
    values.sort_unstable();
    assert_eq!(values, (0..400).collect::<Vec<_>>());
  }

  #[test]
  fn on_error_reaches_subscribers() {
    let subject = PublishSubject::<i32>::new();
    let (errors, f) = collector();
    subject.subscribe_with(Subscriber::new(|_| {}).on_error(f)).unwrap();
    subject.on_error(RxError::missed_value());
    assert_eq!(*errors.lock().unwrap(), vec![RxError::missed_value()]);
  }

  #[test]
  fn completion_disposes_the_subject() {
    let subject = SingleValueSubject::new(Some(1));
    let (completed, f) = collector();
    let sub = subject.subscribe_with(Subscriber::new(|_| {}).on_completed(f)).unwrap();
    subject.on_completed(Some(5));
    assert_eq!(*completed.lock().unwrap(), vec![Some(5)]);
    assert!(sub.is_cancelled());
    assert_eq!(subject.latest(), None);
  }
}
