use std::{cell::RefCell, collections::VecDeque, sync::Arc};

use parking_lot::{Mutex, ReentrantMutex};
use smallvec::SmallVec;

use super::{chain::ChainBuilder, Subscribable};
use crate::{
  error::RxError,
  pipe::{IntoPipe, Pipe},
  subscriber::{CompletedHandler, NextHandler, Subscriber},
  subscription::Subscription,
};

/// A source seen through a pipe.
///
/// Nothing runs until someone subscribes. Each subscription gets its own copy
/// of the pipe, so stateful operators never leak between subscribers, and
/// the handle it gets back controls the subscription on the underlying
/// source.
pub struct PipeObservable<T, V> {
  source: Arc<dyn Subscribable<T>>,
  template: Arc<Mutex<Pipe<T, V>>>,
}

impl<T, V> Clone for PipeObservable<T, V> {
  fn clone(&self) -> Self {
    PipeObservable { source: self.source.clone(), template: self.template.clone() }
  }
}

impl<T, V> PipeObservable<T, V>
where
  T: Send + 'static,
  V: Send + 'static,
{
  pub fn new(source: Arc<dyn Subscribable<T>>, pipe: Pipe<T, V>) -> Self {
    PipeObservable { source, template: Arc::new(Mutex::new(pipe)) }
  }

  /// Appends `ops` to this pipe. The result still subscribes straight to the
  /// original source.
  pub fn pipe<M, P>(&self, ops: P) -> PipeObservable<T, P::Out>
  where
    P: IntoPipe<V, M>,
    P::Out: Send + 'static,
  {
    let pipe = self.template.lock().clone().then(ops.into_pipe());
    PipeObservable::new(self.source.clone(), pipe)
  }

  /// Continues this pipe with a fluent operator chain.
  pub fn chain(&self) -> ChainBuilder<T, V> {
    ChainBuilder::from_pipe(self.source.clone(), self.template.lock().clone())
  }
}

impl<T, V> Subscribable<V> for PipeObservable<T, V>
where
  T: Send + 'static,
  V: Send + 'static,
{
  fn subscribe_with(&self, subscriber: Subscriber<V>) -> Result<Subscription, RxError> {
    subscriber.validate()?;
    let pipe = Arc::new(PipeCell::new(self.template.lock().clone()));
    let Subscriber { on_next, on_error, on_completed, on_dispose, asynchronous, backpressure } =
      subscriber;

    let next_pipe = pipe.clone();
    let c_on_next = on_next.clone();
    let piped_next: NextHandler<T> = Arc::new(move |value: T| {
      let (head, deferred) = next_pipe.run(value);
      head.into_iter().chain(deferred).for_each(|piped| c_on_next(piped));
    });
    let piped_completed = on_completed.map(|on_completed| {
      let handler: CompletedHandler<T> = Arc::new(move |value: Option<T>| {
        let Some(value) = value else { return };
        let (head, deferred) = pipe.run(value);
        deferred.into_iter().for_each(|piped| on_next(piped));
        if let Some(piped) = head {
          on_completed(Some(piped));
        }
      });
      handler
    });

    self.source.subscribe_with(Subscriber {
      on_next: piped_next,
      on_error,
      on_completed: piped_completed,
      on_dispose,
      asynchronous,
      backpressure,
    })
  }
}

/// The pipe of one subscription.
///
/// Threads take turns on the lock. Operators run with the pipe taken out of
/// its slot, so a value arriving on the same thread meanwhile (an operator
/// publishing back into its own source) is queued and runs once the current
/// value is through. Downstream handlers run after the lock is released.
struct PipeCell<T, V> {
  state: ReentrantMutex<RefCell<PipeState<T, V>>>,
}

struct PipeState<T, V> {
  pipe: Option<Pipe<T, V>>,
  queued: VecDeque<T>,
}

/// Puts the pipe back into its slot, even when an operator panics.
struct Running<'a, T, V> {
  state: &'a RefCell<PipeState<T, V>>,
  pipe: Option<Pipe<T, V>>,
}

impl<T, V> Drop for Running<'_, T, V> {
  fn drop(&mut self) {
    if let Some(pipe) = self.pipe.take() {
      self.state.borrow_mut().pipe = Some(pipe);
    }
  }
}

impl<T: Send + 'static, V: Send + 'static> PipeCell<T, V> {
  fn new(pipe: Pipe<T, V>) -> Self {
    let state = PipeState { pipe: Some(pipe), queued: VecDeque::new() };
    PipeCell { state: ReentrantMutex::new(RefCell::new(state)) }
  }

  /// Runs `value` through the pipe, followed by anything queued meanwhile.
  /// Returns what came out for `value` and, separately, for the queued ones.
  fn run(&self, value: T) -> (Option<V>, SmallVec<[V; 1]>) {
    let guard = self.state.lock();
    let state: &RefCell<PipeState<T, V>> = &guard;
    let taken = state.borrow_mut().pipe.take();
    let Some(pipe) = taken else {
      state.borrow_mut().queued.push_back(value);
      return (None, SmallVec::new());
    };
    let mut running = Running { state, pipe: Some(pipe) };

    let head = running.pipe.as_mut().and_then(|pipe| pipe.apply(value));
    let mut deferred = SmallVec::new();
    loop {
      let queued = state.borrow_mut().queued.pop_front();
      let Some(value) = queued else { break };
      if let Some(piped) = running.pipe.as_mut().and_then(|pipe| pipe.apply(value)) {
        deferred.push(piped);
      }
    }
    (head, deferred)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex as StdMutex;

  use super::*;
  use crate::{ops, prelude::*};

  fn collector<T: Send + 'static>() -> (Arc<StdMutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
    let values = Arc::new(StdMutex::new(vec![]));
    let c_values = values.clone();
    (values, move |v| c_values.lock().unwrap().push(v))
  }

  #[test]
  fn applies_ops_in_order() {
    let subject = ReplaySubject::new(1..=6);
    let (values, f) = collector();
    subject.pipe((ops::filter(|v: &i32| v % 2 == 0), ops::map(|v: i32| v * 10))).subscribe(f);
    assert_eq!(*values.lock().unwrap(), vec![20, 40, 60]);
  }

  #[test]
  fn each_subscription_has_its_own_state() {
    let subject = PublishSubject::new();
    let piped = subject.pipe(ops::take(2));
    let (a, f) = collector();
    piped.subscribe(f);
    subject.next(1);
    subject.next(2);
    subject.next(3);
    let (b, f) = collector();
    piped.subscribe(f);
    subject.next(4);
    subject.next(5);
    subject.next(6);
    assert_eq!(*a.lock().unwrap(), vec![1, 2]);
    assert_eq!(*b.lock().unwrap(), vec![4, 5]);
  }

  #[test]
  fn repiping_extends_the_chain() {
    let subject = ReplaySubject::new([1, 2, 3, 4]);
    let (values, f) = collector();
    subject.pipe(ops::map(|v: i32| v + 1)).pipe(ops::filter(|v: &i32| *v > 3)).subscribe(f);
    assert_eq!(*values.lock().unwrap(), vec![4, 5]);
  }

  #[test]
  fn cancel_reaches_the_source() {
    let subject = PublishSubject::<i32>::new();
    let (values, f) = collector();
    let sub = subject.pipe(ops::map(|v: i32| v)).subscribe(f);
    assert_eq!(subject.subscriber_count(), 1);
    sub.cancel();
    assert_eq!(subject.subscriber_count(), 0);
    subject.next(1);
    assert!(values.lock().unwrap().is_empty());
  }

  #[test]
  fn completion_value_goes_through_the_pipe() {
    let subject = PublishSubject::<i32>::new();
    let (completed, f) = collector();
    subject
      .pipe(ops::filter(|v: &i32| *v > 0))
      .subscribe_with(Subscriber::new(|_| {}).on_completed(f))
      .unwrap();
    subject.on_completed(Some(-1));
    assert!(completed.lock().unwrap().is_empty());

    let subject = PublishSubject::<i32>::new();
    let (completed, f) = collector();
    subject
      .pipe(ops::map(|v: i32| v * 2))
      .subscribe_with(Subscriber::new(|_| {}).on_completed(f))
      .unwrap();
    subject.on_completed(None);
    subject.on_completed(Some(4));
    assert!(completed.lock().unwrap().is_empty());
  }

  #[test]
  fn completion_with_value_is_mapped() {
    let subject = PublishSubject::<i32>::new();
    let (completed, f) = collector();
    subject
      .pipe(ops::map(|v: i32| v * 2))
      .subscribe_with(Subscriber::new(|_| {}).on_completed(f))
      .unwrap();
    subject.on_completed(Some(4));
    assert_eq!(*completed.lock().unwrap(), vec![Some(8)]);
  }

  #[test]
  fn operator_can_publish_into_its_own_source() {
    let subject = PublishSubject::new();
    let inner = subject.clone();
    let (values, f) = collector();
    subject
      .pipe(ops::tap(move |v: &i32| {
        if *v == 1 {
          inner.next(2);
        }
      }))
      .subscribe(f);

    let (tx, rx) = std::sync::mpsc::channel();
    let publisher = subject.clone();
    std::thread::spawn(move || {
      publisher.next(1);
      let _ = tx.send(());
    });
    assert!(rx.recv_timeout(std::time::Duration::from_secs(3)).is_ok());
    assert_eq!(*values.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn pipe_survives_a_panicking_operator() {
    let subject = PublishSubject::new();
    let (values, f) = collector();
    let (errors, on_error) = collector();
    subject
      .pipe(ops::map(|v: i32| if v == 2 { panic!("two") } else { v }))
      .subscribe_with(Subscriber::new(f).on_error(on_error))
      .unwrap();
    (1..=3).for_each(|v| subject.next(v));
    assert_eq!(*values.lock().unwrap(), vec![1, 3]);
    assert_eq!(*errors.lock().unwrap(), vec![RxError::Panicked("two".into())]);
  }

  #[test]
  fn backpressure_mismatch_is_reported() {
    let subject = PublishSubject::<i32>::new();
    let result = subject
      .pipe(ops::map(|v: i32| v))
      .subscribe_with(Subscriber::new(|_| {}).backpressure(BackpressureStrategy::Drop));
    assert_eq!(result.unwrap_err(), RxError::BackpressureMismatch);
  }

  #[test]
  fn panicking_operator_reaches_on_error() {
    let subject = PublishSubject::<i32>::new();
    let (errors, f) = collector();
    subject
      .pipe(ops::map(|v: i32| if v == 0 { panic!("zero") } else { 10 / v }))
      .subscribe_with(Subscriber::new(|_| {}).on_error(f))
      .unwrap();
    subject.next(0);
    subject.next(5);
    assert_eq!(*errors.lock().unwrap(), vec![RxError::Panicked("zero".into())]);
  }
}
