//! End-to-end behaviour across subjects, pipes, dispatch and eventing.

use std::{
  sync::{Arc, Mutex},
  thread,
  time::Duration,
};

use futures::{executor::block_on, StreamExt};
use rxpipe::prelude::*;

type Values<T> = Arc<Mutex<Vec<T>>>;

fn collector<T: Send + 'static>() -> (Values<T>, impl Fn(T) + Clone + Send + Sync + 'static) {
  let values = Arc::new(Mutex::new(vec![]));
  let c_values = values.clone();
  (values, move |v| c_values.lock().unwrap().push(v))
}

const FEED: [i32; 14] = [1, 1, 2, 3, 10, 10, 11, 11, 12, 13, 14, 14, 15, 16];

#[test]
fn batched_pipeline_over_a_single_value_subject() {
  let subject = SingleValueSubject::new(Some(1));
  let (batches, f) = collector();
  subject
    .pipe((
      ops::distinct_until_changed(),
      ops::skip(2),
      ops::filter(|v: &i32| *v > 10),
      ops::buffer_count(5),
    ))
    .subscribe(f);
  FEED.into_iter().for_each(|v| subject.next(v));

  assert_eq!(*batches.lock().unwrap(), vec![vec![11, 12, 13, 14, 15]]);
}

#[test]
fn batched_pipeline_through_the_chain_builder() {
  let subject = SingleValueSubject::new(Some(1));
  let (batches, f) = collector();
  let (errors, on_error) = collector();
  subject
    .chain()
    .distinct_until_changed()
    .skip(2)
    .filter(|v| *v > 10)
    .buffer_count(5)
    .catch(on_error)
    .next(f)
    .subscribe()
    .unwrap();
  FEED.into_iter().for_each(|v| subject.next(v));

  assert_eq!(*batches.lock().unwrap(), vec![vec![11, 12, 13, 14, 15]]);
  assert!(errors.lock().unwrap().is_empty());
}

#[test]
fn replay_comes_before_live_values() {
  let subject = ReplaySubject::new(["a", "b"]);
  subject.next("c");
  let (values, f) = collector();
  subject.subscribe(f);
  subject.next("d");

  assert_eq!(*values.lock().unwrap(), vec!["a", "b", "c", "d"]);
}

#[test]
fn filter_then_map_per_subscription() {
  let input: Vec<i32> = (1..=20).collect();
  let expected: Vec<i32> = input.iter().filter(|v| *v % 3 == 0).map(|v| v * v).collect();
  let subject = PublishSubject::new();
  let piped = subject.pipe((ops::filter(|v: &i32| v % 3 == 0), ops::map(|v: i32| v * v)));
  let (a, fa) = collector();
  let (b, fb) = collector();
  piped.subscribe(fa);
  piped.subscribe(fb);
  input.iter().for_each(|v| subject.next(*v));

  assert_eq!(*a.lock().unwrap(), expected);
  assert_eq!(*b.lock().unwrap(), expected);
}

#[test]
fn buffer_count_emits_only_full_batches() {
  let flowable = observable::of(0..23);
  let (batches, f) = collector();
  flowable.pipe(ops::buffer_count(5)).subscribe(f);

  let batches = batches.lock().unwrap();
  assert_eq!(batches.len(), 23 / 5);
  assert!(batches.iter().all(|b: &Vec<i32>| b.len() == 5));
}

#[test]
fn take_is_counted_per_subscription() {
  let subject = PublishSubject::new();
  let piped = subject.pipe(ops::take(3));
  let (a, fa) = collector();
  piped.subscribe(fa);
  (0..2).for_each(|v| subject.next(v));
  let (b, fb) = collector();
  piped.subscribe(fb);
  (2..10).for_each(|v| subject.next(v));

  assert_eq!(*a.lock().unwrap(), vec![0, 1, 2]);
  assert_eq!(*b.lock().unwrap(), vec![2, 3, 4]);
}

#[test]
fn paused_subscription_misses_values_without_replay() {
  let subject = PublishSubject::new();
  let (values, f) = collector();
  let sub = subject.subscribe(f);
  subject.next(1);
  sub.pause();
  (2..6).for_each(|v| subject.next(v));
  sub.resume();
  subject.next(6);

  assert_eq!(*values.lock().unwrap(), vec![1, 6]);
}

#[test]
fn drop_strategy_discards_while_busy() {
  let subject = SingleValueSubject::new(Some("test"));
  let (values, f) = collector();
  let (errors, on_error) = collector::<RxError>();
  subject
    .subscribe_with(
      Subscriber::new(move |v| {
        thread::sleep(Duration::from_millis(300));
        f(v)
      })
      .on_error(on_error)
      .asynchronous(true)
      .backpressure(BackpressureStrategy::Drop),
    )
    .unwrap();
  subject.next("test2");
  thread::sleep(Duration::from_millis(800));

  assert_eq!(*values.lock().unwrap(), vec!["test"]);
  assert!(errors.lock().unwrap().is_empty());
}

#[test]
fn error_strategy_reports_missed_values() {
  let subject = SingleValueSubject::new(Some("test"));
  let (values, f) = collector();
  let (errors, on_error) = collector::<RxError>();
  subject
    .subscribe_with(
      Subscriber::new(move |v| {
        thread::sleep(Duration::from_millis(300));
        f(v)
      })
      .on_error(on_error)
      .asynchronous(true)
      .backpressure(BackpressureStrategy::Error),
    )
    .unwrap();
  subject.next("test2");
  subject.next("test3");
  thread::sleep(Duration::from_millis(800));

  assert_eq!(*values.lock().unwrap(), vec!["test"]);
  let errors = errors.lock().unwrap();
  assert_eq!(errors.len(), 2);
  assert!(errors.iter().all(|e| e.is_backpressure() && e.to_string() == "Missed value"));
}

#[test]
fn synchronous_backpressure_is_rejected_up_front() {
  let subject = PublishSubject::<i32>::new();
  let result =
    subject.subscribe_with(Subscriber::new(|_| {}).backpressure(BackpressureStrategy::Drop));

  assert_eq!(result.unwrap_err(), RxError::BackpressureMismatch);
  assert_eq!(subject.subscriber_count(), 0);
}

#[test]
fn range_and_defer_are_cold() {
  let (values, f) = collector();
  observable::range(5, 3).unwrap().pipe(ops::map(|v: i64| v * 2)).subscribe(f);
  assert_eq!(*values.lock().unwrap(), vec![10, 12, 14]);
  assert_eq!(observable::range(0, -1).unwrap_err(), RxError::NegativeCount(-1));

  let calls = Arc::new(Mutex::new(0));
  let c_calls = calls.clone();
  let deferred: observable::Defer<i32, _> = observable::defer(move || {
    *c_calls.lock().unwrap() += 1;
    Ok(observable::of([1, 2]))
  });
  let (values, f) = collector();
  deferred.subscribe(f.clone());
  deferred.subscribe(f);
  assert_eq!(*calls.lock().unwrap(), 2);
  assert_eq!(*values.lock().unwrap(), vec![1, 2, 1, 2]);
}

#[test]
fn stream_collects_until_completion() {
  let subject = ReplaySubject::new([1, 2]);
  let stream = subject.pipe(ops::map(|v: i32| v * 10)).into_stream();
  subject.next(3);
  subject.on_completed(None);

  assert_eq!(block_on(stream.collect::<Vec<_>>()), vec![10, 20, 30]);
}

#[cfg(feature = "eventing")]
#[test]
fn events_are_shared_by_type_and_name() {
  #[derive(Clone, Debug, PartialEq)]
  struct OrderPlaced(u32);

  let (values, f) = collector();
  event::<OrderPlaced>().pipe(ops::filter(|o: &OrderPlaced| o.0 > 1)).subscribe(f);
  event::<OrderPlaced>().publish(OrderPlaced(1));
  event::<OrderPlaced>().publish(OrderPlaced(2));
  named_event::<OrderPlaced>("archive").publish(OrderPlaced(3));

  assert_eq!(*values.lock().unwrap(), vec![OrderPlaced(2)]);
  assert!(events().has_event::<OrderPlaced>());
  events().clear_event::<OrderPlaced>();
  assert!(!events().has_event::<OrderPlaced>());
}
