//! The operator catalogue.
//!
//! Operators come in two families. Filtering operators hand back the value
//! they were given, or nothing; mapping operators hand back something new.
//! Either kind may keep state between values (`take` counts, `distinct`
//! remembers), so each subscription works on its own
//! [`duplicate`](Operator::duplicate).
//!
//! Build operators with the functions in this module and hand them to
//! `pipe`, alone or in a tuple:
//!
//! ```rust
//! use rxpipe::prelude::*;
//!
//! let subject = ReplaySubject::new(1..=10);
//! subject
//!   .pipe((ops::filter(|v: &i32| v % 2 == 0), ops::map(|v: i32| v * 10)))
//!   .subscribe(|v| println!("{v}"));
//! // Prints: 20 40 60 80 100
//! ```

use std::{hash::Hash, sync::Arc, time::Duration};

use crate::error::RxError;

pub mod buffer_count;
pub mod buffer_time;
pub mod debounce;
pub mod distinct;
pub mod distinct_until_changed;
pub mod element_at;
pub mod filter;
pub mod map;
pub mod reduce;
pub mod scan;
pub mod skip;
pub mod take;
pub mod take_while;
pub mod throttle;
pub mod timestamp;

pub use buffer_count::BufferCount;
pub use buffer_time::Buffer;
pub use debounce::Debounce;
pub use distinct::Distinct;
pub use distinct_until_changed::DistinctUntilChanged;
pub use element_at::ElementAt;
pub use filter::{Filter, Ignore, IgnoreAll};
pub use map::{Map, MapTo, Tap};
pub use reduce::Reduce;
pub use scan::Scan;
pub use skip::{Skip, SkipUntil, SkipWhile};
pub use take::Take;
pub use take_while::{TakeUntil, TakeWhile};
pub use throttle::Throttle;
pub use timestamp::{Timestamp, Timestamped};

/// A stage of a pipe.
pub trait Operator: Send + 'static {
  type In;
  type Out;

  /// Processes one value. `None` means the value stops here.
  fn apply(&mut self, value: Self::In) -> Option<Self::Out>;

  /// Resets any state to what the operator was built with.
  fn init(&mut self) {}

  /// A fresh copy in its initial state.
  fn duplicate(&self) -> Self
  where
    Self: Sized;
}

/// Object-safe face of [`Operator`], so pipes can hold any operator behind a
/// box.
pub trait DynOperator<In, Out>: Send {
  fn box_apply(&mut self, value: In) -> Option<Out>;

  fn box_init(&mut self);

  fn box_duplicate(&self) -> Box<dyn DynOperator<In, Out>>;
}

impl<O: Operator> DynOperator<O::In, O::Out> for O {
  #[inline]
  fn box_apply(&mut self, value: O::In) -> Option<O::Out> { self.apply(value) }

  #[inline]
  fn box_init(&mut self) { self.init() }

  fn box_duplicate(&self) -> Box<dyn DynOperator<O::In, O::Out>> { Box::new(self.duplicate()) }
}

pub(crate) type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

// ==== filtering =============================================================

/// Lets through values matching `predicate`.
pub fn filter<T, F>(predicate: F) -> Filter<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  Filter::new(Arc::new(predicate))
}

/// Lets through values *not* matching `predicate`.
pub fn ignore<T, F>(predicate: F) -> Ignore<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  Ignore::new(Arc::new(predicate))
}

/// Lets nothing through.
pub fn ignore_all<T>() -> IgnoreAll<T> { IgnoreAll::default() }

/// Lets through the first `count` values.
pub fn take<T>(count: usize) -> Take<T> { Take::new(count) }

/// Lets values through while they match `predicate`; closes for good on the
/// first one that doesn't, which passes too when `include_stop` is set.
pub fn take_while<T, F>(predicate: F, include_stop: bool) -> TakeWhile<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  TakeWhile::new(Arc::new(predicate), include_stop)
}

/// Lets values through until one matches `predicate`; closes for good on it,
/// letting it pass when `include_stop` is set.
pub fn take_until<T, F>(predicate: F, include_stop: bool) -> TakeUntil<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  TakeUntil::new(Arc::new(predicate), include_stop)
}

/// Blocks the first `count` values.
pub fn skip<T>(count: usize) -> Skip<T> { Skip::new(count) }

/// Blocks values while they match `predicate`; opens for good on the first
/// one that doesn't.
pub fn skip_while<T, F>(predicate: F) -> SkipWhile<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  SkipWhile::new(Arc::new(predicate))
}

/// Blocks values until one matches `predicate`; opens for good on it.
pub fn skip_until<T, F>(predicate: F) -> SkipUntil<T>
where
  F: Fn(&T) -> bool + Send + Sync + 'static,
{
  SkipUntil::new(Arc::new(predicate))
}

/// Lets the first value through, then only values that change the
/// reduction of the previous passed value and the new one.
pub fn reduce<T, F>(reducer: F) -> Reduce<T>
where
  T: Clone + PartialEq,
  F: Fn(T, T) -> T + Send + Sync + 'static,
{
  Reduce::new(Arc::new(reducer))
}

/// Lets through each value not seen before.
pub fn distinct<T>() -> Distinct<T, T>
where
  T: Clone + Eq + Hash + 'static,
{
  Distinct::new(Arc::new(T::clone))
}

/// Lets through each value whose key was not seen before.
pub fn distinct_by<T, K, F>(key: F) -> Distinct<T, K>
where
  K: Eq + Hash,
  F: Fn(&T) -> K + Send + Sync + 'static,
{
  Distinct::new(Arc::new(key))
}

/// Lets through values that differ from the previous one.
pub fn distinct_until_changed<T>() -> DistinctUntilChanged<T, T>
where
  T: Clone + PartialEq + 'static,
{
  DistinctUntilChanged::new(Arc::new(T::clone))
}

/// Lets through values whose key differs from the previous value's key.
pub fn distinct_until_changed_by<T, K, F>(key: F) -> DistinctUntilChanged<T, K>
where
  K: PartialEq,
  F: Fn(&T) -> K + Send + Sync + 'static,
{
  DistinctUntilChanged::new(Arc::new(key))
}

/// Lets a value through only if at least `span` passed since the last value
/// that got through.
///
/// This is a leading-edge gate: nothing is held back to be emitted later.
pub fn debounce<T>(span: Duration) -> Debounce<T> { Debounce::new(span) }

/// Lets a value through only if at least `span` passed since the last value
/// that got through.
pub fn throttle<T>(span: Duration) -> Throttle<T> { Throttle::new(span) }

/// Lets through only the value at position `index`.
pub fn element_at<T>(index: i64) -> Result<ElementAt<T>, RxError> {
  let index = usize::try_from(index).map_err(|_| RxError::NegativeIndex(index))?;
  Ok(ElementAt::new(index))
}

// ==== mapping ===============================================================

pub fn map<T, V, F>(mapper: F) -> Map<T, V>
where
  F: Fn(T) -> V + Send + Sync + 'static,
{
  Map::new(Arc::new(mapper))
}

/// Replaces every value with `value`.
pub fn map_to<T, V: Clone>(value: V) -> MapTo<T, V> { MapTo::new(value) }

/// Runs `action` on every value and passes it on unchanged.
pub fn tap<T, F>(action: F) -> Tap<T>
where
  F: Fn(&T) + Send + Sync + 'static,
{
  Tap::new(Arc::new(action))
}

/// Emits every intermediate accumulation, starting from `seed`.
pub fn scan<T, A, F>(accumulator: F, seed: A) -> Scan<T, A>
where
  A: Clone,
  F: Fn(A, T) -> A + Send + Sync + 'static,
{
  Scan::new(Arc::new(accumulator), seed)
}

/// Collects values and emits them as a batch once `span` has passed since
/// the batch started.
pub fn buffer<T>(span: Duration) -> Buffer<T> { Buffer::new(span) }

/// Collects values and emits them in batches of `count`.
pub fn buffer_count<T>(count: usize) -> BufferCount<T> { BufferCount::new(count) }

/// Pairs every value with the wall-clock time it went through.
pub fn timestamp<T>() -> Timestamp<T> { Timestamp::default() }
