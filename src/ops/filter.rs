use std::marker::PhantomData;

use super::{Operator, Predicate};

/// Emit only those values that pass a predicate test.
///
/// # Example
///
/// ```
/// use rxpipe::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let coll = Arc::new(Mutex::new(vec![]));
/// let coll_clone = coll.clone();
///
/// observable::of(0..10)
///   .pipe(ops::filter(|v: &i32| *v % 2 == 0))
///   .subscribe(move |v| coll_clone.lock().unwrap().push(v));
///
/// // only even numbers received.
/// assert_eq!(*coll.lock().unwrap(), vec![0, 2, 4, 6, 8]);
/// ```
pub struct Filter<T> {
  predicate: Predicate<T>,
}

impl<T> Filter<T> {
  pub(crate) fn new(predicate: Predicate<T>) -> Self { Filter { predicate } }
}

impl<T: Send + 'static> Operator for Filter<T> {
  type In = T;
  type Out = T;

  #[inline]
  fn apply(&mut self, value: T) -> Option<T> { (self.predicate)(&value).then_some(value) }

  fn duplicate(&self) -> Self { Filter::new(self.predicate.clone()) }
}

/// The inverse of [`Filter`]: drops the values that pass the test.
pub struct Ignore<T> {
  predicate: Predicate<T>,
}

impl<T> Ignore<T> {
  pub(crate) fn new(predicate: Predicate<T>) -> Self { Ignore { predicate } }
}

impl<T: Send + 'static> Operator for Ignore<T> {
  type In = T;
  type Out = T;

  #[inline]
  fn apply(&mut self, value: T) -> Option<T> { (!(self.predicate)(&value)).then_some(value) }

  fn duplicate(&self) -> Self { Ignore::new(self.predicate.clone()) }
}

/// Drops every value.
pub struct IgnoreAll<T>(PhantomData<fn(T) -> T>);

impl<T> Default for IgnoreAll<T> {
  fn default() -> Self { IgnoreAll(PhantomData) }
}

impl<T: Send + 'static> Operator for IgnoreAll<T> {
  type In = T;
  type Out = T;

  #[inline]
  fn apply(&mut self, _: T) -> Option<T> { None }

  fn duplicate(&self) -> Self { IgnoreAll::default() }
}

#[cfg(test)]
mod tests {
  use crate::ops::{self, Operator};

  #[test]
  fn filter_and_ignore_are_inverse() {
    let mut even = ops::filter(|v: &i32| v % 2 == 0);
    let mut odd = ops::ignore(|v: &i32| v % 2 == 0);
    let passed: Vec<_> = (0..6).filter_map(|v| even.apply(v)).collect();
    let ignored: Vec<_> = (0..6).filter_map(|v| odd.apply(v)).collect();
    assert_eq!(passed, vec![0, 2, 4]);
    assert_eq!(ignored, vec![1, 3, 5]);
  }

  #[test]
  fn ignore_all_drops_everything() {
    let mut op = ops::ignore_all::<&str>();
    assert_eq!(op.apply("a"), None);
    assert_eq!(op.duplicate().apply("b"), None);
  }
}
