use std::marker::PhantomData;

use super::{Operator, Predicate};

/// Ignores the first `count` values and emits the rest.
pub struct Skip<T> {
  count: usize,
  skipped: usize,
  _hint: PhantomData<fn(T) -> T>,
}

impl<T> Skip<T> {
  pub(crate) fn new(count: usize) -> Self { Skip { count, skipped: 0, _hint: PhantomData } }
}

impl<T: Send + 'static> Operator for Skip<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if self.skipped < self.count {
      self.skipped += 1;
      None
    } else {
      Some(value)
    }
  }

  fn init(&mut self) { self.skipped = 0; }

  fn duplicate(&self) -> Self { Skip::new(self.count) }
}

/// Ignores values while they satisfy a predicate; the first one that fails
/// and everything after it are emitted.
pub struct SkipWhile<T> {
  predicate: Predicate<T>,
  open: bool,
}

impl<T> SkipWhile<T> {
  pub(crate) fn new(predicate: Predicate<T>) -> Self { SkipWhile { predicate, open: false } }
}

impl<T: Send + 'static> Operator for SkipWhile<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if !self.open && (self.predicate)(&value) {
      return None;
    }
    self.open = true;
    Some(value)
  }

  fn init(&mut self) { self.open = false; }

  fn duplicate(&self) -> Self { SkipWhile::new(self.predicate.clone()) }
}

/// Ignores values until one satisfies a predicate; that one and everything
/// after it are emitted.
pub struct SkipUntil<T> {
  predicate: Predicate<T>,
  open: bool,
}

impl<T> SkipUntil<T> {
  pub(crate) fn new(predicate: Predicate<T>) -> Self { SkipUntil { predicate, open: false } }
}

impl<T: Send + 'static> Operator for SkipUntil<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if !self.open && !(self.predicate)(&value) {
      return None;
    }
    self.open = true;
    Some(value)
  }

  fn init(&mut self) { self.open = false; }

  fn duplicate(&self) -> Self { SkipUntil::new(self.predicate.clone()) }
}
