use super::{Operator, Predicate};

/// Emits values while they satisfy a predicate. The first value that fails
/// closes the operator for good; it is emitted itself only with
/// `include_stop`.
pub struct TakeWhile<T> {
  predicate: Predicate<T>,
  include_stop: bool,
  closed: bool,
}

impl<T> TakeWhile<T> {
  pub(crate) fn new(predicate: Predicate<T>, include_stop: bool) -> Self {
    TakeWhile { predicate, include_stop, closed: false }
  }
}

impl<T: Send + 'static> Operator for TakeWhile<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if self.closed {
      return None;
    }
    if (self.predicate)(&value) {
      return Some(value);
    }
    self.closed = true;
    self.include_stop.then_some(value)
  }

  fn init(&mut self) { self.closed = false; }

  fn duplicate(&self) -> Self { TakeWhile::new(self.predicate.clone(), self.include_stop) }
}

/// Emits values until one satisfies a predicate. That value closes the
/// operator for good; it is emitted itself only with `include_stop`.
pub struct TakeUntil<T> {
  predicate: Predicate<T>,
  include_stop: bool,
  closed: bool,
}

impl<T> TakeUntil<T> {
  pub(crate) fn new(predicate: Predicate<T>, include_stop: bool) -> Self {
    TakeUntil { predicate, include_stop, closed: false }
  }
}

impl<T: Send + 'static> Operator for TakeUntil<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if self.closed {
      return None;
    }
    if !(self.predicate)(&value) {
      return Some(value);
    }
    self.closed = true;
    self.include_stop.then_some(value)
  }

  fn init(&mut self) { self.closed = false; }

  fn duplicate(&self) -> Self { TakeUntil::new(self.predicate.clone(), self.include_stop) }
}
