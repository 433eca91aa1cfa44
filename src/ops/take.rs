use std::marker::PhantomData;

use super::Operator;

/// Emits only the first `count` values; everything after is dropped.
pub struct Take<T> {
  count: usize,
  taken: usize,
  _hint: PhantomData<fn(T) -> T>,
}

impl<T> Take<T> {
  pub(crate) fn new(count: usize) -> Self { Take { count, taken: 0, _hint: PhantomData } }
}

impl<T: Send + 'static> Operator for Take<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if self.taken < self.count {
      self.taken += 1;
      Some(value)
    } else {
      None
    }
  }

  fn init(&mut self) { self.taken = 0; }

  fn duplicate(&self) -> Self { Take::new(self.count) }
}
