use std::marker::PhantomData;

use super::Operator;

/// Emits only the value at a zero-based position, then nothing.
pub struct ElementAt<T> {
  index: usize,
  seen: usize,
  found: bool,
  _hint: PhantomData<fn(T) -> T>,
}

impl<T> ElementAt<T> {
  pub(crate) fn new(index: usize) -> Self {
    ElementAt { index, seen: 0, found: false, _hint: PhantomData }
  }
}

impl<T: Send + 'static> Operator for ElementAt<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    if self.found {
      return None;
    }
    let position = self.seen;
    self.seen += 1;
    if position == self.index {
      self.found = true;
      Some(value)
    } else {
      None
    }
  }

  fn init(&mut self) {
    self.seen = 0;
    self.found = false;
  }

  fn duplicate(&self) -> Self { ElementAt::new(self.index) }
}
