use std::{
  marker::PhantomData,
  time::{Duration, Instant},
};

use super::{throttle::TimeGate, Operator};

/// Emits a value only if `span` has passed since the last emitted value.
///
/// Values are decided on arrival and never held back, so unlike a
/// trailing-edge debounce the last value of a burst is not emitted once the
/// burst settles.
pub struct Debounce<T> {
  gate: TimeGate,
  _hint: PhantomData<fn(T) -> T>,
}

impl<T> Debounce<T> {
  pub(crate) fn new(span: Duration) -> Self {
    Debounce { gate: TimeGate::new(span), _hint: PhantomData }
  }
}

impl<T: Send + 'static> Operator for Debounce<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> { self.gate.admit(Instant::now()).then_some(value) }

  fn init(&mut self) { self.gate.reset() }

  fn duplicate(&self) -> Self { Debounce::new(self.gate.span()) }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use crate::ops::{self, Operator};

  #[test]
  fn first_of_burst_passes() {
    let mut op = ops::debounce(Duration::from_millis(200));
    let emitted: Vec<_> = (0..5).filter_map(|v| op.apply(v)).collect();
    assert_eq!(emitted, vec![0]);
  }

  #[test]
  fn init_reopens_gate() {
    let mut op = ops::debounce(Duration::from_secs(60));
    assert_eq!(op.apply("a"), Some("a"));
    assert_eq!(op.apply("b"), None);
    op.init();
    assert_eq!(op.apply("c"), Some("c"));
  }
}
