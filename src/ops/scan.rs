use std::sync::Arc;

use super::Operator;

/// Applies an accumulator to each value and emits every intermediate result.
pub struct Scan<T, A> {
  accumulator: Arc<dyn Fn(A, T) -> A + Send + Sync>,
  seed: A,
  state: A,
}

impl<T, A: Clone> Scan<T, A> {
  pub(crate) fn new(accumulator: Arc<dyn Fn(A, T) -> A + Send + Sync>, seed: A) -> Self {
    Scan { accumulator, state: seed.clone(), seed }
  }
}

impl<T, A> Operator for Scan<T, A>
where
  T: Send + 'static,
  A: Clone + Send + 'static,
{
  type In = T;
  type Out = A;

  fn apply(&mut self, value: T) -> Option<A> {
    let next = (self.accumulator)(self.state.clone(), value);
    self.state = next.clone();
    Some(next)
  }

  fn init(&mut self) { self.state = self.seed.clone(); }

  fn duplicate(&self) -> Self { Scan::new(self.accumulator.clone(), self.seed.clone()) }
}
