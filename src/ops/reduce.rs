use std::sync::Arc;

use super::Operator;

/// Combines each value with the last one that got through.
///
/// The first value always passes. After that, a value passes (as the
/// reduction, not as itself) only when reducing it with the previous passed
/// value yields something different from that previous value. A reducer like
/// `max` therefore emits a running maximum and stays quiet otherwise.
pub struct Reduce<T> {
  reducer: Arc<dyn Fn(T, T) -> T + Send + Sync>,
  previous: Option<T>,
}

impl<T> Reduce<T> {
  pub(crate) fn new(reducer: Arc<dyn Fn(T, T) -> T + Send + Sync>) -> Self {
    Reduce { reducer, previous: None }
  }
}

impl<T> Operator for Reduce<T>
where
  T: Clone + PartialEq + Send + 'static,
{
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    let Some(previous) = self.previous.take() else {
      self.previous = Some(value.clone());
      return Some(value);
    };
    let reduced = (self.reducer)(previous.clone(), value);
    if reduced == previous {
      self.previous = Some(previous);
      None
    } else {
      self.previous = Some(reduced.clone());
      Some(reduced)
    }
  }

  fn init(&mut self) { self.previous = None; }

  fn duplicate(&self) -> Self { Reduce::new(self.reducer.clone()) }
}

#[cfg(test)]
mod tests {
  use crate::ops::{self, Operator};

  #[test]
  fn running_maximum() {
    let mut op = ops::reduce(|a: i32, b: i32| a.max(b));
    let emitted: Vec<_> = [1, 3, 2, 5, 4, 5].into_iter().filter_map(|v| op.apply(v)).collect();
    assert_eq!(emitted, vec![1, 3, 5]);
  }

  #[test]
  fn sum_emits_every_change() {
    let mut op = ops::reduce(|a: i32, b: i32| a + b);
    let emitted: Vec<_> = [1, 2, 0, 3].into_iter().filter_map(|v| op.apply(v)).collect();
    assert_eq!(emitted, vec![1, 3, 6]);
  }
}
