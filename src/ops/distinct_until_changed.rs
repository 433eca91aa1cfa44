use std::sync::Arc;

use super::Operator;

/// Emits a value only if its key differs from the previous value's key.
pub struct DistinctUntilChanged<T, K> {
  key: Arc<dyn Fn(&T) -> K + Send + Sync>,
  last: Option<K>,
}

impl<T, K> DistinctUntilChanged<T, K> {
  pub(crate) fn new(key: Arc<dyn Fn(&T) -> K + Send + Sync>) -> Self {
    DistinctUntilChanged { key, last: None }
  }
}

impl<T, K> Operator for DistinctUntilChanged<T, K>
where
  T: Send + 'static,
  K: PartialEq + Send + 'static,
{
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    let key = (self.key)(&value);
    if self.last.as_ref() == Some(&key) {
      return None;
    }
    self.last = Some(key);
    Some(value)
  }

  fn init(&mut self) { self.last = None; }

  fn duplicate(&self) -> Self { DistinctUntilChanged::new(self.key.clone()) }
}
