use std::{collections::HashSet, hash::Hash, sync::Arc};

use super::Operator;

/// Emits a value only if its key was never seen before.
///
/// Every key is kept for as long as the operator lives; on a long-lived,
/// high-cardinality source that set only grows.
pub struct Distinct<T, K> {
  key: Arc<dyn Fn(&T) -> K + Send + Sync>,
  seen: HashSet<K>,
}

impl<T, K> Distinct<T, K> {
  pub(crate) fn new(key: Arc<dyn Fn(&T) -> K + Send + Sync>) -> Self {
    Distinct { key, seen: HashSet::new() }
  }
}

impl<T, K> Operator for Distinct<T, K>
where
  T: Send + 'static,
  K: Eq + Hash + Send + 'static,
{
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> {
    let key = (self.key)(&value);
    self.seen.insert(key).then_some(value)
  }

  fn init(&mut self) { self.seen.clear(); }

  fn duplicate(&self) -> Self { Distinct::new(self.key.clone()) }
}
