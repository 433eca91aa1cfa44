use std::{marker::PhantomData, sync::Arc};

use super::Operator;

/// Creates a new value by applying a function to each value.
pub struct Map<T, V> {
  mapper: Arc<dyn Fn(T) -> V + Send + Sync>,
}

impl<T, V> Map<T, V> {
  pub(crate) fn new(mapper: Arc<dyn Fn(T) -> V + Send + Sync>) -> Self { Map { mapper } }
}

impl<T: Send + 'static, V: Send + 'static> Operator for Map<T, V> {
  type In = T;
  type Out = V;

  #[inline]
  fn apply(&mut self, value: T) -> Option<V> { Some((self.mapper)(value)) }

  fn duplicate(&self) -> Self { Map::new(self.mapper.clone()) }
}

/// Maps every value to the same constant.
pub struct MapTo<T, V> {
  value: V,
  _hint: PhantomData<fn(T)>,
}

impl<T, V> MapTo<T, V> {
  pub(crate) fn new(value: V) -> Self { MapTo { value, _hint: PhantomData } }
}

impl<T, V> Operator for MapTo<T, V>
where
  T: Send + 'static,
  V: Clone + Send + 'static,
{
  type In = T;
  type Out = V;

  #[inline]
  fn apply(&mut self, _: T) -> Option<V> { Some(self.value.clone()) }

  fn duplicate(&self) -> Self { MapTo::new(self.value.clone()) }
}

/// Runs a side effect for every value and passes it on unchanged.
pub struct Tap<T> {
  action: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T> Tap<T> {
  pub(crate) fn new(action: Arc<dyn Fn(&T) + Send + Sync>) -> Self { Tap { action } }
}

impl<T: Send + 'static> Operator for Tap<T> {
  type In = T;
  type Out = T;

  #[inline]
  fn apply(&mut self, value: T) -> Option<T> {
    (self.action)(&value);
    Some(value)
  }

  fn duplicate(&self) -> Self { Tap::new(self.action.clone()) }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::ops;

  #[test]
  fn map_changes_type() {
    let mut op = ops::map(|v: i32| format!("#{v}"));
    assert_eq!(op.apply(3).as_deref(), Some("#3"));
  }

  #[test]
  fn map_to_replaces_values() {
    let mut op = ops::map_to::<i32, _>("x");
    assert_eq!(op.apply(1), Some("x"));
    assert_eq!(op.apply(2), Some("x"));
  }

  #[test]
  fn tap_sees_values_without_changing_them() {
    let seen = Arc::new(Mutex::new(vec![]));
    let c_seen = seen.clone();
    let mut op = ops::tap(move |v: &i32| c_seen.lock().unwrap().push(*v));
    assert_eq!(op.apply(1), Some(1));
    assert_eq!(op.duplicate().apply(2), Some(2));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }
}
