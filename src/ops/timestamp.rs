use std::{marker::PhantomData, time::SystemTime};

use super::Operator;

/// A value paired with the wall-clock time it passed through a
/// [`Timestamp`] operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamped<T> {
  pub value: T,
  pub timestamp: SystemTime,
}

pub struct Timestamp<T>(PhantomData<fn(T) -> T>);

impl<T> Default for Timestamp<T> {
  fn default() -> Self { Timestamp(PhantomData) }
}

impl<T: Send + 'static> Operator for Timestamp<T> {
  type In = T;
  type Out = Timestamped<T>;

  #[inline]
  fn apply(&mut self, value: T) -> Option<Timestamped<T>> {
    Some(Timestamped { value, timestamp: SystemTime::now() })
  }

  fn duplicate(&self) -> Self { Timestamp::default() }
}
