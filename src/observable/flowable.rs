use crate::subject::{Sequence, Subject};

/// A cold source over a fixed sequence: every subscriber receives the whole
/// sequence, in order, when it subscribes.
pub type Flowable<T> = Subject<T, Sequence<T>>;

/// A [`Flowable`] holding at most one value.
pub type Single<T> = Flowable<T>;

impl<T: Clone + Send + 'static> Subject<T, Sequence<T>> {
  pub fn new<I: IntoIterator<Item = T>>(values: I) -> Self {
    Self::with_retention(Sequence(values.into_iter().collect()))
  }

  /// A flowable of zero or one value.
  pub fn single(value: Option<T>) -> Single<T> { Self::new(value) }

  /// Emits the whole sequence again to everyone currently subscribed.
  pub fn push(&self) { self.emit_retained() }

  pub fn values(&self) -> Vec<T> { self.retained.lock().0.clone() }

  /// A [`Single`] of the first value of the sequence.
  pub fn first(&self) -> Single<T> { Self::single(self.retained.lock().0.first().cloned()) }

  /// A [`Single`] of the last value of the sequence.
  pub fn last(&self) -> Single<T> { Self::single(self.retained.lock().0.last().cloned()) }
}
