use std::time::{Duration, Instant};

use super::Operator;

/// Collects values into a batch and emits the batch with the first value
/// that arrives once `span` has passed since the batch started.
///
/// Batches are only ever emitted on arrival of a value; a quiet source keeps
/// its partial batch.
pub struct Buffer<T> {
  span: Duration,
  batch: Vec<T>,
  started: Option<Instant>,
}

impl<T> Buffer<T> {
  pub(crate) fn new(span: Duration) -> Self { Buffer { span, batch: vec![], started: None } }

  fn push_at(&mut self, value: T, now: Instant) -> Option<Vec<T>> {
    let started = *self.started.get_or_insert(now);
    self.batch.push(value);
    if now.saturating_duration_since(started) >= self.span {
      self.started = Some(now);
      Some(std::mem::take(&mut self.batch))
    } else {
      None
    }
  }
}

impl<T: Send + 'static> Operator for Buffer<T> {
  type In = T;
  type Out = Vec<T>;

  fn apply(&mut self, value: T) -> Option<Vec<T>> { self.push_at(value, Instant::now()) }

  fn init(&mut self) {
    self.batch.clear();
    self.started = None;
  }

  fn duplicate(&self) -> Self { Buffer::new(self.span) }
}
