use super::Operator;

/// Collects values and emits them in batches of `count`. A trailing partial
/// batch is never emitted.
pub struct BufferCount<T> {
  count: usize,
  batch: Vec<T>,
}

impl<T> BufferCount<T> {
  /// A `count` of zero behaves like one.
  pub(crate) fn new(count: usize) -> Self {
    let count = count.max(1);
    BufferCount { count, batch: Vec::with_capacity(count) }
  }
}

impl<T: Send + 'static> Operator for BufferCount<T> {
  type In = T;
  type Out = Vec<T>;

  fn apply(&mut self, value: T) -> Option<Vec<T>> {
    self.batch.push(value);
    if self.batch.len() < self.count {
      return None;
    }
    Some(std::mem::replace(&mut self.batch, Vec::with_capacity(self.count)))
  }

  fn init(&mut self) { self.batch.clear(); }

  fn duplicate(&self) -> Self { BufferCount::new(self.count) }
}
