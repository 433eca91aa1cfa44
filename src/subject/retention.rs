//! What a subject keeps around for subscribers that arrive late.

/// Values a subject replays to each new subscriber.
pub trait Retention<T>: Send + 'static {
  /// The values to replay, oldest first.
  fn replay(&self) -> Vec<T>;

  /// Forgets everything; called when the subject is disposed.
  fn clear(&mut self);
}

/// Retention that can take in values pushed with `next`.
pub trait Record<T>: Retention<T> {
  fn record(&mut self, value: &T);
}

/// Keeps the latest value, starting from an optional one.
#[derive(Debug, Clone, Default)]
pub struct Latest<T>(pub(crate) Option<T>);

/// Keeps the current value. Only disposal empties it.
#[derive(Debug, Clone)]
pub struct Current<T>(pub(crate) Option<T>);

/// Keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

/// Keeps a seed followed by every recorded value.
#[derive(Debug, Clone, Default)]
pub struct History<T> {
  seed: Vec<T>,
  recorded: Vec<T>,
}

/// A fixed sequence that can't be added to.
#[derive(Debug, Clone, Default)]
pub struct Sequence<T>(pub(crate) Vec<T>);

impl<T> History<T> {
  pub(crate) fn new(seed: Vec<T>) -> Self { History { seed, recorded: vec![] } }
}

impl<T: Clone + Send + 'static> Retention<T> for Latest<T> {
  fn replay(&self) -> Vec<T> { self.0.iter().cloned().collect() }

  fn clear(&mut self) { self.0 = None; }
}

impl<T: Clone + Send + 'static> Record<T> for Latest<T> {
  fn record(&mut self, value: &T) { self.0 = Some(value.clone()); }
}

impl<T: Clone + Send + 'static> Retention<T> for Current<T> {
  fn replay(&self) -> Vec<T> { self.0.iter().cloned().collect() }

  fn clear(&mut self) { self.0 = None; }
}

impl<T: Clone + Send + 'static> Record<T> for Current<T> {
  fn record(&mut self, value: &T) { self.0 = Some(value.clone()); }
}

impl<T> Retention<T> for Nothing {
  fn replay(&self) -> Vec<T> { vec![] }

  fn clear(&mut self) {}
}

impl<T> Record<T> for Nothing {
  fn record(&mut self, _: &T) {}
}

impl<T: Clone + Send + 'static> Retention<T> for History<T> {
  fn replay(&self) -> Vec<T> { self.seed.iter().chain(&self.recorded).cloned().collect() }

  fn clear(&mut self) {
    self.seed.clear();
    self.recorded.clear();
  }
}

impl<T: Clone + Send + 'static> Record<T> for History<T> {
  fn record(&mut self, value: &T) { self.recorded.push(value.clone()); }
}

impl<T: Clone + Send + 'static> Retention<T> for Sequence<T> {
  fn replay(&self) -> Vec<T> { self.0.clone() }

  fn clear(&mut self) { self.0.clear(); }
}
