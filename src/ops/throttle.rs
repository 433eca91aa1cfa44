use std::{
  marker::PhantomData,
  time::{Duration, Instant},
};

use super::Operator;

/// Admits a value only when at least `span` has passed since the last
/// admitted one. The first value is always admitted.
#[derive(Debug, Clone)]
pub(crate) struct TimeGate {
  span: Duration,
  last_pass: Option<Instant>,
}

impl TimeGate {
  pub(crate) fn new(span: Duration) -> Self { TimeGate { span, last_pass: None } }

  pub(crate) fn admit(&mut self, now: Instant) -> bool {
    match self.last_pass {
      Some(last) if now.saturating_duration_since(last) < self.span => false,
      _ => {
        self.last_pass = Some(now);
        true
      }
    }
  }

  pub(crate) fn reset(&mut self) { self.last_pass = None; }

  pub(crate) fn span(&self) -> Duration { self.span }
}

/// Emits a value, then ignores values for `span`.
pub struct Throttle<T> {
  gate: TimeGate,
  _hint: PhantomData<fn(T) -> T>,
}

impl<T> Throttle<T> {
  pub(crate) fn new(span: Duration) -> Self {
    Throttle { gate: TimeGate::new(span), _hint: PhantomData }
  }
}

impl<T: Send + 'static> Operator for Throttle<T> {
  type In = T;
  type Out = T;

  fn apply(&mut self, value: T) -> Option<T> { self.gate.admit(Instant::now()).then_some(value) }

  fn init(&mut self) { self.gate.reset() }

  fn duplicate(&self) -> Self { Throttle::new(self.gate.span()) }
}
