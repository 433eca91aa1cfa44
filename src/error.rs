//! Error type shared by every part of the crate.
//!
//! Two kinds of failure exist and they never mix:
//!
//! - construction-time failures (a synchronous subscription asking for
//!   backpressure, a negative `element_at` index, a negative `range` count)
//!   are returned as `Err(RxError)` from the call that builds the object;
//! - emission-time failures (a panicking callback, a missed value under the
//!   ERROR backpressure strategy, an error pushed by a publisher) are delivered
//!   to the subscription's `on_error` handler and never returned.

use std::{any::Any, error::Error as StdError, fmt, sync::Arc};

use thiserror::Error;

/// Message carried by every [`RxError::Backpressure`].
pub const MISSED_VALUE: &str = "Missed value";

/// Errors produced by publishers, subscriptions and operators.
///
/// The enum is `Clone` so a single error can be fanned out to every
/// subscription of a publisher.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum RxError {
  /// A value reached a busy asynchronous subscription configured with
  /// [`BackpressureStrategy::Error`](crate::subscriber::BackpressureStrategy)
  /// and was discarded.
  #[error("{message}")]
  Backpressure { message: String },

  /// A backpressure strategy was requested for a synchronous subscription.
  #[error("cannot use backpressure strategy with synchronous subscription")]
  BackpressureMismatch,

  /// `element_at` was built with a negative index.
  #[error("index must be a non-negative integer, got {0}")]
  NegativeIndex(i64),

  /// `range` was built with a negative count.
  #[error("count must be non-negative, got {0}")]
  NegativeCount(i64),

  /// `range` was built with values past `i64::MAX`.
  #[error("range of {count} values from {start} overflows")]
  RangeOverflow { start: i64, count: i64 },

  /// A subscriber callback or an operator panicked while handling a value.
  #[error("callback panicked: {0}")]
  Panicked(String),

  /// The thread for an asynchronous emission could not be started.
  #[error("failed to start dispatch thread: {0}")]
  Dispatch(String),

  /// An application error pushed into a publisher.
  #[error(transparent)]
  Source(Arc<dyn StdError + Send + Sync>),
}

impl RxError {
  /// The error raised by the ERROR backpressure strategy.
  pub fn missed_value() -> Self { RxError::Backpressure { message: MISSED_VALUE.to_owned() } }

  /// Wraps an application error.
  pub fn source<E>(err: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    RxError::Source(Arc::new(err))
  }

  pub fn is_backpressure(&self) -> bool { matches!(self, RxError::Backpressure { .. }) }

  /// Returns a short stable label (snake_case) for use in logs.
  pub fn as_label(&self) -> &'static str {
    match self {
      RxError::Backpressure { .. } => "backpressure",
      RxError::BackpressureMismatch => "backpressure_mismatch",
      RxError::NegativeIndex(_) => "negative_index",
      RxError::NegativeCount(_) => "negative_count",
      RxError::RangeOverflow { .. } => "range_overflow",
      RxError::Panicked(_) => "panicked",
      RxError::Dispatch(_) => "dispatch",
      RxError::Source(_) => "source",
    }
  }

  pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
    RxError::Panicked(PanicMessage(&*payload).to_string())
  }
}

impl PartialEq for RxError {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (RxError::Backpressure { message: a }, RxError::Backpressure { message: b }) => a == b,
      (RxError::BackpressureMismatch, RxError::BackpressureMismatch) => true,
      (RxError::NegativeIndex(a), RxError::NegativeIndex(b)) => a == b,
      (RxError::NegativeCount(a), RxError::NegativeCount(b)) => a == b,
      (
        RxError::RangeOverflow { start: a, count: c },
        RxError::RangeOverflow { start: b, count: d },
      ) => a == b && c == d,
      (RxError::Panicked(a), RxError::Panicked(b)) => a == b,
      (RxError::Dispatch(a), RxError::Dispatch(b)) => a == b,
      (RxError::Source(a), RxError::Source(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

struct PanicMessage<'a>(&'a (dyn Any + Send));

impl fmt::Display for PanicMessage<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(s) = self.0.downcast_ref::<&str>() {
      f.write_str(s)
    } else if let Some(s) = self.0.downcast_ref::<String>() {
      f.write_str(s)
    } else {
      f.write_str("non-string panic payload")
    }
  }
}
