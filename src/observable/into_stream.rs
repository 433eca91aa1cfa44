//! Bridging subscriptions into `futures` streams.
//!
//! ```rust
//! use futures::{executor::block_on, StreamExt};
//! use rxpipe::prelude::*;
//!
//! let subject = ReplaySubject::new([1, 2]);
//! let stream = subject.into_stream();
//! subject.on_completed(None);
//!
//! assert_eq!(block_on(stream.collect::<Vec<_>>()), vec![1, 2]);
//! ```

use std::{
  pin::Pin,
  sync::Arc,
  task::{Context, Poll},
};

use futures::{
  channel::mpsc::{unbounded, UnboundedReceiver},
  stream::{FusedStream, Stream, StreamExt},
};

use super::Subscribable;
use crate::{subscriber::Subscriber, subscription::Subscription};

/// A `Stream` over the values a subscription receives.
///
/// The stream ends when the source completes (after yielding the completion
/// value, if there is one) or disposes the subscription. Errors are not part
/// of the stream. Dropping the stream cancels the subscription.
pub struct SubscriptionStream<T> {
  receiver: UnboundedReceiver<T>,
  subscription: Subscription,
}

impl<T> SubscriptionStream<T> {
  pub fn subscription(&self) -> &Subscription { &self.subscription }
}

impl<T> Stream for SubscriptionStream<T> {
  type Item = T;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
    self.receiver.poll_next_unpin(cx)
  }
}

impl<T> FusedStream for SubscriptionStream<T> {
  fn is_terminated(&self) -> bool { self.receiver.is_terminated() }
}

impl<T> Drop for SubscriptionStream<T> {
  fn drop(&mut self) { self.subscription.cancel() }
}

pub trait IntoStream<T>: Subscribable<T> {
  /// Subscribes synchronously and yields every delivered value as a stream
  /// item.
  fn into_stream(&self) -> SubscriptionStream<T>;
}

impl<T, S> IntoStream<T> for S
where
  T: Send + 'static,
  S: Subscribable<T> + ?Sized,
{
  fn into_stream(&self) -> SubscriptionStream<T> {
    let (sender, receiver) = unbounded();
    let sender = Arc::new(sender);
    let (on_completed, on_dispose) = (sender.clone(), sender.clone());
    let subscriber = Subscriber::new(move |value| {
      // The receiver side only goes away together with the subscription.
      let _ = sender.unbounded_send(value);
    })
    .on_completed(move |value| {
      if let Some(value) = value {
        let _ = on_completed.unbounded_send(value);
      }
      on_completed.close_channel();
    })
    .on_dispose(move || on_dispose.close_channel());

    let subscription = self.subscribe_with(subscriber).unwrap_or_else(|_| Subscription::detached());
    SubscriptionStream { receiver, subscription }
  }
}

#[cfg(test)]
mod tests {
  use futures::executor::block_on;

  use super::*;
  use crate::{ops, prelude::*};

  #[test]
  fn yields_values_until_completion() {
    let subject = PublishSubject::new();
    let stream = subject.into_stream();
    subject.next(1);
    subject.next(2);
    subject.on_completed(Some(3));
    subject.next(4);
    assert_eq!(block_on(stream.collect::<Vec<_>>()), vec![1, 2, 3]);
  }

  #[test]
  fn ends_when_disposed() {
    let subject = SingleValueSubject::new(Some("a"));
    let stream = subject.into_stream();
    subject.dispose();
    assert_eq!(block_on(stream.collect::<Vec<_>>()), vec!["a"]);
  }

  #[test]
  fn dropping_cancels() {
    let subject = PublishSubject::<i32>::new();
    let stream = subject.pipe(ops::map(|v: i32| v + 1)).into_stream();
    assert_eq!(subject.subscriber_count(), 1);
    drop(stream);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn empty_source_ends_immediately() {
    let mut stream = observable::empty::<i32>().into_stream();
    assert_eq!(block_on(stream.next()), None);
    assert!(stream.is_terminated());
  }
}
