//! Subscription handles.
//!
//! A [`Subscription`] is what every `subscribe` call hands back. It controls
//! a single dispatch unit: the unit can be paused and resumed without
//! leaving its publisher, cancelled (removed from the publisher for good) or
//! disposed (its dispose handler fired).

use std::{
  fmt::{self, Debug, Formatter},
  sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
  },
};

mod observable_subscription;
mod registry;

pub use observable_subscription::ObservableSubscription;
pub(crate) use registry::{Registry, Subscribers};

/// Opaque identifier of a subscription, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
  pub(crate) fn next() -> Self {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    SubscriptionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for SubscriptionId {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "sub-{}", self.0) }
}

/// Control surface of one subscription.
pub trait SubscriptionLike: Send + Sync {
  fn id(&self) -> SubscriptionId;

  /// Removes the subscription from its publisher. Further values are never
  /// delivered. Idempotent.
  fn cancel(&self);

  /// Stops delivery while keeping the registration.
  fn pause(&self);

  fn resume(&self);

  fn is_paused(&self) -> bool;

  fn is_cancelled(&self) -> bool;

  /// Fires the dispose handler. A handler fires at most once.
  fn dispose(&self);
}

impl Debug for dyn SubscriptionLike {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("dyn SubscriptionLike")
      .field("id", &self.id())
      .field("is_paused", &self.is_paused())
      .field("is_cancelled", &self.is_cancelled())
      .finish()
  }
}

/// Type-erased handle returned by every `subscribe` call.
///
/// Cloning the handle does not duplicate the subscription; every clone
/// controls the same dispatch unit.
#[derive(Clone)]
pub struct Subscription(Arc<dyn SubscriptionLike>);

impl Subscription {
  pub fn new<S: SubscriptionLike + 'static>(subscription: S) -> Self {
    Subscription(Arc::new(subscription))
  }

  /// A handle attached to nothing: cancelling it has no effect.
  pub fn detached() -> Self {
    Subscription::new(ObservableSubscription::<()>::detached(crate::subscriber::Subscriber::new(
      |_| {},
    )))
  }

  /// Activates RAII behavior: `cancel()` is called as soon as the returned
  /// guard goes out of scope.
  ///
  /// **Attention:** if the guard is not bound to a variable, the
  /// subscription is cancelled immediately.
  pub fn cancel_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  #[inline]
  pub fn id(&self) -> SubscriptionId { self.0.id() }
  #[inline]
  pub fn cancel(&self) { self.0.cancel() }
  #[inline]
  pub fn pause(&self) { self.0.pause() }
  #[inline]
  pub fn resume(&self) { self.0.resume() }
  #[inline]
  pub fn is_paused(&self) -> bool { self.0.is_paused() }
  #[inline]
  pub fn is_cancelled(&self) -> bool { self.0.is_cancelled() }
  #[inline]
  pub fn dispose(&self) { self.0.dispose() }
}

impl<T: Send + 'static> From<ObservableSubscription<T>> for Subscription {
  fn from(subscription: ObservableSubscription<T>) -> Self { Subscription::new(subscription) }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Subscription").field(&&*self.0).finish()
  }
}

/// A scoped subscription: cancelled when dropped.
///
/// If you want to drop it immediately, wrap it in its own scope.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> SubscriptionGuard { SubscriptionGuard(subscription) }
}

impl std::ops::Deref for SubscriptionGuard {
  type Target = Subscription;
  fn deref(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.cancel() }
}
