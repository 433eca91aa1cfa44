use smallvec::SmallVec;

use super::{ObservableSubscription, SubscriptionId, SubscriptionLike};

/// Anything a subscription can remove itself from when cancelled.
pub(crate) trait Registry: Send + Sync {
  fn remove(&self, id: SubscriptionId);
}

/// Registered subscriptions of one publisher, in subscription order.
///
/// Uses `SmallVec<[_; 2]>` so the common case of one or two subscribers
/// needs no heap allocation.
pub(crate) struct Subscribers<T> {
  items: SmallVec<[(SubscriptionId, ObservableSubscription<T>); 2]>,
}

impl<T> Default for Subscribers<T> {
  fn default() -> Self { Self { items: SmallVec::new() } }
}

impl<T: Send + 'static> Subscribers<T> {
  pub fn add(&mut self, subscription: ObservableSubscription<T>) {
    self.items.push((subscription.id(), subscription));
  }

  pub fn remove(&mut self, id: SubscriptionId) -> Option<ObservableSubscription<T>> {
    let pos = self.items.iter().position(|(item_id, _)| *item_id == id)?;
    Some(self.items.remove(pos).1)
  }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  /// Copy of the current registrations, so delivery can run without holding
  /// the lock that guards this container.
  pub fn snapshot(&self) -> Vec<ObservableSubscription<T>> {
    self.items.iter().map(|(_, sub)| sub.clone()).collect()
  }

  pub fn drain(&mut self) -> Vec<ObservableSubscription<T>> {
    self.items.drain(..).map(|(_, sub)| sub).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscriber::Subscriber;

  fn unit() -> ObservableSubscription<i32> {
    ObservableSubscription::detached(Subscriber::new(|_| {}))
  }

  #[test]
  fn add_remove_keeps_order() {
    let mut subs = Subscribers::default();
    let (a, b, c) = (unit(), unit(), unit());
    subs.add(a.clone());
    subs.add(b.clone());
    subs.add(c.clone());
    assert_eq!(subs.len(), 3);

    assert!(subs.remove(b.id()).is_some());
    assert!(subs.remove(b.id()).is_none());
    let ids: Vec<_> = subs.snapshot().iter().map(|s| s.id()).collect();
    assert_eq!(ids, vec![a.id(), c.id()]);
  }

  #[test]
  fn drain_empties() {
    let mut subs = Subscribers::default();
    subs.add(unit());
    subs.add(unit());
    assert_eq!(subs.drain().len(), 2);
    assert_eq!(subs.len(), 0);
  }
}
