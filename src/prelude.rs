//! Prelude module for convenient imports

#[cfg(feature = "eventing")]
pub use crate::events::{event, events, named_event, Event, EventBroadcaster};
pub use crate::{
  error::RxError,
  observable::{
    self, ChainBuilder, ChainSubscribe, Flowable, IntoStream, PipeObservable, Single,
    Subscribable, SubscriptionStream,
  },
  ops::{self, Operator, Timestamped},
  pipe::{self, IntoPipe, Pipe},
  subject::{BehaviorSubject, PublishSubject, ReplaySubject, SingleValueSubject, Subject},
  subscriber::{BackpressureStrategy, Subscriber},
  subscription::{Subscription, SubscriptionGuard, SubscriptionLike},
};
