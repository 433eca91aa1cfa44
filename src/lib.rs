//! # rxpipe: thread-based reactive streams
//!
//! Subjects broadcast values to subscribers. Each subscriber can run its
//! handler inline or on a dispatch thread, and asynchronous subscribers can
//! choose what happens when a value arrives while the previous one is still
//! being handled. Values flow through per-subscription pipes of operators.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxpipe::prelude::*;
//!
//! let subject = PublishSubject::new();
//! subject
//!   .pipe((ops::filter(|v: &i32| v % 2 == 0), ops::map(|v: i32| v * 2)))
//!   .subscribe(|v| println!("Value: {v}"));
//!
//! (0..10).for_each(|v| subject.next(v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Subject`] | Multicast source, with a retention policy per alias |
//! | [`Subscriber`] | Handlers plus dispatch settings for one subscription |
//! | [`Subscription`] | Handle to pause, resume or cancel a subscription |
//! | [`Pipe`] | An ordered, per-subscription chain of operators |
//!
//! ## Feature Flags
//!
//! - **`eventing`** (default): the process-wide [`events`] registry
//!
//! [`Subject`]: subject::Subject
//! [`Subscriber`]: subscriber::Subscriber
//! [`Subscription`]: subscription::Subscription
//! [`Pipe`]: pipe::Pipe

pub mod error;
#[cfg(feature = "eventing")]
pub mod events;
pub mod observable;
pub mod ops;
pub mod pipe;
pub mod prelude;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
