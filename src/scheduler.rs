//! Thread-per-task dispatch used by asynchronous subscriptions.
//!
//! There is no pool and no event loop: every accepted asynchronous emission
//! runs on a thread of its own, so a slow subscriber never holds up the
//! publisher or any other subscriber.

use std::thread;

use crate::error::RxError;

/// Name given to every thread started for an asynchronous emission.
pub const DISPATCH_THREAD_NAME: &str = "rxpipe-dispatch";

/// Runs `task` on a new thread.
///
/// The thread is detached; completion is observed only through whatever the
/// task itself does.
pub fn new_thread<F>(task: F) -> Result<(), RxError>
where
  F: FnOnce() + Send + 'static,
{
  thread::Builder::new()
    .name(DISPATCH_THREAD_NAME.to_owned())
    .spawn(task)
    .map(|_detached| ())
    .map_err(|err| RxError::Dispatch(err.to_string()))
}
