use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::actor::message::MessageHandle;

/// Callback registered on the event stream.
#[derive(Clone)]
pub struct EventHandler(Arc<dyn Fn(MessageHandle) -> BoxFuture<'static, ()> + Send + Sync + 'static>);

impl EventHandler {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(MessageHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Arc::new(move |mh| Box::pin(f(mh)) as BoxFuture<'static, ()>))
  }

  pub async fn run(&self, event: MessageHandle) {
    (self.0)(event).await
  }
}

impl Debug for EventHandler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "EventHandler")
  }
}

impl PartialEq for EventHandler {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for EventHandler {}

static_assertions::assert_impl_all!(EventHandler: Send, Sync);
