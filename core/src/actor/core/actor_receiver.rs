use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::actor::context::ActorContext;
use crate::actor::core::actor::Actor;
use crate::actor::core::actor_error::ActorError;

#[allow(clippy::type_complexity)]
#[derive(Clone)]
pub struct ActorReceiver(Arc<dyn Fn(ActorContext) -> BoxFuture<'static, Result<(), ActorError>> + Send + Sync + 'static>);

impl ActorReceiver {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActorError>> + Send + 'static, {
    ActorReceiver(Arc::new(move |ctx| {
      Box::pin(f(ctx)) as BoxFuture<'static, Result<(), ActorError>>
    }))
  }

  pub async fn run(&self, context: ActorContext) -> Result<(), ActorError> {
    (self.0)(context).await
  }
}

impl Debug for ActorReceiver {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "ActorReceiver")
  }
}

/// Stateless actor whose whole behaviour is one closure.
#[derive(Debug, Clone)]
pub struct ActorReceiverActor(ActorReceiver);

impl ActorReceiverActor {
  pub fn new(actor_receiver: ActorReceiver) -> Self {
    Self(actor_receiver)
  }
}

#[async_trait]
impl Actor for ActorReceiverActor {
  async fn receive(&mut self, context: ActorContext) -> Result<(), ActorError> {
    self.0.run(context).await
  }
}

static_assertions::assert_impl_all!(ActorReceiver: Send, Sync);
