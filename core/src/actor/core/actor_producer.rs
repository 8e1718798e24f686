use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::actor::context::ActorContext;
use crate::actor::core::actor::Actor;
use crate::actor::core::actor_handle::ActorHandle;

type ActorProducerFn = Arc<dyn Fn(ActorContext) -> BoxFuture<'static, ActorHandle> + Send + Sync + 'static>;

/// Factory of actor instances; invoked once at spawn and once per restart.
#[derive(Clone)]
pub struct ActorProducer(ActorProducerFn);

impl ActorProducer {
  pub fn new<A, F, Fut>(f: F) -> Self
  where
    A: Actor,
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A> + Send + 'static, {
    let f = Arc::new(f);
    Self(Arc::new(move |ctx| {
      let f = f.clone();
      Box::pin(async move { ActorHandle::new(f(ctx).await) }) as BoxFuture<'static, ActorHandle>
    }))
  }

  pub fn from_handle<F, Fut>(f: F) -> Self
  where
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ActorHandle> + Send + 'static, {
    Self(Arc::new(move |ctx| Box::pin(f(ctx)) as BoxFuture<'static, ActorHandle>))
  }

  pub async fn run(&self, context: ActorContext) -> ActorHandle {
    (self.0)(context).await
  }
}

impl Debug for ActorProducer {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "ActorProducer")
  }
}

impl PartialEq for ActorProducer {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for ActorProducer {}

static_assertions::assert_impl_all!(ActorProducer: Send, Sync);
