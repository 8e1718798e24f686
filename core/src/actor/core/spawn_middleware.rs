use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::SpawnerContextHandle;
use crate::actor::core::middleware_chain::SpawnMiddlewareNext;
use crate::actor::core::props::Props;
use crate::actor::core::spawner::SpawnError;
use crate::actor::pid::Pid;

type SpawnMiddlewareFn = Arc<
  dyn Fn(SpawnMiddlewareNext, ActorSystem, String, Props, SpawnerContextHandle) -> BoxFuture<'static, Result<Pid, SpawnError>>
    + Send
    + Sync
    + 'static,
>;

/// A named interceptor around actor creation.
#[derive(Clone)]
pub struct SpawnMiddleware {
  name: Arc<str>,
  f: SpawnMiddlewareFn,
}

impl SpawnMiddleware {
  pub fn new<F, Fut>(name: &str, f: F) -> Self
  where
    F: Fn(SpawnMiddlewareNext, ActorSystem, String, Props, SpawnerContextHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Pid, SpawnError>> + Send + 'static, {
    Self {
      name: Arc::from(name),
      f: Arc::new(move |next, s, id, p, parent| {
        Box::pin(f(next, s, id, p, parent)) as BoxFuture<'static, Result<Pid, SpawnError>>
      }),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub async fn run(
    &self,
    next: SpawnMiddlewareNext,
    actor_system: ActorSystem,
    id: String,
    props: Props,
    parent_context: SpawnerContextHandle,
  ) -> Result<Pid, SpawnError> {
    (self.f)(next, actor_system, id, props, parent_context).await
  }
}

impl Debug for SpawnMiddleware {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SpawnMiddleware").field("name", &self.name).finish()
  }
}

impl PartialEq for SpawnMiddleware {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.f, &other.f)
  }
}

impl Eq for SpawnMiddleware {}

static_assertions::assert_impl_all!(SpawnMiddleware: Send, Sync);
