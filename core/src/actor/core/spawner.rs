use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::SpawnerContextHandle;
use crate::actor::core::props::Props;
use crate::actor::pid::Pid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
  #[error("Name already exists: {0}")]
  NameExists(Pid),
  #[error("Spawn rejected: {0}")]
  Rejected(String),
}

type SpawnerFn =
  Arc<dyn Fn(ActorSystem, String, Props, SpawnerContextHandle) -> BoxFuture<'static, Result<Pid, SpawnError>> + Send + Sync + 'static>;

/// Turns `(system, name, props, parent)` into a live actor.
#[derive(Clone)]
pub struct Spawner(SpawnerFn);

impl Debug for Spawner {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Spawner")
  }
}

impl PartialEq for Spawner {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Spawner {}

impl Spawner {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(ActorSystem, String, Props, SpawnerContextHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Pid, SpawnError>> + Send + 'static, {
    Self(Arc::new(move |s, name, p, sch| {
      Box::pin(f(s, name, p, sch)) as BoxFuture<'static, Result<Pid, SpawnError>>
    }))
  }

  pub async fn run(
    &self,
    actor_system: ActorSystem,
    name: &str,
    props: Props,
    parent_context: SpawnerContextHandle,
  ) -> Result<Pid, SpawnError> {
    (self.0)(actor_system, name.to_string(), props, parent_context).await
  }
}

static_assertions::assert_impl_all!(Spawner: Send, Sync);
