use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{InfoPart, SpawnerContext, SpawnerPart};
use crate::actor::core::{Props, SpawnError};
use crate::actor::pid::Pid;

/// Context a spawn runs in; its `get_self_opt` becomes the parent of the new actor.
#[derive(Clone)]
pub struct SpawnerContextHandle(Arc<dyn SpawnerContext>);

impl SpawnerContextHandle {
  pub fn new_arc(context: Arc<dyn SpawnerContext>) -> Self {
    SpawnerContextHandle(context)
  }

  pub fn new(context: impl SpawnerContext + 'static) -> Self {
    SpawnerContextHandle(Arc::new(context))
  }
}

impl Debug for SpawnerContextHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "SpawnerContextHandle")
  }
}

#[async_trait]
impl InfoPart for SpawnerContextHandle {
  async fn get_parent(&self) -> Option<Pid> {
    self.0.get_parent().await
  }

  async fn get_self_opt(&self) -> Option<Pid> {
    self.0.get_self_opt().await
  }

  async fn get_actor_system(&self) -> ActorSystem {
    self.0.get_actor_system().await
  }
}

#[async_trait]
impl SpawnerPart for SpawnerContextHandle {
  async fn spawn(&self, props: Props) -> Pid {
    self.0.spawn(props).await
  }

  async fn spawn_prefix(&self, props: Props, prefix: &str) -> Pid {
    self.0.spawn_prefix(props, prefix).await
  }

  async fn spawn_named(&self, props: Props, name: &str) -> Result<Pid, SpawnError> {
    self.0.spawn_named(props, name).await
  }
}

impl SpawnerContext for SpawnerContextHandle {}

static_assertions::assert_impl_all!(SpawnerContextHandle: Send, Sync);
