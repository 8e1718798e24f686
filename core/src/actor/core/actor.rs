use std::fmt::Debug;

use async_trait::async_trait;

use crate::actor::context::ActorContext;
use crate::actor::core::actor_error::ActorError;
use crate::actor::pid::Pid;
use crate::actor::supervisor::SupervisorStrategyHandle;

/// Receive logic of an actor plus its lifecycle hooks.
///
/// An instance is only ever driven by one mailbox run at a time, so `&mut self` is never
/// contended. A restart throws the instance away and asks the producer for a new one.
#[async_trait]
pub trait Actor: Debug + Send + Sync + 'static {
  fn get_type_name(&self) -> String {
    std::any::type_name_of_val(self).to_string()
  }

  async fn receive(&mut self, context: ActorContext) -> Result<(), ActorError>;

  async fn pre_start(&mut self, _: ActorContext) -> Result<(), ActorError> {
    tracing::debug!("Actor::pre_start");
    Ok(())
  }

  /// Called on the failed instance, right before it is replaced.
  async fn pre_restart(&mut self, _: ActorContext) -> Result<(), ActorError> {
    tracing::debug!("Actor::pre_restart");
    Ok(())
  }

  /// Called on the fresh instance after a restart.
  async fn post_restart(&mut self, context: ActorContext) -> Result<(), ActorError> {
    tracing::debug!("Actor::post_restart");
    self.pre_start(context).await
  }

  async fn pre_stop(&mut self, _: ActorContext) -> Result<(), ActorError> {
    tracing::debug!("Actor::pre_stop");
    Ok(())
  }

  async fn post_stop(&mut self, _: ActorContext) -> Result<(), ActorError> {
    tracing::debug!("Actor::post_stop");
    Ok(())
  }

  async fn post_child_terminate(&mut self, _: ActorContext, _: &Pid) -> Result<(), ActorError> {
    tracing::debug!("Actor::post_child_terminate");
    Ok(())
  }

  /// Strategy applied to failures of this actor's children.
  async fn get_supervisor_strategy(&self) -> Option<SupervisorStrategyHandle> {
    None
  }
}
