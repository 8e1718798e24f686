use std::any::Any;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::ErrorReason;
use crate::actor::message::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::directive::Directive;
use crate::actor::supervisor::restart_statistics::RestartStatistics;
use crate::actor::supervisor::supervisor_strategy::{log_failure, Supervisor, SupervisorHandle, SupervisorStrategy};

/// Always restarts the failed child, with no retry limit.
#[derive(Debug, Clone, Default)]
pub struct RestartingStrategy;

impl RestartingStrategy {
  pub fn new() -> Self {
    RestartingStrategy
  }
}

#[async_trait]
impl SupervisorStrategy for RestartingStrategy {
  async fn handle_child_failure(
    &self,
    actor_system: ActorSystem,
    supervisor: SupervisorHandle,
    child: Pid,
    _: RestartStatistics,
    reason: ErrorReason,
    _: Option<MessageHandle>,
  ) {
    log_failure(&actor_system, &child, reason, Directive::Restart).await;
    supervisor.restart_children(&[child]).await;
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
