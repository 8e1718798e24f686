use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::ErrorReason;
use crate::actor::message::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::restart_statistics::RestartStatistics;
use crate::actor::supervisor::supervisor_strategy::{SupervisorHandle, SupervisorStrategy};

/// Shared strategy. Two handles are equal only when they point at the same instance, which is
/// what keys guardians.
#[derive(Debug, Clone)]
pub struct SupervisorStrategyHandle(Arc<dyn SupervisorStrategy>);

impl SupervisorStrategyHandle {
  pub fn new_arc(strategy: Arc<dyn SupervisorStrategy>) -> Self {
    SupervisorStrategyHandle(strategy)
  }

  pub fn new(strategy: impl SupervisorStrategy + 'static) -> Self {
    SupervisorStrategyHandle(Arc::new(strategy))
  }
}

impl PartialEq for SupervisorStrategyHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for SupervisorStrategyHandle {}

impl Hash for SupervisorStrategyHandle {
  fn hash<H: Hasher>(&self, state: &mut H) {
    (Arc::as_ptr(&self.0) as *const ()).hash(state);
  }
}

#[async_trait]
impl SupervisorStrategy for SupervisorStrategyHandle {
  async fn handle_child_failure(
    &self,
    actor_system: ActorSystem,
    supervisor: SupervisorHandle,
    child: Pid,
    rs: RestartStatistics,
    reason: ErrorReason,
    message_handle: Option<MessageHandle>,
  ) {
    self
      .0
      .handle_child_failure(actor_system, supervisor, child, rs, reason, message_handle)
      .await;
  }

  fn as_any(&self) -> &dyn Any {
    self.0.as_any()
  }
}

static_assertions::assert_impl_all!(SupervisorStrategyHandle: Send, Sync);
