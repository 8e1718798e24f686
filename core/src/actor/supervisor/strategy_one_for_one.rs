use std::any::Any;
use std::time::Duration;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::ErrorReason;
use crate::actor::message::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::directive::Directive;
use crate::actor::supervisor::restart_statistics::RestartStatistics;
use crate::actor::supervisor::supervisor_strategy::{
  default_decider, log_failure, Decider, Supervisor, SupervisorHandle, SupervisorStrategy,
};

#[cfg(test)]
mod tests;

/// Applies the decider's directive to the failing child only.
///
/// A restart turns into a stop once the child failed more than `max_nr_of_retries` times
/// within `within_duration`.
#[derive(Debug, Clone)]
pub struct OneForOneStrategy {
  max_nr_of_retries: u32,
  within_duration: Duration,
  decider: Decider,
}

impl OneForOneStrategy {
  pub fn new(max_nr_of_retries: u32, within_duration: Duration) -> Self {
    OneForOneStrategy {
      max_nr_of_retries,
      within_duration,
      decider: Decider::new(default_decider),
    }
  }

  pub fn with_decider<F, Fut>(mut self, decider: F) -> Self
  where
    F: Fn(ErrorReason) -> Fut + Send + Sync + 'static,
    Fut: futures::future::Future<Output = Directive> + Send + 'static, {
    self.decider = Decider::new(decider);
    self
  }

  pub(crate) async fn should_stop(&self, rs: &RestartStatistics) -> bool {
    if self.max_nr_of_retries == 0 {
      return true;
    }
    rs.fail().await;
    if rs.number_of_failures(self.within_duration).await > self.max_nr_of_retries {
      tracing::debug!("OneForOneStrategy: too many failures, stopping");
      rs.reset().await;
      true
    } else {
      false
    }
  }
}

impl PartialEq for OneForOneStrategy {
  fn eq(&self, other: &Self) -> bool {
    self.max_nr_of_retries == other.max_nr_of_retries
      && self.within_duration == other.within_duration
      && self.decider == other.decider
  }
}

impl Eq for OneForOneStrategy {}

#[async_trait]
impl SupervisorStrategy for OneForOneStrategy {
  async fn handle_child_failure(
    &self,
    actor_system: ActorSystem,
    supervisor: SupervisorHandle,
    child: Pid,
    rs: RestartStatistics,
    reason: ErrorReason,
    message_handle: Option<MessageHandle>,
  ) {
    let directive = self.decider.run(reason.clone()).await;
    tracing::debug!(
      "OneForOneStrategy::handle_child_failure: child = {}, directive = {}, message = {:?}",
      child,
      directive,
      message_handle
    );
    match directive {
      Directive::Resume => {
        log_failure(&actor_system, &child, reason, directive).await;
        supervisor.resume_children(&[child]).await
      }
      Directive::Restart => {
        if self.should_stop(&rs).await {
          log_failure(&actor_system, &child, reason, Directive::Stop).await;
          supervisor.stop_children(&[child]).await;
        } else {
          log_failure(&actor_system, &child, reason, Directive::Restart).await;
          supervisor.restart_children(&[child]).await;
        }
      }
      Directive::Stop => {
        log_failure(&actor_system, &child, reason, directive).await;
        supervisor.stop_children(&[child]).await
      }
      Directive::Escalate => {
        log_failure(&actor_system, &child, reason.clone(), directive).await;
        supervisor.escalate_failure(reason, message_handle).await
      }
    }
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
