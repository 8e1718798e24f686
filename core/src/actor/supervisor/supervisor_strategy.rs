use std::any::Any;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;
use once_cell::sync::Lazy;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::ErrorReason;
use crate::actor::message::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::directive::Directive;
use crate::actor::supervisor::restart_statistics::RestartStatistics;
use crate::actor::supervisor::strategy_one_for_one::OneForOneStrategy;
use crate::actor::supervisor::supervision_event::SupervisorEvent;
use crate::actor::supervisor::supervisor_strategy_handle::SupervisorStrategyHandle;

/// Strategy used when neither the actor nor its props name one: up to 10 restarts in 10 seconds.
pub static DEFAULT_SUPERVISION_STRATEGY: Lazy<SupervisorStrategyHandle> =
  Lazy::new(|| SupervisorStrategyHandle::new(OneForOneStrategy::new(10, Duration::from_secs(10))));

/// Maps a failure reason to a directive.
#[derive(Clone)]
pub struct Decider(Arc<dyn Fn(ErrorReason) -> BoxFuture<'static, Directive> + Send + Sync + 'static>);

impl Decider {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(ErrorReason) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Directive> + Send + 'static, {
    Decider(Arc::new(move |error| Box::pin(f(error))))
  }

  pub async fn run(&self, reason: ErrorReason) -> Directive {
    (self.0)(reason).await
  }
}

impl Debug for Decider {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Decider")
  }
}

impl PartialEq for Decider {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Decider {}

pub async fn default_decider(_: ErrorReason) -> Directive {
  Directive::Restart
}

#[async_trait]
pub trait SupervisorStrategy: Debug + Send + Sync {
  async fn handle_child_failure(
    &self,
    actor_system: ActorSystem,
    supervisor: SupervisorHandle,
    child: Pid,
    rs: RestartStatistics,
    reason: ErrorReason,
    message_handle: Option<MessageHandle>,
  );

  fn as_any(&self) -> &dyn Any;
}

/// The side of an actor (or guardian) that directives are applied to.
#[async_trait]
pub trait Supervisor: Debug + Send + Sync + 'static {
  async fn get_children(&self) -> Vec<Pid>;
  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>);
  async fn restart_children(&self, pids: &[Pid]);
  async fn stop_children(&self, pids: &[Pid]);
  async fn resume_children(&self, pids: &[Pid]);
}

#[derive(Debug, Clone)]
pub struct SupervisorHandle(Arc<dyn Supervisor>);

impl SupervisorHandle {
  pub fn new_arc(supervisor: Arc<dyn Supervisor>) -> Self {
    SupervisorHandle(supervisor)
  }

  pub fn new(supervisor: impl Supervisor + 'static) -> Self {
    SupervisorHandle(Arc::new(supervisor))
  }
}

impl PartialEq for SupervisorHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for SupervisorHandle {}

#[async_trait]
impl Supervisor for SupervisorHandle {
  async fn get_children(&self) -> Vec<Pid> {
    self.0.get_children().await
  }

  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>) {
    self.0.escalate_failure(reason, message_handle).await;
  }

  async fn restart_children(&self, pids: &[Pid]) {
    self.0.restart_children(pids).await;
  }

  async fn stop_children(&self, pids: &[Pid]) {
    self.0.stop_children(pids).await;
  }

  async fn resume_children(&self, pids: &[Pid]) {
    self.0.resume_children(pids).await;
  }
}

static_assertions::assert_impl_all!(SupervisorHandle: Send, Sync);

/// Publishes the decision on the event stream.
pub async fn log_failure(actor_system: &ActorSystem, child: &Pid, reason: ErrorReason, directive: Directive) {
  if actor_system.get_config().developer_supervision_logging {
    tracing::error!("Supervision: child = {}, directive = {}, reason = {}", child, directive, reason);
  }
  actor_system
    .get_event_stream()
    .publish(MessageHandle::new(SupervisorEvent {
      child: child.clone(),
      reason,
      directive,
    }))
    .await;
}
