use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::actor::actor_system::{ActorSystem, WeakActorSystem};
use crate::actor::core::ErrorReason;
use crate::actor::message::{MessageHandle, MessageOrEnvelope, SystemMessage};
use crate::actor::pid::Pid;
use crate::actor::process::{Process, ProcessHandle};
use crate::actor::supervisor::{Supervisor, SupervisorHandle, SupervisorStrategy, SupervisorStrategyHandle};


/// One guardian per distinct strategy instance, created on first use and kept for the
/// lifetime of the system.
#[derive(Debug, Clone, Default)]
pub struct GuardiansValue {
  guardians: Arc<DashMap<SupervisorStrategyHandle, GuardianProcess>>,
}

impl GuardiansValue {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get_guardian_pid(&self, actor_system: &ActorSystem, strategy: &SupervisorStrategyHandle) -> Pid {
    match self.guardians.entry(strategy.clone()) {
      Entry::Occupied(entry) => entry.get().get_pid(),
      Entry::Vacant(entry) => {
        let guardian = GuardianProcess::new(actor_system, strategy.clone());
        let pid = guardian.get_pid();
        entry.insert(guardian);
        pid
      }
    }
  }

  pub fn len(&self) -> usize {
    self.guardians.len()
  }

  pub fn is_empty(&self) -> bool {
    self.guardians.is_empty()
  }
}

#[derive(Debug)]
struct GuardianProcessInner {
  actor_system: WeakActorSystem,
  pid: Pid,
  strategy: SupervisorStrategyHandle,
}

/// Top-level supervisor of actors spawned from a root context bound to its strategy.
///
/// It only understands `Failure`; everything else sent to it is dropped.
#[derive(Debug, Clone)]
pub struct GuardianProcess {
  inner: Arc<GuardianProcessInner>,
}

impl GuardianProcess {
  fn new(actor_system: &ActorSystem, strategy: SupervisorStrategyHandle) -> Self {
    let process_registry = actor_system.get_process_registry();
    let id = format!("guardian{}", process_registry.next_id());
    let guardian = GuardianProcess {
      inner: Arc::new(GuardianProcessInner {
        actor_system: actor_system.downgrade(),
        pid: Pid::new(&process_registry.get_address(), &id),
        strategy,
      }),
    };
    let (pid, absent) = process_registry.add_process(ProcessHandle::new(guardian.clone()), &id);
    if !absent {
      tracing::error!("GuardianProcess: failed to register guardian process: pid = {}", pid);
    }
    guardian
  }

  pub fn get_pid(&self) -> Pid {
    self.inner.pid.clone()
  }
}

#[async_trait]
impl Process for GuardianProcess {
  async fn send_user_message(&self, _: Option<&Pid>, message: MessageOrEnvelope) {
    tracing::error!("GuardianProcess: guardian cannot receive user messages: {:?}", message);
  }

  async fn send_system_message(&self, _: &Pid, message: SystemMessage) {
    let SystemMessage::Failure(failure) = message else {
      tracing::debug!("GuardianProcess: ignored system message: {:?}", message);
      return;
    };
    let Some(actor_system) = self.inner.actor_system.upgrade() else {
      return;
    };
    let supervisor = SupervisorHandle::new(GuardianSupervisor {
      actor_system: actor_system.clone(),
      child: failure.who.clone(),
    });
    self
      .inner
      .strategy
      .handle_child_failure(
        actor_system,
        supervisor,
        failure.who,
        failure.restart_stats,
        failure.reason,
        failure.message_handle,
      )
      .await;
  }

  async fn stop(&self, _: &Pid) {}

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Supervisor handed to the strategy for one failing child of a guardian.
#[derive(Debug)]
struct GuardianSupervisor {
  actor_system: ActorSystem,
  child: Pid,
}

impl GuardianSupervisor {
  async fn send_all(&self, pids: &[Pid], message: SystemMessage) {
    for pid in pids {
      pid.send_system_message(&self.actor_system, message.clone()).await;
    }
  }
}

#[async_trait]
impl Supervisor for GuardianSupervisor {
  async fn get_children(&self) -> Vec<Pid> {
    vec![self.child.clone()]
  }

  /// There is nobody above a guardian: the child is stopped instead.
  async fn escalate_failure(&self, reason: ErrorReason, _: Option<MessageHandle>) {
    tracing::warn!(
      "GuardianProcess: escalation reached the guardian, stopping {}: {}",
      self.child,
      reason
    );
    self.child.stop(&self.actor_system).await;
  }

  async fn restart_children(&self, pids: &[Pid]) {
    self.send_all(pids, SystemMessage::Restart).await;
  }

  async fn stop_children(&self, pids: &[Pid]) {
    for pid in pids {
      pid.stop(&self.actor_system).await;
    }
  }

  async fn resume_children(&self, pids: &[Pid]) {
    self.send_all(pids, SystemMessage::ResumeMailbox).await;
  }
}
