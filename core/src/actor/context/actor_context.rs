use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::OwnedMutexGuard;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{
  InfoPart, MessagePart, SenderContext, SenderContextHandle, SenderPart, SpawnerContext, SpawnerContextHandle,
  SpawnerPart, StopperPart,
};
use crate::actor::core::{Actor, ActorError, ActorHandle, ErrorReason, PidSet, Props, SpawnError};
use crate::actor::dispatch::MessageInvoker;
use crate::actor::message::{
  wrap_envelope, Failure, MessageEnvelope, MessageHandle, MessageHeaders, MessageOrEnvelope, SystemMessage, Terminated,
};
use crate::actor::pid::Pid;
use crate::actor::process::{ActorFuture, ActorFutureProcess, Process};
use crate::actor::supervisor::{
  RestartStatistics, Supervisor, SupervisorHandle, SupervisorStrategy, SupervisorStrategyHandle,
  DEFAULT_SUPERVISION_STRATEGY,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextState {
  Alive,
  Restarting,
  Stopping,
  Stopped,
}

#[derive(Debug)]
struct ActorContextInner {
  actor_system: ActorSystem,
  props: Props,
  parent: Option<Pid>,
  self_pid: Pid,
  actor: RwLock<Option<ActorHandle>>,
  message_or_envelope: RwLock<Option<MessageOrEnvelope>>,
  children: PidSet,
  watchers: PidSet,
  restart_stats: RestartStatistics,
  state: Mutex<ContextState>,
}

/// Context of one actor: what its receive logic sees, what its mailbox invokes and what its
/// children's failures are reported to.
#[derive(Debug, Clone)]
pub struct ActorContext {
  inner: Arc<ActorContextInner>,
}

static_assertions::assert_impl_all!(ActorContext: Send, Sync);

impl ActorContext {
  /// Builds the context and produces the first actor instance.
  pub async fn new(actor_system: ActorSystem, props: Props, parent: Option<Pid>, self_pid: Pid) -> Self {
    let ctx = ActorContext {
      inner: Arc::new(ActorContextInner {
        actor_system,
        props,
        parent,
        self_pid,
        actor: RwLock::new(None),
        message_or_envelope: RwLock::new(None),
        children: PidSet::new(),
        watchers: PidSet::new(),
        restart_stats: RestartStatistics::new(),
        state: Mutex::new(ContextState::Alive),
      }),
    };
    ctx.incarnate_actor().await;
    ctx
  }

  pub fn get_self(&self) -> Pid {
    self.inner.self_pid.clone()
  }

  pub fn get_props(&self) -> &Props {
    &self.inner.props
  }

  pub fn get_actor(&self) -> Option<ActorHandle> {
    self.inner.actor.read().clone()
  }

  pub fn get_children(&self) -> Vec<Pid> {
    self.inner.children.to_vec()
  }

  /// Replies to the sender of the current message, or to dead letters when there is none.
  pub async fn respond(&self, message_handle: MessageHandle) {
    match self.get_sender().await {
      Some(sender) => self.send(sender, message_handle).await,
      None => {
        self
          .inner
          .actor_system
          .get_dead_letter()
          .send_user_message(None, message_handle.into())
          .await
      }
    }
  }

  /// Passes the current message on, sender and headers included.
  pub async fn forward(&self, pid: &Pid) {
    if let Some(message) = self.get_message_or_envelope() {
      pid.send_user_message(&self.inner.actor_system, message).await;
    }
  }

  /// `pid` will report its termination to this actor as a [`Terminated`] message.
  pub async fn watch(&self, pid: &Pid) {
    pid
      .send_system_message(&self.inner.actor_system, SystemMessage::Watch(self.get_self()))
      .await;
  }

  pub async fn unwatch(&self, pid: &Pid) {
    pid
      .send_system_message(&self.inner.actor_system, SystemMessage::Unwatch(self.get_self()))
      .await;
  }

  fn get_message_or_envelope(&self) -> Option<MessageOrEnvelope> {
    self.inner.message_or_envelope.read().clone()
  }

  fn set_message_or_envelope(&self, message: Option<MessageOrEnvelope>) {
    *self.inner.message_or_envelope.write() = message;
  }

  fn get_state(&self) -> ContextState {
    *self.inner.state.lock()
  }

  fn set_state(&self, state: ContextState) {
    *self.inner.state.lock() = state;
  }

  async fn incarnate_actor(&self) {
    let actor = self.inner.props.get_producer().run(self.clone()).await;
    *self.inner.actor.write() = Some(actor);
  }

  async fn lock_actor(&self) -> Option<OwnedMutexGuard<dyn Actor>> {
    let actor = self.get_actor()?;
    Some(actor.inner().clone().lock_owned().await)
  }

  async fn send_user_message(&self, pid: Pid, message: MessageOrEnvelope) {
    match self.inner.props.get_sender_middleware_chain() {
      Some(chain) => {
        chain
          .run(SenderContextHandle::new(self.clone()), pid, wrap_envelope(message))
          .await
      }
      None => pid.send_user_message(&self.inner.actor_system, message).await,
    }
  }

  async fn receive(&self, message: MessageOrEnvelope) -> Result<(), ActorError> {
    self.set_message_or_envelope(Some(message));
    let result = match self.lock_actor().await {
      Some(mut actor) => actor.receive(self.clone()).await,
      None => Ok(()),
    };
    self.set_message_or_envelope(None);
    result
  }

  async fn handle_start(&self) -> Result<(), ActorError> {
    match self.lock_actor().await {
      Some(mut actor) => actor.pre_start(self.clone()).await,
      None => Ok(()),
    }
  }

  async fn handle_watch(&self, watcher: Pid) {
    if matches!(self.get_state(), ContextState::Stopping | ContextState::Stopped) {
      watcher
        .send_system_message(&self.inner.actor_system, SystemMessage::Terminated(self.get_self()))
        .await;
    } else {
      self.inner.watchers.add(watcher);
    }
  }

  async fn handle_terminated(&self, who: Pid) -> Result<(), ActorError> {
    if self.inner.children.remove(&who) {
      return match self.lock_actor().await {
        Some(mut actor) => actor.post_child_terminate(self.clone(), &who).await,
        None => Ok(()),
      };
    }
    self
      .receive(MessageOrEnvelope::of_message(MessageHandle::new(Terminated { who })))
      .await
  }

  async fn handle_stop(&self) -> Result<(), ActorError> {
    {
      let mut state = self.inner.state.lock();
      if matches!(*state, ContextState::Stopping | ContextState::Stopped) {
        return Ok(());
      }
      *state = ContextState::Stopping;
    }
    tracing::debug!("ActorContext: stopping {}", self.inner.self_pid);

    if let Some(mut actor) = self.lock_actor().await {
      if let Err(e) = actor.pre_stop(self.clone()).await {
        tracing::error!("ActorContext: pre_stop of {} failed: {}", self.inner.self_pid, e);
      }
    }
    self.stop_all_children().await;
    self.finalize_stop().await;
    Ok(())
  }

  async fn finalize_stop(&self) {
    let actor_system = &self.inner.actor_system;
    actor_system.get_process_registry().remove_process(&self.inner.self_pid);

    if let Some(mut actor) = self.lock_actor().await {
      if let Err(e) = actor.post_stop(self.clone()).await {
        tracing::error!("ActorContext: post_stop of {} failed: {}", self.inner.self_pid, e);
      }
    }
    *self.inner.actor.write() = None;

    let terminated = SystemMessage::Terminated(self.get_self());
    for watcher in self.inner.watchers.to_vec() {
      watcher.send_system_message(actor_system, terminated.clone()).await;
    }
    self.inner.watchers.clear();
    if let Some(parent) = &self.inner.parent {
      parent.send_system_message(actor_system, terminated).await;
    }
    self.set_state(ContextState::Stopped);
    tracing::debug!("ActorContext: stopped {}", self.inner.self_pid);
  }

  async fn stop_all_children(&self) {
    for child in self.inner.children.to_vec() {
      child.stop(&self.inner.actor_system).await;
    }
  }

  /// Replaces the actor instance; pid, mailbox, watchers and restart statistics survive.
  async fn handle_restart(&self) -> Result<(), ActorError> {
    self.set_state(ContextState::Restarting);
    let result = self.restart().await;
    if self.get_state() == ContextState::Restarting {
      self.set_state(ContextState::Alive);
    }
    self
      .inner
      .self_pid
      .send_system_message(&self.inner.actor_system, SystemMessage::ResumeMailbox)
      .await;
    result
  }

  async fn restart(&self) -> Result<(), ActorError> {
    tracing::debug!("ActorContext: restarting {}", self.inner.self_pid);
    if let Some(mut actor) = self.lock_actor().await {
      actor.pre_restart(self.clone()).await?;
    }
    self.stop_all_children().await;
    self.set_message_or_envelope(None);
    self.incarnate_actor().await;
    match self.lock_actor().await {
      Some(mut actor) => actor.post_restart(self.clone()).await,
      None => Ok(()),
    }
  }

  async fn get_supervisor_strategy(&self) -> SupervisorStrategyHandle {
    let from_actor = match self.lock_actor().await {
      Some(actor) => actor.get_supervisor_strategy().await,
      None => None,
    };
    from_actor
      .or_else(|| self.inner.props.get_supervisor_strategy())
      .unwrap_or_else(|| DEFAULT_SUPERVISION_STRATEGY.clone())
  }

  async fn handle_failure(&self, failure: Failure) {
    let strategy = self.get_supervisor_strategy().await;
    strategy
      .handle_child_failure(
        self.inner.actor_system.clone(),
        SupervisorHandle::new(self.clone()),
        failure.who,
        failure.restart_stats,
        failure.reason,
        failure.message_handle,
      )
      .await;
  }

  /// Suspends this actor and reports the failure to the parent. Without a parent the
  /// default strategy decides, with this context as the supervisor.
  async fn escalate(&self, reason: ErrorReason, message_handle: Option<MessageHandle>) {
    let actor_system = &self.inner.actor_system;
    self
      .inner
      .self_pid
      .send_system_message(actor_system, SystemMessage::SuspendMailbox)
      .await;
    let failure = Failure::new(
      self.get_self(),
      reason,
      self.inner.restart_stats.clone(),
      message_handle,
    );
    match &self.inner.parent {
      Some(parent) => {
        parent
          .send_system_message(actor_system, SystemMessage::of_failure(failure))
          .await
      }
      None => {
        DEFAULT_SUPERVISION_STRATEGY
          .handle_child_failure(
            actor_system.clone(),
            SupervisorHandle::new(self.clone()),
            failure.who,
            failure.restart_stats,
            failure.reason,
            failure.message_handle,
          )
          .await
      }
    }
  }

  async fn send_system_message_to_all(&self, pids: &[Pid], message: SystemMessage) {
    for pid in pids {
      pid
        .send_system_message(&self.inner.actor_system, message.clone())
        .await;
    }
  }
}

#[async_trait]
impl InfoPart for ActorContext {
  async fn get_parent(&self) -> Option<Pid> {
    self.inner.parent.clone()
  }

  async fn get_self_opt(&self) -> Option<Pid> {
    Some(self.get_self())
  }

  async fn get_actor_system(&self) -> ActorSystem {
    self.inner.actor_system.clone()
  }
}

#[async_trait]
impl MessagePart for ActorContext {
  async fn get_message_handle_opt(&self) -> Option<MessageHandle> {
    self.get_message_or_envelope().map(|m| m.get_message_handle())
  }

  async fn get_message_header(&self) -> Option<MessageHeaders> {
    self.get_message_or_envelope().and_then(|m| m.get_header())
  }
}

#[async_trait]
impl SenderPart for ActorContext {
  async fn get_sender(&self) -> Option<Pid> {
    self.get_message_or_envelope().and_then(|m| m.get_sender())
  }

  async fn send(&self, pid: Pid, message_handle: MessageHandle) {
    self.send_user_message(pid, message_handle.into()).await
  }

  async fn request(&self, pid: Pid, message_handle: MessageHandle) {
    let envelope = MessageEnvelope::new(message_handle).with_sender(self.get_self());
    self.send_user_message(pid, envelope.into()).await
  }

  async fn request_with_custom_sender(&self, pid: Pid, message_handle: MessageHandle, sender: Pid) {
    let envelope = MessageEnvelope::new(message_handle).with_sender(sender);
    self.send_user_message(pid, envelope.into()).await
  }

  async fn request_future(&self, pid: Pid, message_handle: MessageHandle, timeout: Duration) -> ActorFuture {
    let future = ActorFutureProcess::new(self.inner.actor_system.clone(), timeout);
    let envelope = MessageEnvelope::new(message_handle).with_sender(future.get_pid());
    self.send_user_message(pid, envelope.into()).await;
    future
  }
}

impl SenderContext for ActorContext {}

#[async_trait]
impl SpawnerPart for ActorContext {
  async fn spawn(&self, props: Props) -> Pid {
    let name = self.inner.actor_system.get_process_registry().next_id();
    match self.spawn_named(props, &name).await {
      Ok(pid) => pid,
      Err(e) => panic!("Failed to spawn child: {}", e),
    }
  }

  async fn spawn_prefix(&self, props: Props, prefix: &str) -> Pid {
    let name = format!("{}{}", prefix, self.inner.actor_system.get_process_registry().next_id());
    match self.spawn_named(props, &name).await {
      Ok(pid) => pid,
      Err(e) => panic!("Failed to spawn child: {}", e),
    }
  }

  /// Children are registered as `parent_id/name`.
  async fn spawn_named(&self, props: Props, name: &str) -> Result<Pid, SpawnError> {
    if props.get_guardian_strategy().is_some() {
      return Err(SpawnError::Rejected(
        "props used to spawn a child cannot have a guardian strategy".to_string(),
      ));
    }
    let id = format!("{}/{}", self.inner.self_pid.id(), name);
    let actor_system = self.inner.actor_system.clone();
    let parent_context = SpawnerContextHandle::new(self.clone());
    let result = match self.inner.props.get_spawn_middleware_chain() {
      Some(chain) => chain.run(actor_system, &id, props, parent_context).await,
      None => props.spawn(actor_system, &id, parent_context).await,
    };
    if let Ok(pid) = &result {
      self.inner.children.add(pid.clone());
    }
    result
  }
}

impl SpawnerContext for ActorContext {}

#[async_trait]
impl StopperPart for ActorContext {
  async fn stop(&self, pid: &Pid) {
    pid.stop(&self.inner.actor_system).await
  }
}

#[async_trait]
impl MessageInvoker for ActorContext {
  async fn invoke_system_message(&self, message: SystemMessage) -> Result<(), ActorError> {
    match message {
      SystemMessage::Started => self.handle_start().await,
      SystemMessage::Stop => self.handle_stop().await,
      SystemMessage::Restart => self.handle_restart().await,
      SystemMessage::Failure(failure) => {
        self.handle_failure(failure).await;
        Ok(())
      }
      SystemMessage::Watch(watcher) => {
        self.handle_watch(watcher).await;
        Ok(())
      }
      SystemMessage::Unwatch(watcher) => {
        self.inner.watchers.remove(&watcher);
        Ok(())
      }
      SystemMessage::Terminated(who) => self.handle_terminated(who).await,
      SystemMessage::SuspendMailbox | SystemMessage::ResumeMailbox => Ok(()),
    }
  }

  async fn invoke_user_message(&self, message: MessageOrEnvelope) -> Result<(), ActorError> {
    if matches!(self.get_state(), ContextState::Stopping | ContextState::Stopped) {
      tracing::debug!("ActorContext: {} is stopping, dropped {:?}", self.inner.self_pid, message);
      return Ok(());
    }
    self.receive(message).await
  }

  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>) {
    self.escalate(reason, message_handle).await
  }
}

#[async_trait]
impl Supervisor for ActorContext {
  async fn get_children(&self) -> Vec<Pid> {
    self.inner.children.to_vec()
  }

  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>) {
    self.escalate(reason, message_handle).await
  }

  async fn restart_children(&self, pids: &[Pid]) {
    self.send_system_message_to_all(pids, SystemMessage::Restart).await
  }

  async fn stop_children(&self, pids: &[Pid]) {
    for pid in pids {
      pid.stop(&self.inner.actor_system).await;
    }
  }

  async fn resume_children(&self, pids: &[Pid]) {
    self.send_system_message_to_all(pids, SystemMessage::ResumeMailbox).await
  }
}
