use std::time::Duration;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{
  InfoPart, MessagePart, SenderContext, SenderContextHandle, SenderPart, SpawnerContext, SpawnerContextHandle,
  SpawnerPart, StopperPart,
};
use crate::actor::core::{
  make_sender_middleware_chain, make_spawn_middleware_chain, Props, SenderMiddleware, SenderMiddlewareChain,
  SenderTerminal, SpawnError, SpawnMiddleware, SpawnMiddlewareChain, Spawner,
};
use crate::actor::message::{wrap_envelope, MessageEnvelope, MessageHandle, MessageHeaders, MessageOrEnvelope};
use crate::actor::pid::Pid;
use crate::actor::process::{ActorFuture, ActorFutureProcess};
use crate::actor::supervisor::SupervisorStrategyHandle;

#[cfg(test)]
mod tests;

/// Entry point for code running outside of any actor.
///
/// A root context is an immutable value: every `with_*` call returns a derived context and
/// leaves the original untouched.
#[derive(Debug, Clone)]
pub struct RootContext {
  actor_system: ActorSystem,
  headers: MessageHeaders,
  sender_middleware: Vec<SenderMiddleware>,
  sender_middleware_chain: Option<SenderMiddlewareChain>,
  spawn_middleware: Vec<SpawnMiddleware>,
  spawn_middleware_chain: Option<SpawnMiddlewareChain>,
  guardian_strategy: Option<SupervisorStrategyHandle>,
}

impl RootContext {
  pub fn new(actor_system: ActorSystem) -> Self {
    Self {
      actor_system,
      headers: MessageHeaders::default(),
      sender_middleware: vec![],
      sender_middleware_chain: None,
      spawn_middleware: vec![],
      spawn_middleware_chain: None,
      guardian_strategy: None,
    }
  }

  pub fn with_headers(mut self, headers: MessageHeaders) -> Self {
    self.headers = headers;
    self
  }

  pub fn with_sender_middlewares(mut self, middlewares: impl IntoIterator<Item = SenderMiddleware>) -> Self {
    self.sender_middleware.extend(middlewares);
    self.sender_middleware_chain = make_sender_middleware_chain(&self.sender_middleware, SenderTerminal::deliver());
    self
  }

  pub fn with_spawn_middlewares(mut self, middlewares: impl IntoIterator<Item = SpawnMiddleware>) -> Self {
    self.spawn_middleware.extend(middlewares);
    self.spawn_middleware_chain = make_spawn_middleware_chain(
      &self.spawn_middleware,
      Spawner::new(|actor_system, name, props: Props, parent| async move {
        props.spawn(actor_system, &name, parent).await
      }),
    );
    self
  }

  /// Actors spawned from the derived context are supervised by the guardian of `strategy`.
  pub fn with_guardian(mut self, strategy: SupervisorStrategyHandle) -> Self {
    self.guardian_strategy = Some(strategy);
    self
  }

  pub fn get_headers(&self) -> &MessageHeaders {
    &self.headers
  }

  pub fn get_sender_middleware_chain(&self) -> Option<&SenderMiddlewareChain> {
    self.sender_middleware_chain.as_ref()
  }

  pub fn get_spawn_middleware_chain(&self) -> Option<&SpawnMiddlewareChain> {
    self.spawn_middleware_chain.as_ref()
  }

  pub fn get_guardian_strategy(&self) -> Option<&SupervisorStrategyHandle> {
    self.guardian_strategy.as_ref()
  }

  /// With sender middleware the chain always sees an envelope, whatever the caller passed.
  async fn send_user_message(&self, pid: Pid, message: MessageOrEnvelope) {
    match &self.sender_middleware_chain {
      Some(chain) => {
        chain
          .run(SenderContextHandle::new(self.clone()), pid, wrap_envelope(message))
          .await
      }
      None => pid.send_user_message(&self.actor_system, message).await,
    }
  }
}

#[async_trait]
impl InfoPart for RootContext {
  async fn get_parent(&self) -> Option<Pid> {
    None
  }

  async fn get_self_opt(&self) -> Option<Pid> {
    self.guardian_strategy.as_ref().map(|strategy| {
      self
        .actor_system
        .get_guardians()
        .get_guardian_pid(&self.actor_system, strategy)
    })
  }

  async fn get_actor_system(&self) -> ActorSystem {
    self.actor_system.clone()
  }
}

#[async_trait]
impl MessagePart for RootContext {
  async fn get_message_handle_opt(&self) -> Option<MessageHandle> {
    None
  }

  async fn get_message_header(&self) -> Option<MessageHeaders> {
    Some(self.headers.clone())
  }
}

#[async_trait]
impl SenderPart for RootContext {
  async fn get_sender(&self) -> Option<Pid> {
    None
  }

  async fn send(&self, pid: Pid, message_handle: MessageHandle) {
    self.send_user_message(pid, message_handle.into()).await
  }

  /// The root has no identity, so this is the same as `send`.
  async fn request(&self, pid: Pid, message_handle: MessageHandle) {
    self.send_user_message(pid, message_handle.into()).await
  }

  async fn request_with_custom_sender(&self, pid: Pid, message_handle: MessageHandle, sender: Pid) {
    let envelope = MessageEnvelope::new(message_handle).with_sender(sender);
    self.send_user_message(pid, envelope.into()).await
  }

  async fn request_future(&self, pid: Pid, message_handle: MessageHandle, timeout: Duration) -> ActorFuture {
    let future = ActorFutureProcess::new(self.actor_system.clone(), timeout);
    let envelope = MessageEnvelope::new(message_handle).with_sender(future.get_pid());
    self.send_user_message(pid, envelope.into()).await;
    future
  }
}

impl SenderContext for RootContext {}

#[async_trait]
impl SpawnerPart for RootContext {
  async fn spawn(&self, props: Props) -> Pid {
    let name = self.actor_system.get_process_registry().next_id();
    match self.spawn_named(props, &name).await {
      Ok(pid) => pid,
      Err(e) => panic!("Failed to spawn actor: {}", e),
    }
  }

  async fn spawn_prefix(&self, props: Props, prefix: &str) -> Pid {
    let name = format!("{}{}", prefix, self.actor_system.get_process_registry().next_id());
    match self.spawn_named(props, &name).await {
      Ok(pid) => pid,
      Err(e) => panic!("Failed to spawn actor: {}", e),
    }
  }

  async fn spawn_named(&self, props: Props, name: &str) -> Result<Pid, SpawnError> {
    let root_context = match props.get_guardian_strategy() {
      Some(strategy) => self.clone().with_guardian(strategy),
      None => self.clone(),
    };
    let actor_system = self.actor_system.clone();
    match &root_context.spawn_middleware_chain {
      Some(chain) => {
        let parent_context = SpawnerContextHandle::new(root_context.clone());
        chain.run(actor_system, name, props, parent_context).await
      }
      None => {
        props
          .spawn(actor_system, name, SpawnerContextHandle::new(root_context))
          .await
      }
    }
  }
}

impl SpawnerContext for RootContext {}

#[async_trait]
impl StopperPart for RootContext {
  async fn stop(&self, pid: &Pid) {
    pid.stop(&self.actor_system).await
  }
}
