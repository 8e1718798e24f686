use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::{Props, SpawnError};
use crate::actor::message::{MessageHandle, MessageHeaders};
use crate::actor::pid::Pid;
use crate::actor::process::ActorFuture;

mod actor_context;
mod root_context;
mod sender_context_handle;
mod spawner_context_handle;

pub use {
  self::actor_context::*, self::root_context::*, self::sender_context_handle::*, self::spawner_context_handle::*,
};

pub trait SenderContext: InfoPart + SenderPart + MessagePart + Send + Sync + 'static {}

pub trait SpawnerContext: InfoPart + SpawnerPart + Send + Sync + 'static {}

#[async_trait]
pub trait InfoPart: Debug + Send + Sync + 'static {
  /// Pid of the parent; `None` at the root.
  async fn get_parent(&self) -> Option<Pid>;

  /// Pid of the current actor. At the root this is the guardian's pid when one is bound.
  async fn get_self_opt(&self) -> Option<Pid>;

  async fn get_actor_system(&self) -> ActorSystem;
}

#[async_trait]
pub trait MessagePart: Debug + Send + Sync + 'static {
  /// Payload currently being processed.
  async fn get_message_handle_opt(&self) -> Option<MessageHandle>;

  async fn get_message_header(&self) -> Option<MessageHeaders>;
}

#[async_trait]
pub trait SenderPart: Debug + Send + Sync + 'static {
  /// Sender of the message currently being processed.
  async fn get_sender(&self) -> Option<Pid>;

  /// Fire-and-forget, no sender attached.
  async fn send(&self, pid: Pid, message_handle: MessageHandle);

  /// Fire-and-forget with the current actor as sender.
  async fn request(&self, pid: Pid, message_handle: MessageHandle);

  async fn request_with_custom_sender(&self, pid: Pid, message_handle: MessageHandle, sender: Pid);

  /// Sends with a fresh future as sender. A zero `timeout` waits forever.
  async fn request_future(&self, pid: Pid, message_handle: MessageHandle, timeout: Duration) -> ActorFuture;
}

#[async_trait]
pub trait SpawnerPart: Send + Sync + 'static {
  /// Spawns under a generated name. A collision of generated names is a bug and panics.
  async fn spawn(&self, props: Props) -> Pid;

  async fn spawn_prefix(&self, props: Props, prefix: &str) -> Pid;

  /// Fails with [`SpawnError::NameExists`] when the name is taken.
  async fn spawn_named(&self, props: Props, name: &str) -> Result<Pid, SpawnError>;
}

#[async_trait]
pub trait StopperPart: Debug + Send + Sync + 'static {
  /// Stops the actor right away; pending user messages are dropped.
  async fn stop(&self, pid: &Pid);
}
