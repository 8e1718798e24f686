use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::actor::actor_system::ActorSystem;
use crate::actor::message::{MessageHandle, MessageOrEnvelope, SystemMessage};
use crate::actor::process::Process;


/// Address every process answers to on this node.
pub const LOCAL_ADDRESS: &str = "nonhost";

/// Opaque, comparable handle of a process.
///
/// A `Pid` is a plain value: it never holds on to the process it names, so sending to a
/// `Pid` whose process is gone simply lands in dead letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid {
  pub address: String,
  pub id: String,
}

static_assertions::assert_impl_all!(Pid: Send, Sync);

impl Pid {
  pub fn new(address: &str, id: &str) -> Self {
    Pid {
      address: address.to_string(),
      id: id.to_string(),
    }
  }

  pub fn address(&self) -> &str {
    &self.address
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  /// An empty address is shorthand for "this node".
  pub fn is_local_to(&self, node_address: &str) -> bool {
    self.address.is_empty() || self.address == LOCAL_ADDRESS || self.address == node_address
  }

  pub async fn send_user_message(&self, actor_system: &ActorSystem, message: MessageOrEnvelope) {
    let process = actor_system.get_process_registry().get_process(self).await;
    process.send_user_message(Some(self), message).await;
  }

  pub async fn send_message(&self, actor_system: &ActorSystem, message_handle: MessageHandle) {
    self
      .send_user_message(actor_system, MessageOrEnvelope::of_message(message_handle))
      .await;
  }

  pub async fn send_system_message(&self, actor_system: &ActorSystem, message: SystemMessage) {
    let process = actor_system.get_process_registry().get_process(self).await;
    process.send_system_message(self, message).await;
  }

  pub async fn stop(&self, actor_system: &ActorSystem) {
    let process = actor_system.get_process_registry().get_process(self).await;
    process.stop(self).await;
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.address, self.id)
  }
}
