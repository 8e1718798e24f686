use std::any::Any;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::message::{MessageOrEnvelope, SystemMessage};
use crate::actor::pid::Pid;

mod actor_future;
mod actor_process;
mod dead_letter_process;
mod process_registry;

pub use {self::actor_future::*, self::actor_process::*, self::dead_letter_process::*, self::process_registry::*};

/// Anything a [`Pid`] can resolve to: a local actor, a future, the dead-letter sink, or a
/// proxy supplied by a transport.
#[async_trait]
pub trait Process: Debug + Send + Sync + 'static {
  async fn send_user_message(&self, pid: Option<&Pid>, message: MessageOrEnvelope);
  async fn send_system_message(&self, pid: &Pid, message: SystemMessage);
  async fn stop(&self, pid: &Pid);
  /// Marks the process as removed from the registry.
  fn set_dead(&self) {}
  fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone)]
pub struct ProcessHandle(Arc<dyn Process>);

impl ProcessHandle {
  pub fn new_arc(process: Arc<dyn Process>) -> Self {
    ProcessHandle(process)
  }

  pub fn new(process: impl Process + 'static) -> Self {
    ProcessHandle(Arc::new(process))
  }
}

impl PartialEq for ProcessHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for ProcessHandle {}

impl Hash for ProcessHandle {
  fn hash<H: Hasher>(&self, state: &mut H) {
    (Arc::as_ptr(&self.0) as *const ()).hash(state);
  }
}

#[async_trait]
impl Process for ProcessHandle {
  async fn send_user_message(&self, pid: Option<&Pid>, message: MessageOrEnvelope) {
    self.0.send_user_message(pid, message).await;
  }

  async fn send_system_message(&self, pid: &Pid, message: SystemMessage) {
    self.0.send_system_message(pid, message).await;
  }

  async fn stop(&self, pid: &Pid) {
    self.0.stop(pid).await;
  }

  fn set_dead(&self) {
    self.0.set_dead();
  }

  fn as_any(&self) -> &dyn Any {
    self.0.as_any()
  }
}

static_assertions::assert_impl_all!(ProcessHandle: Send, Sync);
