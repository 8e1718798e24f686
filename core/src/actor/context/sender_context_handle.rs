use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{InfoPart, MessagePart, SenderContext, SenderPart};
use crate::actor::message::{MessageHandle, MessageHeaders};
use crate::actor::pid::Pid;
use crate::actor::process::ActorFuture;

/// Context handed to sender middleware.
#[derive(Debug, Clone)]
pub struct SenderContextHandle(Arc<dyn SenderContext>);

impl SenderContextHandle {
  pub fn new_arc(context: Arc<dyn SenderContext>) -> Self {
    SenderContextHandle(context)
  }

  pub fn new(context: impl SenderContext + 'static) -> Self {
    SenderContextHandle(Arc::new(context))
  }
}

#[async_trait]
impl InfoPart for SenderContextHandle {
  async fn get_parent(&self) -> Option<Pid> {
    self.0.get_parent().await
  }

  async fn get_self_opt(&self) -> Option<Pid> {
    self.0.get_self_opt().await
  }

  async fn get_actor_system(&self) -> ActorSystem {
    self.0.get_actor_system().await
  }
}

#[async_trait]
impl SenderPart for SenderContextHandle {
  async fn get_sender(&self) -> Option<Pid> {
    self.0.get_sender().await
  }

  async fn send(&self, pid: Pid, message_handle: MessageHandle) {
    self.0.send(pid, message_handle).await
  }

  async fn request(&self, pid: Pid, message_handle: MessageHandle) {
    self.0.request(pid, message_handle).await
  }

  async fn request_with_custom_sender(&self, pid: Pid, message_handle: MessageHandle, sender: Pid) {
    self.0.request_with_custom_sender(pid, message_handle, sender).await
  }

  async fn request_future(&self, pid: Pid, message_handle: MessageHandle, timeout: Duration) -> ActorFuture {
    self.0.request_future(pid, message_handle, timeout).await
  }
}

#[async_trait]
impl MessagePart for SenderContextHandle {
  async fn get_message_handle_opt(&self) -> Option<MessageHandle> {
    self.0.get_message_handle_opt().await
  }

  async fn get_message_header(&self) -> Option<MessageHeaders> {
    self.0.get_message_header().await
  }
}

impl SenderContext for SenderContextHandle {}

static_assertions::assert_impl_all!(SenderContextHandle: Send, Sync);
