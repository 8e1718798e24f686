use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::core::{ActorError, ErrorReason};
use crate::actor::message::{MessageHandle, MessageOrEnvelope, SystemMessage};

/// The consumer side of a mailbox.
#[async_trait]
pub trait MessageInvoker: Debug + Send + Sync {
  async fn invoke_system_message(&self, message: SystemMessage) -> Result<(), ActorError>;
  async fn invoke_user_message(&self, message: MessageOrEnvelope) -> Result<(), ActorError>;
  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>);
}

#[derive(Debug, Clone)]
pub struct MessageInvokerHandle(Arc<dyn MessageInvoker>);

impl MessageInvokerHandle {
  pub fn new(invoker: Arc<dyn MessageInvoker>) -> Self {
    MessageInvokerHandle(invoker)
  }
}

impl PartialEq for MessageInvokerHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for MessageInvokerHandle {}

#[async_trait]
impl MessageInvoker for MessageInvokerHandle {
  async fn invoke_system_message(&self, message: SystemMessage) -> Result<(), ActorError> {
    self.0.invoke_system_message(message).await
  }

  async fn invoke_user_message(&self, message: MessageOrEnvelope) -> Result<(), ActorError> {
    self.0.invoke_user_message(message).await
  }

  async fn escalate_failure(&self, reason: ErrorReason, message_handle: Option<MessageHandle>) {
    self.0.escalate_failure(reason, message_handle).await;
  }
}

static_assertions::assert_impl_all!(MessageInvokerHandle: Send, Sync);
