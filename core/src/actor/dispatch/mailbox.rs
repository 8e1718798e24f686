use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::dispatch::dispatcher::DispatcherHandle;
use crate::actor::dispatch::message_invoker::MessageInvokerHandle;
use crate::actor::message::{MessageOrEnvelope, SystemMessage};

mod default_mailbox;

pub use self::default_mailbox::*;

/// Two-queue inbox of an actor; system messages always go first.
#[async_trait]
pub trait Mailbox: Debug + Send + Sync + 'static {
  async fn post_user_message(&self, message: MessageOrEnvelope);
  async fn post_system_message(&self, message: SystemMessage);
  async fn process_messages(&self);
  fn register_handlers(&self, message_invoker: MessageInvokerHandle, dispatcher: DispatcherHandle);
  fn get_user_messages_count(&self) -> i64;
  fn get_system_messages_count(&self) -> i64;
  fn is_suspended(&self) -> bool;
  fn is_closed(&self) -> bool;
  fn to_handle(&self) -> MailboxHandle;
}

#[derive(Debug, Clone)]
pub struct MailboxHandle(Arc<dyn Mailbox>);

impl MailboxHandle {
  pub fn new(mailbox: impl Mailbox + 'static) -> Self {
    MailboxHandle(Arc::new(mailbox))
  }
}

impl PartialEq for MailboxHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for MailboxHandle {}

#[async_trait]
impl Mailbox for MailboxHandle {
  async fn post_user_message(&self, message: MessageOrEnvelope) {
    self.0.post_user_message(message).await;
  }

  async fn post_system_message(&self, message: SystemMessage) {
    self.0.post_system_message(message).await;
  }

  async fn process_messages(&self) {
    self.0.process_messages().await;
  }

  fn register_handlers(&self, message_invoker: MessageInvokerHandle, dispatcher: DispatcherHandle) {
    self.0.register_handlers(message_invoker, dispatcher);
  }

  fn get_user_messages_count(&self) -> i64 {
    self.0.get_user_messages_count()
  }

  fn get_system_messages_count(&self) -> i64 {
    self.0.get_system_messages_count()
  }

  fn is_suspended(&self) -> bool {
    self.0.is_suspended()
  }

  fn is_closed(&self) -> bool {
    self.0.is_closed()
  }

  fn to_handle(&self) -> MailboxHandle {
    self.clone()
  }
}

static_assertions::assert_impl_all!(MailboxHandle: Send, Sync);
