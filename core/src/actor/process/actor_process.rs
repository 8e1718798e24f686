use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::actor::dispatch::{Mailbox, MailboxHandle};
use crate::actor::message::{MessageOrEnvelope, SystemMessage};
use crate::actor::pid::Pid;
use crate::actor::process::Process;

/// Registry entry of a local actor: everything sent to it goes to its mailbox.
#[derive(Debug, Clone)]
pub struct ActorProcess {
  mailbox: MailboxHandle,
  dead: Arc<AtomicBool>,
}

impl ActorProcess {
  pub fn new(mailbox: MailboxHandle) -> Self {
    Self {
      mailbox,
      dead: Arc::new(AtomicBool::new(false)),
    }
  }

  pub fn is_dead(&self) -> bool {
    self.dead.load(Ordering::SeqCst)
  }

  pub fn get_mailbox(&self) -> MailboxHandle {
    self.mailbox.clone()
  }
}

#[async_trait]
impl Process for ActorProcess {
  async fn send_user_message(&self, _: Option<&Pid>, message: MessageOrEnvelope) {
    self.mailbox.post_user_message(message).await;
  }

  async fn send_system_message(&self, _: &Pid, message: SystemMessage) {
    self.mailbox.post_system_message(message).await;
  }

  async fn stop(&self, pid: &Pid) {
    self.set_dead();
    self.send_system_message(pid, SystemMessage::Stop).await;
  }

  fn set_dead(&self) {
    self.dead.store(true, Ordering::SeqCst);
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
