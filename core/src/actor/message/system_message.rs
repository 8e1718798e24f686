use relay_actor_utils_rs::collections::Element;

use crate::actor::message::failure::Failure;
use crate::actor::pid::Pid;

/// Control messages travelling on the system queue of a mailbox.
///
/// They are always drained before any pending user message.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemMessage {
  Started,
  Stop,
  Restart,
  Failure(Failure),
  Terminated(Pid),
  Watch(Pid),
  Unwatch(Pid),
  SuspendMailbox,
  ResumeMailbox,
}

impl Element for SystemMessage {}

impl SystemMessage {
  pub fn of_failure(failure: Failure) -> Self {
    SystemMessage::Failure(failure)
  }

  /// Messages after which the current mailbox run must not deliver further user messages.
  pub fn ends_run(&self) -> bool {
    matches!(self, SystemMessage::Stop | SystemMessage::Restart)
  }
}
