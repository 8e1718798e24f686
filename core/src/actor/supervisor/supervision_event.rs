use relay_actor_message_derive_rs::Message;

use crate::actor::core::ErrorReason;
use crate::actor::message::Message;
use crate::actor::pid::Pid;
use crate::actor::supervisor::directive::Directive;

/// Published on the event stream each time a supervisor applies a directive.
#[derive(Debug, Clone, PartialEq, Message)]
pub struct SupervisorEvent {
  pub child: Pid,
  pub reason: ErrorReason,
  pub directive: Directive,
}
