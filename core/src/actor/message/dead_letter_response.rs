use crate::actor::message::Message;
use crate::actor::pid::Pid;
use relay_actor_message_derive_rs::Message;

/// Answer sent back to a requester whose message could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Message)]
pub struct DeadLetterResponse {
  pub target: Option<Pid>,
}

