use crate::actor::message::Message;
use crate::actor::pid::Pid;
use relay_actor_message_derive_rs::Message;

/// Delivered to an actor watching `who` once `who` has stopped.
#[derive(Debug, Clone, PartialEq, Eq, Message)]
pub struct Terminated {
  pub who: Pid,
}
