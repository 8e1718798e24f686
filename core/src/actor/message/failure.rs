use crate::actor::core::ErrorReason;
use crate::actor::message::message_handle::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::RestartStatistics;

/// Raised by a child whose message processing failed; handled by its supervisor.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
  pub who: Pid,
  pub reason: ErrorReason,
  pub restart_stats: RestartStatistics,
  pub message_handle: Option<MessageHandle>,
}

impl Failure {
  pub fn new(
    who: Pid,
    reason: ErrorReason,
    restart_stats: RestartStatistics,
    message_handle: Option<MessageHandle>,
  ) -> Self {
    Failure {
      who,
      reason,
      restart_stats,
      message_handle,
    }
  }
}
