use strum::{Display, EnumString};

/// What a supervisor does with a failed child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Directive {
  /// Keep the actor and its state, let the mailbox continue.
  Resume,
  /// Replace the actor instance, keeping pid and mailbox.
  Restart,
  Stop,
  /// Hand the failure to the supervisor's own parent.
  Escalate,
}
