use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rstest::rstest;

use crate::actor::actor_system::ActorSystem;
use crate::actor::core::ErrorReason;
use crate::actor::message::MessageHandle;
use crate::actor::pid::Pid;
use crate::actor::supervisor::{
  Directive, OneForOneStrategy, RestartStatistics, Supervisor, SupervisorEvent, SupervisorHandle, SupervisorStrategy,
};

#[derive(Debug, Default)]
struct RecordingSupervisor {
  calls: Mutex<Vec<String>>,
}

#[async_trait]
impl Supervisor for RecordingSupervisor {
  async fn get_children(&self) -> Vec<Pid> {
    vec![]
  }

  async fn escalate_failure(&self, reason: ErrorReason, _: Option<MessageHandle>) {
    self.calls.lock().push(format!("escalate:{}", reason));
  }

  async fn restart_children(&self, pids: &[Pid]) {
    self.calls.lock().push(format!("restart:{}", pids[0].id()));
  }

  async fn stop_children(&self, pids: &[Pid]) {
    self.calls.lock().push(format!("stop:{}", pids[0].id()));
  }

  async fn resume_children(&self, pids: &[Pid]) {
    self.calls.lock().push(format!("resume:{}", pids[0].id()));
  }
}

#[rstest]
#[case(Directive::Resume, "resume:child")]
#[case(Directive::Restart, "restart:child")]
#[case(Directive::Stop, "stop:child")]
#[case(Directive::Escalate, "escalate:boom")]
#[tokio::test]
async fn test_directive_is_applied(#[case] directive: Directive, #[case] expected: &str) {
  let system = ActorSystem::new();
  let supervisor = Arc::new(RecordingSupervisor::default());
  let strategy = OneForOneStrategy::new(10, Duration::from_secs(10)).with_decider(move |_| async move { directive });

  strategy
    .handle_child_failure(
      system,
      SupervisorHandle::new_arc(supervisor.clone()),
      Pid::new("nonhost", "child"),
      RestartStatistics::new(),
      ErrorReason::new("boom", 0),
      None,
    )
    .await;

  assert_eq!(*supervisor.calls.lock(), vec![expected.to_string()]);
}

#[rstest]
#[case(0, 0, true)]
#[case(1, 0, false)]
#[case(1, 1, true)]
#[case(3, 2, false)]
#[case(3, 3, true)]
#[tokio::test]
async fn test_should_stop(#[case] max_retries: u32, #[case] previous_failures: usize, #[case] expected: bool) {
  let strategy = OneForOneStrategy::new(max_retries, Duration::from_secs(10));
  let rs = RestartStatistics::with_values(vec![std::time::Instant::now(); previous_failures]);

  assert_eq!(strategy.should_stop(&rs).await, expected);
}

#[tokio::test]
async fn test_restart_is_published_on_event_stream() {
  let system = ActorSystem::new();
  let events = Arc::new(Mutex::new(Vec::new()));
  let cloned = events.clone();
  system.get_event_stream().subscribe(move |event| {
    let events = cloned.clone();
    async move {
      if let Some(event) = event.to_typed::<SupervisorEvent>() {
        events.lock().push(event);
      }
    }
  });

  OneForOneStrategy::new(10, Duration::from_secs(10))
    .handle_child_failure(
      system.clone(),
      SupervisorHandle::new(RecordingSupervisor::default()),
      Pid::new("nonhost", "child"),
      RestartStatistics::new(),
      ErrorReason::new("boom", 0),
      None,
    )
    .await;

  let events = events.lock().clone();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].directive, Directive::Restart);
  assert_eq!(events[0].child.id(), "child");
}
