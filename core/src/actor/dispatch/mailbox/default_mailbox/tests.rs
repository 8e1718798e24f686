use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::actor::core::{ActorError, ErrorReason};
use crate::actor::dispatch::{
  CurrentThreadDispatcher, DefaultMailbox, DispatcherHandle, Mailbox, MessageInvoker, MessageInvokerHandle,
  TokioRuntimeContextDispatcher,
};
use crate::actor::message::{MessageHandle, MessageOrEnvelope, SystemMessage};

#[derive(Debug, Default)]
struct RecordingInvoker {
  received: Mutex<Vec<String>>,
  escalations: Mutex<Vec<ErrorReason>>,
  running: AtomicUsize,
  max_running: AtomicUsize,
}

#[async_trait]
impl MessageInvoker for RecordingInvoker {
  async fn invoke_system_message(&self, message: SystemMessage) -> Result<(), ActorError> {
    self.received.lock().push(format!("sys:{:?}", message));
    Ok(())
  }

  async fn invoke_user_message(&self, message: MessageOrEnvelope) -> Result<(), ActorError> {
    let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
    self.max_running.fetch_max(running, Ordering::SeqCst);
    tokio::task::yield_now().await;

    let text = message.get_message_handle().to_typed::<String>().unwrap_or_default();
    self.received.lock().push(format!("user:{}", text));
    self.running.fetch_sub(1, Ordering::SeqCst);

    match text.as_str() {
      "panic" => panic!("boom"),
      "fail" => Err(ActorError::of_receive_error(ErrorReason::new("failed", 1))),
      _ => Ok(()),
    }
  }

  async fn escalate_failure(&self, reason: ErrorReason, _: Option<MessageHandle>) {
    self.escalations.lock().push(reason);
  }
}

fn user(text: &str) -> MessageOrEnvelope {
  MessageOrEnvelope::of_message(MessageHandle::new(text.to_string()))
}

fn inline_mailbox() -> (DefaultMailbox, Arc<RecordingInvoker>) {
  let mailbox = DefaultMailbox::new();
  let invoker = Arc::new(RecordingInvoker::default());
  mailbox.register_handlers(
    MessageInvokerHandle::new(invoker.clone()),
    DispatcherHandle::new(CurrentThreadDispatcher::new()),
  );
  (mailbox, invoker)
}

#[tokio::test]
async fn test_system_messages_are_handled_before_user_messages() {
  let mailbox = DefaultMailbox::new();
  let invoker = Arc::new(RecordingInvoker::default());
  mailbox.post_user_message(user("a")).await;
  mailbox.post_user_message(user("b")).await;
  assert_eq!(mailbox.get_user_messages_count(), 2);

  mailbox.register_handlers(
    MessageInvokerHandle::new(invoker.clone()),
    DispatcherHandle::new(CurrentThreadDispatcher::new()),
  );
  mailbox.post_system_message(SystemMessage::Started).await;

  assert_eq!(
    *invoker.received.lock(),
    vec!["sys:Started".to_string(), "user:a".to_string(), "user:b".to_string()]
  );
  assert_eq!(mailbox.get_user_messages_count(), 0);
}

#[tokio::test]
async fn test_suspended_mailbox_holds_user_messages_until_resumed() {
  let (mailbox, invoker) = inline_mailbox();

  mailbox.post_system_message(SystemMessage::SuspendMailbox).await;
  mailbox.post_user_message(user("held")).await;
  assert!(mailbox.is_suspended());
  assert!(invoker.received.lock().is_empty());
  assert_eq!(mailbox.get_user_messages_count(), 1);

  mailbox.post_system_message(SystemMessage::ResumeMailbox).await;
  assert!(!mailbox.is_suspended());
  assert_eq!(*invoker.received.lock(), vec!["user:held".to_string()]);
}

#[tokio::test]
async fn test_stop_closes_mailbox() {
  let (mailbox, invoker) = inline_mailbox();

  mailbox.post_user_message(user("before")).await;
  mailbox.post_system_message(SystemMessage::Stop).await;
  mailbox.post_user_message(user("after")).await;
  mailbox.post_system_message(SystemMessage::Started).await;

  assert!(mailbox.is_closed());
  assert_eq!(
    *invoker.received.lock(),
    vec!["user:before".to_string(), "sys:Stop".to_string()]
  );
  assert_eq!(mailbox.get_user_messages_count(), 0);
}

#[tokio::test]
async fn test_failures_are_escalated_and_run_continues() {
  let (mailbox, invoker) = inline_mailbox();

  mailbox.post_user_message(user("panic")).await;
  mailbox.post_user_message(user("fail")).await;
  mailbox.post_user_message(user("ok")).await;

  let escalations = invoker.escalations.lock().clone();
  assert_eq!(escalations.len(), 2);
  assert!(escalations[0].is_panic());
  assert_eq!(escalations[1].message(), "failed");
  assert_eq!(invoker.received.lock().last().cloned(), Some("user:ok".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_at_most_one_run_under_concurrent_senders() {
  let mailbox = DefaultMailbox::new();
  let invoker = Arc::new(RecordingInvoker::default());
  mailbox.register_handlers(
    MessageInvokerHandle::new(invoker.clone()),
    DispatcherHandle::new(TokioRuntimeContextDispatcher::new().with_throughput(7)),
  );

  let mut senders = Vec::new();
  for sender in 0..8 {
    let mailbox = mailbox.clone();
    senders.push(tokio::spawn(async move {
      for i in 0..100 {
        mailbox.post_user_message(user(&format!("{}-{}", sender, i))).await;
      }
    }));
  }
  for sender in senders {
    sender.await.unwrap();
  }

  let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
  while invoker.received.lock().len() < 800 && tokio::time::Instant::now() < deadline {
    tokio::time::sleep(Duration::from_millis(5)).await;
  }

  assert_eq!(invoker.received.lock().len(), 800);
  assert_eq!(invoker.max_running.load(Ordering::SeqCst), 1);
}
