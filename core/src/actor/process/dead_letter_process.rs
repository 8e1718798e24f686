use std::any::Any;

use async_trait::async_trait;
use relay_actor_message_derive_rs::Message;

use crate::actor::actor_system::{ActorSystem, WeakActorSystem};
use crate::actor::dispatch::{Throttle, Valve};
use crate::actor::message::{DeadLetterResponse, Message, MessageHandle, MessageOrEnvelope, SystemMessage};
use crate::actor::pid::Pid;
use crate::actor::process::Process;
use crate::actor::Config;
use crate::event_stream::{EventHandler, Predicate};


/// Id under which the dead-letter process is registered.
pub const DEAD_LETTER_ID: &str = "deadletter";

#[derive(Debug, Clone, PartialEq)]
pub enum DeadLetterMessage {
  User(MessageHandle),
  System(SystemMessage),
}

/// Published on the event stream for every message that reached no live process.
#[derive(Debug, Clone, PartialEq, Message)]
pub struct DeadLetterEvent {
  pub pid: Option<Pid>,
  pub message: DeadLetterMessage,
  pub sender: Option<Pid>,
}

/// Sink for messages addressed to processes that do not exist.
#[derive(Debug, Clone)]
pub struct DeadLetterProcess {
  actor_system: WeakActorSystem,
}

impl DeadLetterProcess {
  pub(crate) fn new(actor_system: WeakActorSystem) -> Self {
    Self { actor_system }
  }

  /// Installs the standard dead-letter subscribers: replies to waiting senders, throttled
  /// logging and `Terminated` answers to watchers of dead pids.
  pub(crate) fn subscribe(actor_system: &ActorSystem) {
    let config: &Config = actor_system.get_config();
    let throttle = Throttle::new(
      config.dead_letter_throttle_count,
      config.dead_letter_throttle_interval,
      |suppressed| tracing::info!("DeadLetterProcess: throttled {} dead letter log entries", suppressed),
    );
    let request_logging = config.dead_letter_request_logging;

    let weak = actor_system.downgrade();
    actor_system.get_event_stream().subscribe_with_predicate(
      EventHandler::new(move |event: MessageHandle| {
        let weak = weak.clone();
        let throttle = throttle.clone();
        async move {
          let Some(dead_letter) = event.to_typed::<DeadLetterEvent>() else {
            return;
          };
          let Some(actor_system) = weak.upgrade() else {
            return;
          };
          if let Some(sender) = &dead_letter.sender {
            sender
              .send_message(
                &actor_system,
                MessageHandle::new(DeadLetterResponse {
                  target: dead_letter.pid.clone(),
                }),
              )
              .await;
          }
          if !request_logging && dead_letter.sender.is_some() {
            return;
          }
          if throttle.should_throttle() == Valve::Open {
            tracing::warn!(
              "DeadLetterProcess: message to {} from {} was not delivered: {:?}",
              dead_letter.pid.as_ref().map(|p| p.to_string()).unwrap_or_default(),
              dead_letter.sender.as_ref().map(|p| p.to_string()).unwrap_or_default(),
              dead_letter.message
            );
          }
        }
      }),
      Predicate::of_type::<DeadLetterEvent>(),
    );

    let weak = actor_system.downgrade();
    actor_system.get_event_stream().subscribe_with_predicate(
      EventHandler::new(move |event: MessageHandle| {
        let weak = weak.clone();
        async move {
          let Some(dead_letter) = event.to_typed::<DeadLetterEvent>() else {
            return;
          };
          let (Some(actor_system), Some(who)) = (weak.upgrade(), dead_letter.pid) else {
            return;
          };
          if let DeadLetterMessage::System(SystemMessage::Watch(watcher)) = dead_letter.message {
            watcher
              .send_system_message(&actor_system, SystemMessage::Terminated(who))
              .await;
          }
        }
      }),
      Predicate::of_type::<DeadLetterEvent>(),
    );
  }

  async fn publish(&self, event: DeadLetterEvent) {
    if let Some(actor_system) = self.actor_system.upgrade() {
      actor_system.get_event_stream().publish(MessageHandle::new(event)).await;
    }
  }
}

#[async_trait]
impl Process for DeadLetterProcess {
  async fn send_user_message(&self, pid: Option<&Pid>, message: MessageOrEnvelope) {
    tracing::debug!("DeadLetterProcess: send_user_message: msg = {:?}", message);
    self
      .publish(DeadLetterEvent {
        pid: pid.cloned(),
        message: DeadLetterMessage::User(message.get_message_handle()),
        sender: message.get_sender(),
      })
      .await;
  }

  async fn send_system_message(&self, pid: &Pid, message: SystemMessage) {
    tracing::debug!("DeadLetterProcess: send_system_message: msg = {:?}", message);
    self
      .publish(DeadLetterEvent {
        pid: Some(pid.clone()),
        message: DeadLetterMessage::System(message),
        sender: None,
      })
      .await;
  }

  async fn stop(&self, pid: &Pid) {
    self.send_system_message(pid, SystemMessage::Stop).await
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}
