use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use relay_actor_message_derive_rs::Message;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::AbortHandle;

use crate::actor::actor_system::{ActorSystem, WeakActorSystem};
use crate::actor::message::{DeadLetterResponse, Message, MessageHandle, MessageOrEnvelope, SystemMessage};
use crate::actor::pid::Pid;
use crate::actor::process::{Process, ProcessHandle};


#[derive(Debug, Clone, PartialEq, Eq, Error, Message)]
pub enum ActorFutureError {
  #[error("future: timeout")]
  TimeoutError,
  #[error("future: cancelled")]
  CancelledError,
  #[error("future: dead letter")]
  DeadLetterError,
}

#[derive(Debug, Clone)]
enum FutureState {
  Pending,
  Completed(MessageHandle),
  Failed(ActorFutureError),
}

impl FutureState {
  fn is_pending(&self) -> bool {
    matches!(self, FutureState::Pending)
  }

  fn to_result(&self) -> Option<Result<MessageHandle, ActorFutureError>> {
    match self {
      FutureState::Pending => None,
      FutureState::Completed(message_handle) => Some(Ok(message_handle.clone())),
      FutureState::Failed(error) => Some(Err(error.clone())),
    }
  }
}

#[derive(Debug)]
struct ActorFutureInner {
  actor_system: WeakActorSystem,
  pid: Pid,
  state: watch::Sender<FutureState>,
  timer: Mutex<Option<AbortHandle>>,
  pipes: Mutex<Vec<Pid>>,
}

/// Registered process standing in for the sender of a request; resolves with the first
/// message sent to it.
#[derive(Debug, Clone)]
pub struct ActorFutureProcess {
  inner: Arc<ActorFutureInner>,
}

static_assertions::assert_impl_all!(ActorFutureProcess: Send, Sync);

/// Caller side of a request: awaits the reply, a timeout or a cancellation.
#[derive(Debug, Clone)]
pub struct ActorFuture {
  process: ActorFutureProcess,
}

static_assertions::assert_impl_all!(ActorFuture: Send, Sync);

impl ActorFutureProcess {
  /// Registers a new future. A zero `timeout` disables the timer.
  pub fn new(actor_system: ActorSystem, timeout: Duration) -> ActorFuture {
    let process_registry = actor_system.get_process_registry();
    let id = format!("future{}", process_registry.next_id());
    let (state, _) = watch::channel(FutureState::Pending);
    let process = ActorFutureProcess {
      inner: Arc::new(ActorFutureInner {
        actor_system: actor_system.downgrade(),
        pid: Pid::new(&process_registry.get_address(), &id),
        state,
        timer: Mutex::new(None),
        pipes: Mutex::new(Vec::new()),
      }),
    };

    let (pid, absent) = process_registry.add_process(ProcessHandle::new(process.clone()), &id);
    if !absent {
      tracing::error!("ActorFutureProcess: failed to register future process: pid = {}", pid);
    }

    if timeout > Duration::ZERO {
      let cloned = process.clone();
      let handle = tokio::spawn(async move {
        tokio::time::sleep(timeout).await;
        cloned.fail(ActorFutureError::TimeoutError).await;
      });
      *process.inner.timer.lock() = Some(handle.abort_handle());
      if !process.inner.state.borrow().is_pending() {
        handle.abort();
      }
    }

    ActorFuture { process }
  }

  pub fn get_pid(&self) -> Pid {
    self.inner.pid.clone()
  }

  pub async fn complete(&self, message_handle: MessageHandle) {
    self.resolve(FutureState::Completed(message_handle)).await;
  }

  pub async fn fail(&self, error: ActorFutureError) {
    self.resolve(FutureState::Failed(error)).await;
  }

  /// First resolution wins; later ones are ignored.
  async fn resolve(&self, next: FutureState) {
    let won = self.inner.state.send_if_modified(|state| {
      if state.is_pending() {
        *state = next.clone();
        true
      } else {
        false
      }
    });
    if !won {
      return;
    }

    if let Some(timer) = self.inner.timer.lock().take() {
      timer.abort();
    }
    let Some(actor_system) = self.inner.actor_system.upgrade() else {
      return;
    };
    actor_system.get_process_registry().remove_process(&self.inner.pid);

    let pipes = std::mem::take(&mut *self.inner.pipes.lock());
    if !pipes.is_empty() {
      let message_handle = match next {
        FutureState::Completed(message_handle) => message_handle,
        FutureState::Failed(error) => MessageHandle::new(error),
        FutureState::Pending => return,
      };
      for pid in pipes {
        pid.send_message(&actor_system, message_handle.clone()).await;
      }
    }
  }
}

#[async_trait]
impl Process for ActorFutureProcess {
  async fn send_user_message(&self, _: Option<&Pid>, message: MessageOrEnvelope) {
    let message_handle = message.get_message_handle();
    if message_handle.is_typed::<DeadLetterResponse>() {
      self.fail(ActorFutureError::DeadLetterError).await;
    } else {
      self.complete(message_handle).await;
    }
  }

  async fn send_system_message(&self, _: &Pid, message: SystemMessage) {
    tracing::debug!("ActorFutureProcess: ignored system message: {:?}", message);
  }

  async fn stop(&self, _: &Pid) {
    self.fail(ActorFutureError::CancelledError).await;
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

impl ActorFuture {
  pub fn get_pid(&self) -> Pid {
    self.process.get_pid()
  }

  /// Waits for the terminal value.
  pub async fn result(&self) -> Result<MessageHandle, ActorFutureError> {
    let mut receiver = self.process.inner.state.subscribe();
    let result = match receiver.wait_for(|state| !state.is_pending()).await {
      Ok(state) => state.to_result().unwrap_or(Err(ActorFutureError::CancelledError)),
      Err(_) => Err(ActorFutureError::CancelledError),
    };
    result
  }

  pub async fn wait(&self) -> Option<ActorFutureError> {
    self.result().await.err()
  }

  pub fn is_done(&self) -> bool {
    !self.process.inner.state.borrow().is_pending()
  }

  /// Resolves the future with `CancelledError` unless it already completed.
  pub async fn cancel(&self) {
    self.process.fail(ActorFutureError::CancelledError).await;
  }

  /// Forwards the terminal value, or the error, to `pid` once resolved.
  pub async fn pipe_to(&self, pid: Pid) {
    let resolved = {
      let mut pipes = self.process.inner.pipes.lock();
      let state = self.process.inner.state.borrow().clone();
      match state {
        FutureState::Pending => {
          pipes.push(pid.clone());
          None
        }
        FutureState::Completed(message_handle) => Some(message_handle),
        FutureState::Failed(error) => Some(MessageHandle::new(error)),
      }
    };
    if let (Some(message_handle), Some(actor_system)) = (resolved, self.process.inner.actor_system.upgrade()) {
      pid.send_message(&actor_system, message_handle).await;
    }
  }
}
