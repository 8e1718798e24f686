use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use futures::FutureExt;
use relay_actor_utils_rs::collections::{MpscUnboundedChannelQueue, QueueReader, QueueWriter};

use crate::actor::core::ErrorReason;
use crate::actor::dispatch::dispatcher::{Dispatcher, DispatcherHandle, Runnable};
use crate::actor::dispatch::mailbox::{Mailbox, MailboxHandle};
use crate::actor::dispatch::message_invoker::{MessageInvoker, MessageInvokerHandle};
use crate::actor::message::{MessageOrEnvelope, SystemMessage};

#[cfg(test)]
mod tests;

#[derive(Debug)]
struct DefaultMailboxInner {
  user_mailbox: MpscUnboundedChannelQueue<MessageOrEnvelope>,
  system_mailbox: MpscUnboundedChannelQueue<SystemMessage>,
  scheduler_status: AtomicBool,
  user_messages_count: AtomicI64,
  system_messages_count: AtomicI64,
  suspended: AtomicBool,
  closed: AtomicBool,
  invoker_opt: ArcSwapOption<MessageInvokerHandle>,
  dispatcher_opt: ArcSwapOption<DispatcherHandle>,
}

/// Unbounded mailbox with a single consumer at a time.
///
/// `scheduler_status` is the run token: whoever flips it from `false` to `true` schedules
/// the one and only run. The run drains all system messages before each user message and
/// yields to the runtime every `throughput` user messages.
#[derive(Debug, Clone)]
pub struct DefaultMailbox {
  inner: Arc<DefaultMailboxInner>,
}

static_assertions::assert_impl_all!(DefaultMailbox: Send, Sync);

impl DefaultMailbox {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(DefaultMailboxInner {
        user_mailbox: MpscUnboundedChannelQueue::new(),
        system_mailbox: MpscUnboundedChannelQueue::new(),
        scheduler_status: AtomicBool::new(false),
        user_messages_count: AtomicI64::new(0),
        system_messages_count: AtomicI64::new(0),
        suspended: AtomicBool::new(false),
        closed: AtomicBool::new(false),
        invoker_opt: ArcSwapOption::from(None),
        dispatcher_opt: ArcSwapOption::from(None),
      }),
    }
  }

  fn message_invoker_opt(&self) -> Option<MessageInvokerHandle> {
    self.inner.invoker_opt.load_full().map(|handle| handle.as_ref().clone())
  }

  fn dispatcher_opt(&self) -> Option<DispatcherHandle> {
    self.inner.dispatcher_opt.load_full().map(|handle| handle.as_ref().clone())
  }

  fn compare_exchange_scheduler_status(&self, current: bool, new: bool) -> Result<bool, bool> {
    self
      .inner
      .scheduler_status
      .compare_exchange(current, new, Ordering::SeqCst, Ordering::SeqCst)
  }

  async fn schedule(&self) {
    if self.is_closed() {
      return;
    }
    let Some(dispatcher) = self.dispatcher_opt() else {
      return;
    };
    if self.compare_exchange_scheduler_status(false, true).is_ok() {
      let mailbox = self.clone();
      dispatcher
        .schedule(Runnable::new(move || async move {
          mailbox.process_messages().await;
        }))
        .await;
    }
  }

  async fn poll_system_mailbox(&self) -> Option<SystemMessage> {
    match self.inner.system_mailbox.poll().await {
      Ok(Some(message)) => {
        self.inner.system_messages_count.fetch_sub(1, Ordering::SeqCst);
        Some(message)
      }
      Ok(None) | Err(_) => None,
    }
  }

  async fn poll_user_mailbox(&self) -> Option<MessageOrEnvelope> {
    match self.inner.user_mailbox.poll().await {
      Ok(Some(message)) => {
        self.inner.user_messages_count.fetch_sub(1, Ordering::SeqCst);
        Some(message)
      }
      Ok(None) | Err(_) => None,
    }
  }

  async fn invoke_system_message(&self, invoker: &MessageInvokerHandle, message: SystemMessage) {
    let result = AssertUnwindSafe(invoker.invoke_system_message(message.clone()))
      .catch_unwind()
      .await;
    let reason = match result {
      Ok(Ok(())) => return,
      Ok(Err(error)) => error.reason().clone(),
      Err(payload) => ErrorReason::from_panic(payload),
    };
    tracing::error!(
      "DefaultMailbox: system message {:?} failed: {}",
      message,
      reason
    );
    invoker.escalate_failure(reason, None).await;
  }

  async fn invoke_user_message(&self, invoker: &MessageInvokerHandle, message: MessageOrEnvelope) {
    let message_handle = message.get_message_handle();
    let result = AssertUnwindSafe(invoker.invoke_user_message(message)).catch_unwind().await;
    let reason = match result {
      Ok(Ok(())) => return,
      Ok(Err(error)) => error.reason().clone(),
      Err(payload) => ErrorReason::from_panic(payload),
    };
    tracing::debug!("DefaultMailbox: user message failed: {}", reason);
    invoker.escalate_failure(reason, Some(message_handle)).await;
  }

  /// One run. Returns when the queues are empty, the mailbox is suspended, a `Restart` was
  /// handled, or the mailbox was closed by `Stop`.
  async fn run(&self) {
    let (Some(dispatcher), Some(invoker)) = (self.dispatcher_opt(), self.message_invoker_opt()) else {
      return;
    };
    let throughput = dispatcher.throughput().await.max(1);
    let mut processed = 0;

    loop {
      while let Some(message) = self.poll_system_mailbox().await {
        match message {
          SystemMessage::SuspendMailbox => self.inner.suspended.store(true, Ordering::SeqCst),
          SystemMessage::ResumeMailbox => self.inner.suspended.store(false, Ordering::SeqCst),
          message => {
            let is_stop = matches!(message, SystemMessage::Stop);
            let ends_run = message.ends_run();
            self.invoke_system_message(&invoker, message).await;
            if is_stop {
              self.close().await;
              return;
            }
            if ends_run {
              return;
            }
          }
        }
      }

      if self.is_suspended() {
        return;
      }

      let Some(message) = self.poll_user_mailbox().await else {
        return;
      };
      self.invoke_user_message(&invoker, message).await;

      processed += 1;
      if processed >= throughput {
        processed = 0;
        tokio::task::yield_now().await;
      }
    }
  }

  async fn close(&self) {
    self.inner.closed.store(true, Ordering::SeqCst);
    self.inner.user_mailbox.clean_up().await;
    self.inner.system_mailbox.clean_up().await;
    self.inner.user_messages_count.store(0, Ordering::SeqCst);
    self.inner.system_messages_count.store(0, Ordering::SeqCst);
    self.inner.invoker_opt.store(None);
    tracing::debug!("DefaultMailbox: closed");
  }
}

impl Default for DefaultMailbox {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Mailbox for DefaultMailbox {
  async fn post_user_message(&self, message: MessageOrEnvelope) {
    if self.is_closed() {
      tracing::debug!("DefaultMailbox: dropped user message posted after close: {:?}", message);
      return;
    }
    self.inner.user_messages_count.fetch_add(1, Ordering::SeqCst);
    if let Err(e) = self.inner.user_mailbox.offer(message).await {
      self.inner.user_messages_count.fetch_sub(1, Ordering::SeqCst);
      tracing::error!("DefaultMailbox: failed to post user message: {:?}", e);
      return;
    }
    self.schedule().await;
  }

  async fn post_system_message(&self, message: SystemMessage) {
    if self.is_closed() {
      tracing::debug!("DefaultMailbox: dropped system message posted after close: {:?}", message);
      return;
    }
    self.inner.system_messages_count.fetch_add(1, Ordering::SeqCst);
    if let Err(e) = self.inner.system_mailbox.offer(message).await {
      self.inner.system_messages_count.fetch_sub(1, Ordering::SeqCst);
      tracing::error!("DefaultMailbox: failed to post system message: {:?}", e);
      return;
    }
    self.schedule().await;
  }

  async fn process_messages(&self) {
    loop {
      self.run().await;

      // A closed mailbox keeps the run token forever so nothing schedules it again.
      if self.is_closed() {
        return;
      }

      self.inner.scheduler_status.store(false, Ordering::SeqCst);
      let system_messages_count = self.get_system_messages_count();
      let user_messages_count = self.get_user_messages_count();

      if (system_messages_count > 0 || (!self.is_suspended() && user_messages_count > 0))
        && self.compare_exchange_scheduler_status(false, true).is_ok()
      {
        continue;
      }
      break;
    }
  }

  fn register_handlers(&self, message_invoker: MessageInvokerHandle, dispatcher: DispatcherHandle) {
    self.inner.invoker_opt.store(Some(Arc::new(message_invoker)));
    self.inner.dispatcher_opt.store(Some(Arc::new(dispatcher)));
  }

  fn get_user_messages_count(&self) -> i64 {
    self.inner.user_messages_count.load(Ordering::SeqCst)
  }

  fn get_system_messages_count(&self) -> i64 {
    self.inner.system_messages_count.load(Ordering::SeqCst)
  }

  fn is_suspended(&self) -> bool {
    self.inner.suspended.load(Ordering::SeqCst)
  }

  fn is_closed(&self) -> bool {
    self.inner.closed.load(Ordering::SeqCst)
  }

  fn to_handle(&self) -> MailboxHandle {
    MailboxHandle::new(self.clone())
  }
}
