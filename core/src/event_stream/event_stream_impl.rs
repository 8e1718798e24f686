use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::actor::message::MessageHandle;
use crate::event_stream::event_handler::EventHandler;
use crate::event_stream::predicate::Predicate;
use crate::event_stream::subscription::Subscription;

#[cfg(test)]
mod tests;

/// In-process publish/subscribe bus for system events such as dead letters and supervision
/// decisions.
#[derive(Debug, Clone, Default)]
pub struct EventStream {
  subscriptions: Arc<RwLock<Vec<Subscription>>>,
  next_id: Arc<AtomicU64>,
}

impl EventStream {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn subscribe_handler(&self, handler: EventHandler) -> Subscription {
    self.add(Subscription::new(self.next_id.fetch_add(1, Ordering::SeqCst), handler, None))
  }

  pub fn subscribe<F, Fut>(&self, f: F) -> Subscription
  where
    F: Fn(MessageHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    self.subscribe_handler(EventHandler::new(f))
  }

  pub fn subscribe_with_predicate(&self, handler: EventHandler, predicate: Predicate) -> Subscription {
    self.add(Subscription::new(
      self.next_id.fetch_add(1, Ordering::SeqCst),
      handler,
      Some(predicate),
    ))
  }

  fn add(&self, subscription: Subscription) -> Subscription {
    self.subscriptions.write().push(subscription.clone());
    subscription
  }

  pub fn unsubscribe(&self, subscription: &Subscription) {
    if subscription.deactivate() {
      let mut subscriptions = self.subscriptions.write();
      if let Some(index) = subscriptions.iter().position(|s| s == subscription) {
        subscriptions.swap_remove(index);
      }
    }
  }

  /// Runs every matching handler in turn. Handlers may publish again.
  pub async fn publish(&self, event: MessageHandle) {
    let subscriptions = self.subscriptions.read().clone();
    for subscription in subscriptions.iter().filter(|s| s.is_active()) {
      if let Some(predicate) = &subscription.predicate {
        if !predicate.run(&event) {
          continue;
        }
      }
      subscription.handler.run(event.clone()).await;
    }
  }

  pub fn length(&self) -> usize {
    self.subscriptions.read().len()
  }
}
