use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::event_stream::event_handler::EventHandler;
use crate::event_stream::predicate::Predicate;

#[derive(Debug, Clone)]
pub struct Subscription {
  id: u64,
  pub(crate) handler: EventHandler,
  pub(crate) predicate: Option<Predicate>,
  active: Arc<AtomicBool>,
}

impl Subscription {
  pub(crate) fn new(id: u64, handler: EventHandler, predicate: Option<Predicate>) -> Self {
    Subscription {
      id,
      handler,
      predicate,
      active: Arc::new(AtomicBool::new(true)),
    }
  }

  pub fn id(&self) -> u64 {
    self.id
  }

  pub(crate) fn deactivate(&self) -> bool {
    self
      .active
      .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
      .is_ok()
  }

  pub fn is_active(&self) -> bool {
    self.active.load(Ordering::SeqCst)
  }
}

static_assertions::assert_impl_all!(Subscription: Send, Sync);

impl PartialEq for Subscription {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for Subscription {}
