use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::actor::core::actor::Actor;

#[derive(Clone)]
pub struct ActorHandle(Arc<Mutex<dyn Actor>>);

impl ActorHandle {
  pub fn new(actor: impl Actor) -> Self {
    ActorHandle(Arc::new(Mutex::new(actor)))
  }

  pub(crate) fn inner(&self) -> &Arc<Mutex<dyn Actor>> {
    &self.0
  }
}

impl Debug for ActorHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "ActorHandle")
  }
}

impl PartialEq for ActorHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for ActorHandle {}

static_assertions::assert_impl_all!(ActorHandle: Send, Sync);
