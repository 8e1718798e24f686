use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::actor::message::Message;

/// Shared, immutable reference to a user payload.
#[derive(Clone)]
pub struct MessageHandle(Arc<dyn Message>);

static_assertions::assert_impl_all!(MessageHandle: Send, Sync);

impl MessageHandle {
  pub fn new(message: impl Message) -> Self {
    MessageHandle(Arc::new(message))
  }

  pub fn new_arc(message: Arc<dyn Message>) -> Self {
    MessageHandle(message)
  }

  pub fn to_typed<T: Message + Clone>(&self) -> Option<T> {
    self.0.as_any().downcast_ref::<T>().cloned()
  }

  pub fn is_typed<T: Message>(&self) -> bool {
    self.0.as_any().is::<T>()
  }

  pub fn get_type_name(&self) -> String {
    self.0.get_type_name()
  }

  pub fn as_message(&self) -> &dyn Message {
    self.0.as_ref()
  }
}

impl Debug for MessageHandle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    self.0.fmt(f)
  }
}

impl PartialEq for MessageHandle {
  fn eq(&self, other: &Self) -> bool {
    self.0.eq_message(other.0.as_ref())
  }
}

impl Eq for MessageHandle {}
