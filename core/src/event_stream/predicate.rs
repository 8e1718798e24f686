use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::actor::message::MessageHandle;

/// Filter deciding whether a subscription sees an event.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&MessageHandle) -> bool + Send + Sync + 'static>);

impl Predicate {
  pub fn new(f: impl Fn(&MessageHandle) -> bool + Send + Sync + 'static) -> Self {
    Predicate(Arc::new(f))
  }

  /// Accepts only events carrying a payload of type `T`.
  pub fn of_type<T: crate::actor::message::Message>() -> Self {
    Predicate::new(|event| event.is_typed::<T>())
  }

  pub fn run(&self, event: &MessageHandle) -> bool {
    (self.0)(event)
  }
}

impl Debug for Predicate {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "Predicate")
  }
}

impl PartialEq for Predicate {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Predicate {}
