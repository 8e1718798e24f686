use std::any::Any;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

/// Why an actor failed. Carried inside `Failure` up to the supervisor.
#[derive(Clone)]
pub struct ErrorReason {
  message: String,
  code: i32,
  cause: Option<Arc<dyn Error + Send + Sync>>,
}

impl ErrorReason {
  pub fn new(message: impl Into<String>, code: i32) -> Self {
    Self {
      message: message.into(),
      code,
      cause: None,
    }
  }

  pub fn from_error<E: Error + Send + Sync + 'static>(error: E) -> Self {
    Self {
      message: error.to_string(),
      code: 0,
      cause: Some(Arc::new(error)),
    }
  }

  /// Builds a reason out of the payload of a caught panic.
  pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
    let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
      (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
      s.clone()
    } else {
      "panic with a non-string payload".to_string()
    };
    Self::new(format!("panic: {}", message), -1)
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn code(&self) -> i32 {
    self.code
  }

  pub fn is_panic(&self) -> bool {
    self.code == -1
  }
}

impl Debug for ErrorReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ErrorReason")
      .field("message", &self.message)
      .field("code", &self.code)
      .finish()
  }
}

impl Display for ErrorReason {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.message)
  }
}

impl Error for ErrorReason {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    self.cause.as_ref().map(|e| e.as_ref() as &(dyn Error + 'static))
  }
}

impl PartialEq for ErrorReason {
  fn eq(&self, other: &Self) -> bool {
    self.message == other.message && self.code == other.code
  }
}

impl Eq for ErrorReason {}

impl From<&str> for ErrorReason {
  fn from(s: &str) -> Self {
    Self::new(s, 0)
  }
}

impl From<String> for ErrorReason {
  fn from(s: String) -> Self {
    Self::new(s, 0)
  }
}

static_assertions::assert_impl_all!(ErrorReason: Send, Sync);
