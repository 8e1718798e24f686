use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

mod mpsc_unbounded_channel_queue;

pub use self::mpsc_unbounded_channel_queue::*;

use crate::collections::element::Element;

/// An error raised by a queue operation.
#[derive(Error, Debug, PartialEq)]
pub enum QueueError<E> {
  #[error("Failed to offer an element: {0:?}")]
  OfferError(E),
  #[error("Failed to poll an element")]
  PoolError,
}

/// The size of a queue, or its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSize {
  Limitless,
  Limited(usize),
}

impl QueueSize {
  pub fn is_limitless(&self) -> bool {
    matches!(self, QueueSize::Limitless)
  }

  pub fn to_usize(&self) -> usize {
    match self {
      QueueSize::Limitless => usize::MAX,
      QueueSize::Limited(c) => *c,
    }
  }
}

#[async_trait]
pub trait QueueBase<E: Element>: Debug + Send + Sync {
  async fn is_empty(&self) -> bool {
    self.len().await == QueueSize::Limited(0)
  }

  async fn non_empty(&self) -> bool {
    !self.is_empty().await
  }

  async fn len(&self) -> QueueSize;

  async fn capacity(&self) -> QueueSize;
}

#[async_trait]
pub trait QueueWriter<E: Element>: QueueBase<E> {
  /// Appends `element` at the tail. Never waits for a consumer.
  async fn offer(&self, element: E) -> Result<(), QueueError<E>>;

  async fn offer_all(&self, elements: Vec<E>) -> Result<(), QueueError<E>> {
    for e in elements {
      self.offer(e).await?;
    }
    Ok(())
  }
}

#[async_trait]
pub trait QueueReader<E: Element>: QueueBase<E> {
  /// Removes the head of the queue. `Ok(None)` means the queue is currently empty.
  async fn poll(&self) -> Result<Option<E>, QueueError<E>>;

  /// Closes the queue and discards whatever is still buffered.
  async fn clean_up(&self);
}
