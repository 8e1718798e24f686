use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{mpsc, Mutex};

use crate::collections::element::Element;
use crate::collections::{QueueBase, QueueError, QueueReader, QueueSize, QueueWriter};


/// Multi-producer queue backed by an unbounded tokio channel.
///
/// Producers never contend with the consumer: `offer` only touches the channel sender.
/// The receiver sits behind a mutex that is taken for the duration of a single `try_recv`.
#[derive(Debug, Clone)]
pub struct MpscUnboundedChannelQueue<E> {
  sender: mpsc::UnboundedSender<E>,
  receiver: Arc<Mutex<mpsc::UnboundedReceiver<E>>>,
  count: Arc<AtomicUsize>,
  closed: Arc<AtomicBool>,
}

impl<E> MpscUnboundedChannelQueue<E> {
  pub fn new() -> Self {
    let (sender, receiver) = mpsc::unbounded_channel();
    Self {
      sender,
      receiver: Arc::new(Mutex::new(receiver)),
      count: Arc::new(AtomicUsize::new(0)),
      closed: Arc::new(AtomicBool::new(false)),
    }
  }

  pub fn is_closed(&self) -> bool {
    self.closed.load(Ordering::SeqCst)
  }
}

impl<E> Default for MpscUnboundedChannelQueue<E> {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl<E: Element> QueueBase<E> for MpscUnboundedChannelQueue<E> {
  async fn len(&self) -> QueueSize {
    QueueSize::Limited(self.count.load(Ordering::SeqCst))
  }

  async fn capacity(&self) -> QueueSize {
    QueueSize::Limitless
  }
}

#[async_trait]
impl<E: Element> QueueWriter<E> for MpscUnboundedChannelQueue<E> {
  async fn offer(&self, element: E) -> Result<(), QueueError<E>> {
    if self.is_closed() {
      return Err(QueueError::OfferError(element));
    }
    self.count.fetch_add(1, Ordering::SeqCst);
    match self.sender.send(element) {
      Ok(()) => Ok(()),
      Err(mpsc::error::SendError(element)) => {
        self.count.fetch_sub(1, Ordering::SeqCst);
        Err(QueueError::OfferError(element))
      }
    }
  }
}

#[async_trait]
impl<E: Element> QueueReader<E> for MpscUnboundedChannelQueue<E> {
  async fn poll(&self) -> Result<Option<E>, QueueError<E>> {
    if self.is_closed() {
      return Err(QueueError::PoolError);
    }
    let mut receiver = self.receiver.lock().await;
    match receiver.try_recv() {
      Ok(element) => {
        let _ = self
          .count
          .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| Some(c.saturating_sub(1)));
        Ok(Some(element))
      }
      Err(TryRecvError::Empty) => Ok(None),
      Err(TryRecvError::Disconnected) => Err(QueueError::PoolError),
    }
  }

  async fn clean_up(&self) {
    self.closed.store(true, Ordering::SeqCst);
    let mut receiver = self.receiver.lock().await;
    receiver.close();
    let mut dropped = 0usize;
    while receiver.try_recv().is_ok() {
      dropped += 1;
    }
    self.count.store(0, Ordering::SeqCst);
    if dropped > 0 {
      tracing::debug!("MpscUnboundedChannelQueue::clean_up: dropped {} elements", dropped);
    }
  }
}
