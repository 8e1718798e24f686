use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio::sync::{Mutex, Notify};

/// Go-style wait group: `add` work, `done` it, `wait` until the counter drops to zero.
#[derive(Clone)]
pub struct WaitGroup {
  inner: Arc<Inner>,
}

struct Inner {
  count: Mutex<usize>,
  notify: Notify,
}

impl Debug for WaitGroup {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WaitGroup").finish_non_exhaustive()
  }
}

impl Default for WaitGroup {
  fn default() -> Self {
    Self::new()
  }
}

impl WaitGroup {
  pub fn new() -> Self {
    Self::with_count(0)
  }

  pub fn with_count(count: usize) -> Self {
    WaitGroup {
      inner: Arc::new(Inner {
        count: Mutex::new(count),
        notify: Notify::new(),
      }),
    }
  }

  pub async fn add(&self, n: usize) {
    let mut count = self.inner.count.lock().await;
    *count += n;
  }

  pub async fn done(&self) {
    let mut count = self.inner.count.lock().await;
    *count = count.saturating_sub(1);
    if *count == 0 {
      self.inner.notify.notify_waiters();
    }
  }

  pub async fn wait(&self) {
    loop {
      let notified = self.inner.notify.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();
      if *self.inner.count.lock().await == 0 {
        return;
      }
      notified.await;
    }
  }
}
