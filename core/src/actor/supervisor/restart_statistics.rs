use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;


/// Failure timestamps of one child. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct RestartStatistics {
  failure_times: Arc<RwLock<Vec<Instant>>>,
}

impl RestartStatistics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_values(failure_times: impl IntoIterator<Item = Instant>) -> Self {
    Self {
      failure_times: Arc::new(RwLock::new(failure_times.into_iter().collect())),
    }
  }

  pub async fn failure_count(&self) -> usize {
    self.failure_times.read().await.len()
  }

  pub async fn fail(&self) {
    self.push(Instant::now()).await;
  }

  pub async fn push(&self, time: Instant) {
    self.failure_times.write().await.push(time);
  }

  pub async fn reset(&self) {
    self.failure_times.write().await.clear();
  }

  /// Failures recorded within the last `within_duration`; zero means "ever".
  pub async fn number_of_failures(&self, within_duration: Duration) -> u32 {
    let failure_times = self.failure_times.read().await;
    if within_duration == Duration::ZERO {
      return failure_times.len() as u32;
    }
    let now = Instant::now();
    failure_times
      .iter()
      .filter(|&&t| now.duration_since(t) < within_duration)
      .count() as u32
  }
}

impl Display for RestartStatistics {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "RestartStatistics")
  }
}

impl PartialEq for RestartStatistics {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.failure_times, &other.failure_times)
  }
}

impl Eq for RestartStatistics {}

static_assertions::assert_impl_all!(RestartStatistics: Send, Sync);
