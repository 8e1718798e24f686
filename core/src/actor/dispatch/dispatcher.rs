use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::runtime::{Builder, Runtime};

#[cfg(test)]
mod tests;

/// Default number of user messages a mailbox handles before yielding.
pub const DEFAULT_THROUGHPUT: usize = 300;

/// A unit of work handed to a dispatcher; in practice one mailbox run.
pub struct Runnable(Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send + 'static>);

impl Runnable {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Box::new(move || Box::pin(f()) as BoxFuture<'static, ()>))
  }

  pub async fn run(self) {
    (self.0)().await;
  }
}

#[async_trait]
pub trait Dispatcher: Debug + Send + Sync + 'static {
  async fn schedule(&self, runner: Runnable);
  async fn throughput(&self) -> usize;
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle(Arc<dyn Dispatcher>);

impl DispatcherHandle {
  pub fn new_arc(dispatcher: Arc<dyn Dispatcher>) -> Self {
    Self(dispatcher)
  }

  pub fn new(dispatcher: impl Dispatcher + 'static) -> Self {
    Self(Arc::new(dispatcher))
  }
}

#[async_trait]
impl Dispatcher for DispatcherHandle {
  async fn schedule(&self, runner: Runnable) {
    self.0.schedule(runner).await;
  }

  async fn throughput(&self) -> usize {
    self.0.throughput().await
  }
}

impl PartialEq for DispatcherHandle {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for DispatcherHandle {}

static_assertions::assert_impl_all!(DispatcherHandle: Send, Sync);

/// Spawns each run on the ambient tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioRuntimeContextDispatcher {
  throughput: usize,
}

impl TokioRuntimeContextDispatcher {
  pub fn new() -> Self {
    Self {
      throughput: DEFAULT_THROUGHPUT,
    }
  }

  pub fn with_throughput(mut self, throughput: usize) -> Self {
    self.throughput = throughput;
    self
  }
}

impl Default for TokioRuntimeContextDispatcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Dispatcher for TokioRuntimeContextDispatcher {
  async fn schedule(&self, runner: Runnable) {
    tokio::spawn(runner.run());
  }

  async fn throughput(&self) -> usize {
    self.throughput
  }
}

/// Runs everything on a dedicated single-threaded worker runtime.
///
/// The runtime is shut down in the background when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct SingleWorkerDispatcher {
  runtime: Option<Arc<Runtime>>,
  throughput: usize,
}

impl SingleWorkerDispatcher {
  pub fn new() -> Result<Self, std::io::Error> {
    let runtime = Builder::new_multi_thread().worker_threads(1).enable_all().build()?;
    Ok(Self {
      runtime: Some(Arc::new(runtime)),
      throughput: DEFAULT_THROUGHPUT,
    })
  }

  pub fn with_throughput(mut self, throughput: usize) -> Self {
    self.throughput = throughput;
    self
  }
}

#[async_trait]
impl Dispatcher for SingleWorkerDispatcher {
  async fn schedule(&self, runner: Runnable) {
    if let Some(runtime) = &self.runtime {
      runtime.spawn(runner.run());
    } else {
      tracing::warn!("SingleWorkerDispatcher: runtime already shut down");
    }
  }

  async fn throughput(&self) -> usize {
    self.throughput
  }
}

impl Drop for SingleWorkerDispatcher {
  fn drop(&mut self) {
    if let Some(runtime) = self.runtime.take() {
      if let Ok(runtime) = Arc::try_unwrap(runtime) {
        runtime.shutdown_background();
      }
    }
  }
}

/// Runs the work inline, inside the `schedule` call.
#[derive(Debug, Clone)]
pub struct CurrentThreadDispatcher {
  throughput: usize,
}

impl CurrentThreadDispatcher {
  pub fn new() -> Self {
    Self {
      throughput: DEFAULT_THROUGHPUT,
    }
  }

  pub fn with_throughput(mut self, throughput: usize) -> Self {
    self.throughput = throughput;
    self
  }
}

impl Default for CurrentThreadDispatcher {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Dispatcher for CurrentThreadDispatcher {
  async fn schedule(&self, runner: Runnable) {
    runner.run().await
  }

  async fn throughput(&self) -> usize {
    self.throughput
  }
}
