use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use super::*;

#[tokio::test]
async fn test_tokio_runtime_context_dispatcher_runs_task() {
  let dispatcher = TokioRuntimeContextDispatcher::new().with_throughput(10);
  let (tx, rx) = oneshot::channel();
  dispatcher
    .schedule(Runnable::new(move || async move {
      let _ = tx.send(42);
    }))
    .await;
  assert_eq!(rx.await.unwrap(), 42);
  assert_eq!(dispatcher.throughput().await, 10);
}

#[tokio::test]
async fn test_current_thread_dispatcher_runs_inline() {
  let dispatcher = CurrentThreadDispatcher::new();
  let flag = Arc::new(AtomicBool::new(false));
  let cloned = flag.clone();
  dispatcher
    .schedule(Runnable::new(move || async move {
      cloned.store(true, Ordering::SeqCst);
    }))
    .await;
  assert!(flag.load(Ordering::SeqCst));
  assert_eq!(dispatcher.throughput().await, DEFAULT_THROUGHPUT);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_worker_dispatcher_runs_on_its_own_runtime() {
  let dispatcher = SingleWorkerDispatcher::new().unwrap();
  let (tx, rx) = oneshot::channel();
  dispatcher
    .schedule(Runnable::new(move || async move {
      tokio::time::sleep(Duration::from_millis(5)).await;
      let _ = tx.send("done");
    }))
    .await;
  assert_eq!(rx.await.unwrap(), "done");
  tokio::task::spawn_blocking(move || drop(dispatcher)).await.unwrap();
}
