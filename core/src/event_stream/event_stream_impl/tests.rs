use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::actor::message::MessageHandle;
use crate::event_stream::{EventHandler, EventStream, Predicate};

#[tokio::test]
async fn test_publish_reaches_every_subscriber() {
  let event_stream = EventStream::new();
  let counter = Arc::new(AtomicUsize::new(0));
  for _ in 0..3 {
    let counter = counter.clone();
    event_stream.subscribe(move |_| {
      let counter = counter.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
      }
    });
  }
  assert_eq!(event_stream.length(), 3);

  event_stream.publish(MessageHandle::new("hello".to_string())).await;
  assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_unsubscribe_stops_delivery() {
  let event_stream = EventStream::new();
  let counter = Arc::new(AtomicUsize::new(0));
  let cloned = counter.clone();
  let subscription = event_stream.subscribe(move |_| {
    let counter = cloned.clone();
    async move {
      counter.fetch_add(1, Ordering::SeqCst);
    }
  });

  event_stream.publish(MessageHandle::new(1_i32)).await;
  event_stream.unsubscribe(&subscription);
  event_stream.unsubscribe(&subscription);
  event_stream.publish(MessageHandle::new(2_i32)).await;

  assert_eq!(counter.load(Ordering::SeqCst), 1);
  assert_eq!(event_stream.length(), 0);
  assert!(!subscription.is_active());
}

#[tokio::test]
async fn test_predicate_filters_events() {
  let event_stream = EventStream::new();
  let counter = Arc::new(AtomicUsize::new(0));
  let cloned = counter.clone();
  event_stream.subscribe_with_predicate(
    EventHandler::new(move |_| {
      let counter = cloned.clone();
      async move {
        counter.fetch_add(1, Ordering::SeqCst);
      }
    }),
    Predicate::of_type::<String>(),
  );

  event_stream.publish(MessageHandle::new(1_i32)).await;
  event_stream.publish(MessageHandle::new("text".to_string())).await;

  assert_eq!(counter.load(Ordering::SeqCst), 1);
}
