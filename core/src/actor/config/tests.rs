use std::time::Duration;

use crate::actor::dispatch::{CurrentThreadDispatcher, Dispatcher, DispatcherHandle};
use crate::actor::{Config, ConfigOption};

#[tokio::test]
async fn test_defaults() {
  let config = Config::from([]);
  assert_eq!(config.dispatcher_throughput, 300);
  assert_eq!(config.dead_letter_throttle_count, 10);
  assert_eq!(config.dead_letter_throttle_interval, Duration::from_secs(1));
  assert!(!config.dead_letter_request_logging);
  assert!(!config.developer_supervision_logging);
  assert_eq!(config.system_dispatcher.throughput().await, 300);
}

#[tokio::test]
async fn test_options_are_applied() {
  let config = Config::from([
    ConfigOption::with_dispatcher_throughput(50),
    ConfigOption::with_dead_letter_throttle_count(3),
    ConfigOption::with_dead_letter_throttle_interval(Duration::from_millis(100)),
    ConfigOption::with_dead_letter_request_logging(true),
    ConfigOption::with_developer_supervision_logging(true),
  ]);
  assert_eq!(config.system_dispatcher.throughput().await, 50);
  assert_eq!(config.dead_letter_throttle_count, 3);
  assert_eq!(config.dead_letter_throttle_interval, Duration::from_millis(100));
  assert!(config.dead_letter_request_logging);
  assert!(config.developer_supervision_logging);
}

#[tokio::test]
async fn test_explicit_dispatcher_wins() {
  let dispatcher = DispatcherHandle::new(CurrentThreadDispatcher::new().with_throughput(5));
  let config = Config::from([
    ConfigOption::with_system_dispatcher(dispatcher.clone()),
    ConfigOption::with_dispatcher_throughput(50),
  ]);
  assert_eq!(config.system_dispatcher, dispatcher);
  assert_eq!(config.system_dispatcher.throughput().await, 5);
}
