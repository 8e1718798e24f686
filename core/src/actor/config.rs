use std::time::Duration;

use crate::actor::config_option::ConfigOption;
use crate::actor::dispatch::{DispatcherHandle, TokioRuntimeContextDispatcher, DEFAULT_THROUGHPUT};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
pub struct Config {
  /// Used by every actor whose props do not name a dispatcher.
  pub system_dispatcher: DispatcherHandle,
  pub dispatcher_throughput: usize,
  pub dead_letter_throttle_interval: Duration,
  pub dead_letter_throttle_count: usize,
  /// Also log dead letters that carried a sender (those senders get a reply either way).
  pub dead_letter_request_logging: bool,
  pub developer_supervision_logging: bool,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      system_dispatcher: DispatcherHandle::new(TokioRuntimeContextDispatcher::new()),
      dispatcher_throughput: DEFAULT_THROUGHPUT,
      dead_letter_throttle_interval: Duration::from_secs(1),
      dead_letter_throttle_count: 10,
      dead_letter_request_logging: false,
      developer_supervision_logging: false,
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    let mut dispatcher_given = false;
    for option in options {
      dispatcher_given |= matches!(option, ConfigOption::SetSystemDispatcher(_));
      option.apply(&mut config);
    }
    if !dispatcher_given {
      config.system_dispatcher =
        DispatcherHandle::new(TokioRuntimeContextDispatcher::new().with_throughput(config.dispatcher_throughput));
    }
    config
  }
}
