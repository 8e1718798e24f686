use std::time::Duration;

use crate::actor::config::Config;
use crate::actor::dispatch::DispatcherHandle;

#[derive(Debug, Clone)]
pub enum ConfigOption {
  SetSystemDispatcher(DispatcherHandle),
  SetDispatcherThroughput(usize),
  SetDeadLetterThrottleInterval(Duration),
  SetDeadLetterThrottleCount(usize),
  SetDeadLetterRequestLogging(bool),
  SetDeveloperSupervisionLogging(bool),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetSystemDispatcher(dispatcher) => {
        config.system_dispatcher = dispatcher.clone();
      }
      ConfigOption::SetDispatcherThroughput(throughput) => {
        config.dispatcher_throughput = *throughput;
      }
      ConfigOption::SetDeadLetterThrottleInterval(interval) => {
        config.dead_letter_throttle_interval = *interval;
      }
      ConfigOption::SetDeadLetterThrottleCount(count) => {
        config.dead_letter_throttle_count = *count;
      }
      ConfigOption::SetDeadLetterRequestLogging(enabled) => {
        config.dead_letter_request_logging = *enabled;
      }
      ConfigOption::SetDeveloperSupervisionLogging(enabled) => {
        config.developer_supervision_logging = *enabled;
      }
    }
  }

  pub fn with_system_dispatcher(dispatcher: DispatcherHandle) -> ConfigOption {
    ConfigOption::SetSystemDispatcher(dispatcher)
  }

  pub fn with_dispatcher_throughput(throughput: usize) -> ConfigOption {
    ConfigOption::SetDispatcherThroughput(throughput)
  }

  pub fn with_dead_letter_throttle_interval(interval: Duration) -> ConfigOption {
    ConfigOption::SetDeadLetterThrottleInterval(interval)
  }

  pub fn with_dead_letter_throttle_count(count: usize) -> ConfigOption {
    ConfigOption::SetDeadLetterThrottleCount(count)
  }

  pub fn with_dead_letter_request_logging(enabled: bool) -> ConfigOption {
    ConfigOption::SetDeadLetterRequestLogging(enabled)
  }

  pub fn with_developer_supervision_logging(enabled: bool) -> ConfigOption {
    ConfigOption::SetDeveloperSupervisionLogging(enabled)
  }
}
