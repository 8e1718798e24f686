use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Valve {
  Open,
  Closing,
  Closed,
}

#[derive(Debug)]
struct ThrottleWindow {
  started_at: Instant,
  current_events: usize,
}

/// Lets at most `max_events_in_period` events through per period.
///
/// The window rolls over lazily on the first event after the period elapsed, at which point
/// the callback is told how many events were suppressed in the previous window.
#[derive(Clone)]
pub struct Throttle {
  window: Arc<Mutex<ThrottleWindow>>,
  max_events_in_period: usize,
  period: Duration,
  throttled_callback: Arc<dyn Fn(usize) + Send + Sync + 'static>,
}

impl Debug for Throttle {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Throttle")
      .field("max_events_in_period", &self.max_events_in_period)
      .field("period", &self.period)
      .finish()
  }
}

impl Throttle {
  pub fn new(
    max_events_in_period: usize,
    period: Duration,
    throttled_callback: impl Fn(usize) + Send + Sync + 'static,
  ) -> Self {
    Self {
      window: Arc::new(Mutex::new(ThrottleWindow {
        started_at: Instant::now(),
        current_events: 0,
      })),
      max_events_in_period,
      period,
      throttled_callback: Arc::new(throttled_callback),
    }
  }

  pub fn should_throttle(&self) -> Valve {
    let (tries, suppressed) = {
      let mut window = self.window.lock();
      let mut suppressed = 0;
      if window.started_at.elapsed() >= self.period {
        suppressed = window.current_events.saturating_sub(self.max_events_in_period);
        window.started_at = Instant::now();
        window.current_events = 0;
      }
      window.current_events += 1;
      (window.current_events, suppressed)
    };
    if suppressed > 0 {
      (self.throttled_callback)(suppressed);
    }

    if tries == self.max_events_in_period {
      Valve::Closing
    } else if tries > self.max_events_in_period {
      Valve::Closed
    } else {
      Valve::Open
    }
  }
}
