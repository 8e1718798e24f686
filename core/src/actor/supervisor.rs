mod directive;
mod restart_statistics;
mod strategy_one_for_one;
mod strategy_restarting;
mod supervision_event;
mod supervisor_strategy;
mod supervisor_strategy_handle;

pub use {
  self::directive::*, self::restart_statistics::*, self::strategy_one_for_one::*, self::strategy_restarting::*,
  self::supervision_event::*, self::supervisor_strategy::*, self::supervisor_strategy_handle::*,
};
