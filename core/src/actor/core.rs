#[allow(clippy::module_inception)]
mod actor;
mod actor_error;
mod actor_handle;
mod actor_producer;
mod actor_receiver;
mod error_reason;
mod middleware_chain;
mod pid_set;
mod props;
mod sender_middleware;
mod spawn_middleware;
mod spawner;

pub use {
  self::actor::*, self::actor_error::*, self::actor_handle::*, self::actor_producer::*, self::actor_receiver::*,
  self::error_reason::*, self::middleware_chain::*, self::pid_set::*, self::props::*, self::sender_middleware::*,
  self::spawn_middleware::*, self::spawner::*,
};
