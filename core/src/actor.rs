pub mod actor_system;
mod config;
mod config_option;
pub mod context;
pub mod core;
pub mod dispatch;
pub mod guardian;
pub mod message;
pub mod pid;
pub mod process;
pub mod supervisor;

pub use {self::config::*, self::config_option::*};
