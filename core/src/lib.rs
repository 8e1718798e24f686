//! Addressing, dispatch and supervision engine of the Relay actor runtime.
//!
//! Actors never share memory: they are reached through a [`actor::pid::Pid`], which the
//! [`actor::process::ProcessRegistry`] resolves to a process. Every send goes through the
//! sender middleware of the calling context, every spawn through its spawn middleware, and
//! every failure raised by an actor is handed to a supervisor.

pub mod actor;
pub mod event_stream;

pub use relay_actor_message_derive_rs::Message;
