//! Queues and synchronization helpers shared by the Relay Actor crates.

pub mod collections;
pub mod concurrent;
