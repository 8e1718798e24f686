mod event_handler;
mod event_stream_impl;
mod predicate;
mod subscription;

pub use {self::event_handler::*, self::event_stream_impl::*, self::predicate::*, self::subscription::*};
