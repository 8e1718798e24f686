mod dispatcher;
mod mailbox;
mod message_invoker;
mod throttler;

pub use {self::dispatcher::*, self::mailbox::*, self::message_invoker::*, self::throttler::*};
