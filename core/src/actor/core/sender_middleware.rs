use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::actor::context::SenderContextHandle;
use crate::actor::core::middleware_chain::SenderMiddlewareNext;
use crate::actor::message::MessageEnvelope;
use crate::actor::pid::Pid;

type SenderMiddlewareFn = Arc<
  dyn Fn(SenderMiddlewareNext, SenderContextHandle, Pid, MessageEnvelope) -> BoxFuture<'static, ()> + Send + Sync + 'static,
>;

/// A named interceptor on the outbound path.
///
/// The closure receives the remainder of the chain as `next`; calling `next.run(..)` continues
/// delivery, returning without calling it drops the message.
#[derive(Clone)]
pub struct SenderMiddleware {
  name: Arc<str>,
  f: SenderMiddlewareFn,
}

impl SenderMiddleware {
  pub fn new<F, Fut>(name: &str, f: F) -> Self
  where
    F: Fn(SenderMiddlewareNext, SenderContextHandle, Pid, MessageEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self {
      name: Arc::from(name),
      f: Arc::new(move |next, ctx, target, envelope| Box::pin(f(next, ctx, target, envelope)) as BoxFuture<'static, ()>),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub async fn run(
    &self,
    next: SenderMiddlewareNext,
    sender_context: SenderContextHandle,
    target: Pid,
    envelope: MessageEnvelope,
  ) {
    (self.f)(next, sender_context, target, envelope).await
  }
}

impl Debug for SenderMiddleware {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SenderMiddleware").field("name", &self.name).finish()
  }
}

impl PartialEq for SenderMiddleware {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.f, &other.f)
  }
}

impl Eq for SenderMiddleware {}

static_assertions::assert_impl_all!(SenderMiddleware: Send, Sync);
