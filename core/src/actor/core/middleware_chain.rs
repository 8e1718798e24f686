use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{InfoPart, SenderContextHandle, SpawnerContextHandle};
use crate::actor::core::props::Props;
use crate::actor::core::sender_middleware::SenderMiddleware;
use crate::actor::core::spawn_middleware::SpawnMiddleware;
use crate::actor::core::spawner::{SpawnError, Spawner};
use crate::actor::message::MessageEnvelope;
use crate::actor::pid::Pid;

#[cfg(test)]
mod tests;

type SenderTerminalFn =
  Arc<dyn Fn(SenderContextHandle, Pid, MessageEnvelope) -> BoxFuture<'static, ()> + Send + Sync + 'static>;

/// Last step of a sender chain: the actual delivery.
#[derive(Clone)]
pub struct SenderTerminal(SenderTerminalFn);

impl SenderTerminal {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(SenderContextHandle, Pid, MessageEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static, {
    Self(Arc::new(move |ctx, target, envelope| Box::pin(f(ctx, target, envelope)) as BoxFuture<'static, ()>))
  }

  /// Posts the envelope to the target's process.
  pub fn deliver() -> Self {
    Self::new(|ctx: SenderContextHandle, target: Pid, envelope: MessageEnvelope| async move {
      let actor_system = ctx.get_actor_system().await;
      target.send_user_message(&actor_system, envelope.into()).await;
    })
  }

  pub async fn run(&self, sender_context: SenderContextHandle, target: Pid, envelope: MessageEnvelope) {
    (self.0)(sender_context, target, envelope).await
  }
}

impl Debug for SenderTerminal {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "SenderTerminal")
  }
}

/// Ordered list of sender middlewares closed by a terminal.
///
/// The first middleware in the list is the outermost one.
#[derive(Debug, Clone)]
pub struct SenderMiddlewareChain {
  middlewares: Arc<[SenderMiddleware]>,
  terminal: SenderTerminal,
}

impl SenderMiddlewareChain {
  pub fn new(middlewares: &[SenderMiddleware], terminal: SenderTerminal) -> Self {
    Self {
      middlewares: Arc::from(middlewares),
      terminal,
    }
  }

  pub fn middleware_names(&self) -> Vec<&str> {
    self.middlewares.iter().map(|m| m.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.middlewares.len()
  }

  pub fn is_empty(&self) -> bool {
    self.middlewares.is_empty()
  }

  pub async fn run(&self, sender_context: SenderContextHandle, target: Pid, envelope: MessageEnvelope) {
    SenderMiddlewareNext {
      chain: self.clone(),
      index: 0,
    }
    .run(sender_context, target, envelope)
    .await
  }
}

/// Remainder of a sender chain, handed to each middleware.
#[derive(Debug, Clone)]
pub struct SenderMiddlewareNext {
  chain: SenderMiddlewareChain,
  index: usize,
}

impl SenderMiddlewareNext {
  pub async fn run(self, sender_context: SenderContextHandle, target: Pid, envelope: MessageEnvelope) {
    match self.chain.middlewares.get(self.index) {
      Some(middleware) => {
        let next = SenderMiddlewareNext {
          chain: self.chain.clone(),
          index: self.index + 1,
        };
        middleware.run(next, sender_context, target, envelope).await
      }
      None => self.chain.terminal.run(sender_context, target, envelope).await,
    }
  }
}

/// Ordered list of spawn middlewares closed by a spawner.
#[derive(Debug, Clone)]
pub struct SpawnMiddlewareChain {
  middlewares: Arc<[SpawnMiddleware]>,
  terminal: Spawner,
}

impl SpawnMiddlewareChain {
  pub fn new(middlewares: &[SpawnMiddleware], terminal: Spawner) -> Self {
    Self {
      middlewares: Arc::from(middlewares),
      terminal,
    }
  }

  pub fn middleware_names(&self) -> Vec<&str> {
    self.middlewares.iter().map(|m| m.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.middlewares.len()
  }

  pub fn is_empty(&self) -> bool {
    self.middlewares.is_empty()
  }

  pub async fn run(
    &self,
    actor_system: ActorSystem,
    id: &str,
    props: Props,
    parent_context: SpawnerContextHandle,
  ) -> Result<Pid, SpawnError> {
    SpawnMiddlewareNext {
      chain: self.clone(),
      index: 0,
    }
    .run(actor_system, id.to_string(), props, parent_context)
    .await
  }
}

/// Remainder of a spawn chain, handed to each middleware.
#[derive(Debug, Clone)]
pub struct SpawnMiddlewareNext {
  chain: SpawnMiddlewareChain,
  index: usize,
}

impl SpawnMiddlewareNext {
  pub async fn run(
    self,
    actor_system: ActorSystem,
    id: String,
    props: Props,
    parent_context: SpawnerContextHandle,
  ) -> Result<Pid, SpawnError> {
    match self.chain.middlewares.get(self.index) {
      Some(middleware) => {
        let next = SpawnMiddlewareNext {
          chain: self.chain.clone(),
          index: self.index + 1,
        };
        middleware.run(next, actor_system, id, props, parent_context).await
      }
      None => self.chain.terminal.run(actor_system, &id, props, parent_context).await,
    }
  }
}

/// Composes the middlewares around `terminal`. `None` when there is nothing to compose, in
/// which case callers use the terminal path directly.
pub fn make_sender_middleware_chain(
  sender_middleware: &[SenderMiddleware],
  terminal: SenderTerminal,
) -> Option<SenderMiddlewareChain> {
  if sender_middleware.is_empty() {
    return None;
  }
  Some(SenderMiddlewareChain::new(sender_middleware, terminal))
}

pub fn make_spawn_middleware_chain(
  spawn_middleware: &[SpawnMiddleware],
  terminal: Spawner,
) -> Option<SpawnMiddlewareChain> {
  if spawn_middleware.is_empty() {
    return None;
  }
  Some(SpawnMiddlewareChain::new(spawn_middleware, terminal))
}
