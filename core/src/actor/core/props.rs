use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{ActorContext, InfoPart, SpawnerContextHandle};
use crate::actor::core::actor::Actor;
use crate::actor::core::actor_error::ActorError;
use crate::actor::core::actor_handle::ActorHandle;
use crate::actor::core::actor_producer::ActorProducer;
use crate::actor::core::actor_receiver::{ActorReceiver, ActorReceiverActor};
use crate::actor::core::middleware_chain::{
  make_sender_middleware_chain, make_spawn_middleware_chain, SenderMiddlewareChain, SenderTerminal,
  SpawnMiddlewareChain,
};
use crate::actor::core::sender_middleware::SenderMiddleware;
use crate::actor::core::spawn_middleware::SpawnMiddleware;
use crate::actor::core::spawner::{SpawnError, Spawner};
use crate::actor::dispatch::{DefaultMailbox, DispatcherHandle, Mailbox, MessageInvokerHandle};
use crate::actor::message::SystemMessage;
use crate::actor::pid::Pid;
use crate::actor::process::{ActorProcess, ProcessHandle};
use crate::actor::supervisor::SupervisorStrategyHandle;


/// Recipe for an actor: how to produce it and how to wire it into the system.
#[derive(Debug, Clone)]
pub struct Props {
  producer: ActorProducer,
  spawner: Option<Spawner>,
  dispatcher: Option<DispatcherHandle>,
  guardian_strategy: Option<SupervisorStrategyHandle>,
  supervisor_strategy: Option<SupervisorStrategyHandle>,
  sender_middleware: Vec<SenderMiddleware>,
  sender_middleware_chain: Option<SenderMiddlewareChain>,
  spawn_middleware: Vec<SpawnMiddleware>,
  spawn_middleware_chain: Option<SpawnMiddlewareChain>,
}

static_assertions::assert_impl_all!(Props: Send, Sync);

static DEFAULT_SPAWNER: Lazy<Spawner> = Lazy::new(|| {
  Spawner::new(
    |actor_system: ActorSystem, name: String, props: Props, parent_context: SpawnerContextHandle| async move {
      tracing::debug!("Spawn actor: {}", name);
      let process_registry = actor_system.get_process_registry();
      let parent = parent_context.get_self_opt().await;
      let self_pid = Pid::new(&process_registry.get_address(), &name);
      if process_registry.find_local_process(&name).is_some() {
        return Err(SpawnError::NameExists(self_pid));
      }

      let ctx = ActorContext::new(actor_system.clone(), props.clone(), parent, self_pid).await;
      let dispatcher = props
        .get_dispatcher()
        .unwrap_or_else(|| actor_system.get_config().system_dispatcher.clone());
      let mailbox = DefaultMailbox::new();
      mailbox.register_handlers(MessageInvokerHandle::new(Arc::new(ctx)), dispatcher);

      let process = ActorProcess::new(mailbox.to_handle());
      let (pid, absent) = process_registry.add_process(ProcessHandle::new(process), &name);
      if !absent {
        return Err(SpawnError::NameExists(pid));
      }

      mailbox.post_system_message(SystemMessage::Started).await;
      tracing::debug!("Actor started: {}", pid);
      Ok(pid)
    },
  )
});

type PropsOptionFn = Arc<dyn Fn(&mut Props) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct PropsOption(PropsOptionFn);

impl PropsOption {
  pub fn new(f: impl Fn(&mut Props) + Send + Sync + 'static) -> Self {
    Self(Arc::new(f))
  }

  pub fn run(&self, props: &mut Props) {
    (self.0)(props)
  }
}

impl Debug for PropsOption {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "PropsOption")
  }
}

impl Props {
  pub fn with_dispatcher(dispatcher: DispatcherHandle) -> PropsOption {
    PropsOption::new(move |props: &mut Props| {
      props.dispatcher = Some(dispatcher.clone());
    })
  }

  /// Actors spawned from the root with these props are parented to the guardian of `guardian`.
  pub fn with_guardian(guardian: SupervisorStrategyHandle) -> PropsOption {
    PropsOption::new(move |props: &mut Props| {
      props.guardian_strategy = Some(guardian.clone());
    })
  }

  pub fn with_supervisor_strategy(supervisor: SupervisorStrategyHandle) -> PropsOption {
    PropsOption::new(move |props: &mut Props| {
      props.supervisor_strategy = Some(supervisor.clone());
    })
  }

  /// Middlewares applied to every send made from the actor's own context.
  pub fn with_sender_middlewares(middlewares: impl IntoIterator<Item = SenderMiddleware>) -> PropsOption {
    let middlewares = middlewares.into_iter().collect::<Vec<_>>();
    PropsOption::new(move |props: &mut Props| {
      props.sender_middleware.extend(middlewares.clone());
      props.sender_middleware_chain = make_sender_middleware_chain(&props.sender_middleware, SenderTerminal::deliver());
    })
  }

  /// Middlewares applied to every child the actor spawns.
  pub fn with_spawn_middlewares(middlewares: impl IntoIterator<Item = SpawnMiddleware>) -> PropsOption {
    let middlewares = middlewares.into_iter().collect::<Vec<_>>();
    PropsOption::new(move |props: &mut Props| {
      props.spawn_middleware.extend(middlewares.clone());
      props.spawn_middleware_chain = make_spawn_middleware_chain(
        &props.spawn_middleware,
        Spawner::new(|s, id, p: Props, parent| async move { p.spawn(s, &id, parent).await }),
      );
    })
  }

  pub fn with_spawner(spawner: Spawner) -> PropsOption {
    PropsOption::new(move |props: &mut Props| {
      props.spawner = Some(spawner.clone());
    })
  }

  pub async fn from_async_actor_producer<A, F, Fut>(f: F) -> Props
  where
    A: Actor,
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A> + Send + 'static, {
    Props::from_async_actor_producer_with_opts(f, []).await
  }

  pub async fn from_async_actor_producer_with_opts<A, F, Fut>(f: F, opts: impl IntoIterator<Item = PropsOption>) -> Props
  where
    A: Actor,
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = A> + Send + 'static, {
    Props::from_producer_with_opts(ActorProducer::new(f), opts)
  }

  pub async fn from_async_actor_receiver<F, Fut>(f: F) -> Props
  where
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActorError>> + Send + 'static, {
    Props::from_async_actor_receiver_with_opts(f, []).await
  }

  pub async fn from_async_actor_receiver_with_opts<F, Fut>(f: F, opts: impl IntoIterator<Item = PropsOption>) -> Props
  where
    F: Fn(ActorContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActorError>> + Send + 'static, {
    let actor_receiver = ActorReceiver::new(f);
    let producer = ActorProducer::from_handle(move |_| {
      let actor_receiver = actor_receiver.clone();
      async move { ActorHandle::new(ActorReceiverActor::new(actor_receiver)) }
    });
    Props::from_producer_with_opts(producer, opts)
  }

  fn from_producer_with_opts(producer: ActorProducer, opts: impl IntoIterator<Item = PropsOption>) -> Props {
    let mut props = Props {
      producer,
      spawner: None,
      dispatcher: None,
      guardian_strategy: None,
      supervisor_strategy: None,
      sender_middleware: vec![],
      sender_middleware_chain: None,
      spawn_middleware: vec![],
      spawn_middleware_chain: None,
    };
    props.configure(opts);
    props
  }

  pub fn configure(&mut self, opts: impl IntoIterator<Item = PropsOption>) -> &mut Self {
    for opt in opts {
      opt.run(self);
    }
    self
  }

  pub fn get_producer(&self) -> ActorProducer {
    self.producer.clone()
  }

  pub fn get_guardian_strategy(&self) -> Option<SupervisorStrategyHandle> {
    self.guardian_strategy.clone()
  }

  pub fn get_supervisor_strategy(&self) -> Option<SupervisorStrategyHandle> {
    self.supervisor_strategy.clone()
  }

  pub fn get_dispatcher(&self) -> Option<DispatcherHandle> {
    self.dispatcher.clone()
  }

  pub fn get_sender_middleware_chain(&self) -> Option<SenderMiddlewareChain> {
    self.sender_middleware_chain.clone()
  }

  pub fn get_spawn_middleware_chain(&self) -> Option<SpawnMiddlewareChain> {
    self.spawn_middleware_chain.clone()
  }

  fn get_spawner(&self) -> Spawner {
    self.spawner.clone().unwrap_or_else(|| DEFAULT_SPAWNER.clone())
  }

  /// Creates, registers and starts the actor under `name`.
  ///
  /// The process is only published in the registry once its mailbox is fully wired, so a
  /// concurrent send can never observe a half-initialized actor.
  pub async fn spawn(
    self,
    actor_system: ActorSystem,
    name: &str,
    parent_context: SpawnerContextHandle,
  ) -> Result<Pid, SpawnError> {
    let spawner = self.get_spawner();
    spawner.run(actor_system, name, self, parent_context).await
  }
}
