use std::sync::Arc;

use parking_lot::Mutex;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{SenderContextHandle, SpawnerContextHandle};
use crate::actor::core::{
  make_sender_middleware_chain, make_spawn_middleware_chain, Props, SenderMiddleware, SenderMiddlewareNext,
  SenderTerminal, SpawnError, SpawnMiddleware, SpawnMiddlewareNext, Spawner,
};
use crate::actor::message::{MessageEnvelope, MessageHandle};
use crate::actor::pid::Pid;

type Log = Arc<Mutex<Vec<String>>>;

fn tracing_middleware(name: &'static str, log: Log) -> SenderMiddleware {
  SenderMiddleware::new(
    name,
    move |next: SenderMiddlewareNext, ctx: SenderContextHandle, target: Pid, envelope: MessageEnvelope| {
      let log = log.clone();
      async move {
        log.lock().push(format!("{}:before", name));
        next.run(ctx, target, envelope).await;
        log.lock().push(format!("{}:after", name));
      }
    },
  )
}

fn recording_terminal(log: Log) -> SenderTerminal {
  SenderTerminal::new(move |_, target: Pid, envelope: MessageEnvelope| {
    let log = log.clone();
    async move {
      let tag = envelope.get_header_value("tag").unwrap_or_default();
      log.lock().push(format!("terminal:{}:{}", target.id(), tag));
    }
  })
}

#[test]
fn test_empty_lists_build_no_chain() {
  assert!(make_sender_middleware_chain(&[], SenderTerminal::deliver()).is_none());
  let spawner = Spawner::new(|_, id: String, _, _| async move { Ok(Pid::new("nonhost", &id)) });
  assert!(make_spawn_middleware_chain(&[], spawner).is_none());
}

#[tokio::test]
async fn test_first_declared_is_outermost() {
  let system = ActorSystem::new();
  let log = Log::default();
  let chain = make_sender_middleware_chain(
    &[tracing_middleware("a", log.clone()), tracing_middleware("b", log.clone())],
    recording_terminal(log.clone()),
  )
  .unwrap();

  assert_eq!(chain.middleware_names(), vec!["a", "b"]);
  chain
    .run(
      SenderContextHandle::new(system.get_root_context()),
      Pid::new("nonhost", "target"),
      MessageEnvelope::new(MessageHandle::new(1_i32)),
    )
    .await;

  assert_eq!(
    *log.lock(),
    vec!["a:before", "b:before", "terminal:target:", "b:after", "a:after"]
  );
}

#[tokio::test]
async fn test_middleware_can_rewrite_or_drop() {
  let system = ActorSystem::new();
  let log = Log::default();
  let tagger = SenderMiddleware::new("tagger", |next: SenderMiddlewareNext, ctx, target, envelope: MessageEnvelope| {
    next.run(ctx, target, envelope.with_header_value("tag", "x"))
  });
  let filter = SenderMiddleware::new(
    "filter",
    |next: SenderMiddlewareNext, ctx, target: Pid, envelope: MessageEnvelope| async move {
      if target.id() != "blocked" {
        next.run(ctx, target, envelope).await;
      }
    },
  );
  let chain = make_sender_middleware_chain(&[tagger, filter], recording_terminal(log.clone())).unwrap();
  let ctx = SenderContextHandle::new(system.get_root_context());

  for id in ["open", "blocked"] {
    chain
      .run(
        ctx.clone(),
        Pid::new("nonhost", id),
        MessageEnvelope::new(MessageHandle::new(1_i32)),
      )
      .await;
  }

  assert_eq!(*log.lock(), vec!["terminal:open:x"]);
}

#[tokio::test]
async fn test_spawn_chain_order_and_refusal() {
  let system = ActorSystem::new();
  let log = Log::default();
  let spawn_tracer = |name: &'static str, log: Log| {
    SpawnMiddleware::new(
      name,
      move |next: SpawnMiddlewareNext, system, id: String, props, parent| {
        let log = log.clone();
        async move {
          log.lock().push(format!("{}:{}", name, id));
          if id == "forbidden" {
            return Err(SpawnError::Rejected(id));
          }
          next.run(system, id, props, parent).await
        }
      },
    )
  };
  let cloned = log.clone();
  let terminal = Spawner::new(move |_, id: String, _, _| {
    let log = cloned.clone();
    async move {
      log.lock().push(format!("spawn:{}", id));
      Ok(Pid::new("nonhost", &id))
    }
  });
  let chain = make_spawn_middleware_chain(
    &[spawn_tracer("outer", log.clone()), spawn_tracer("inner", log.clone())],
    terminal,
  )
  .unwrap();
  let props = Props::from_async_actor_receiver(|_| async { Ok(()) }).await;
  let parent = SpawnerContextHandle::new(system.get_root_context());

  let ok = chain.run(system.clone(), "allowed", props.clone(), parent.clone()).await;
  let refused = chain.run(system.clone(), "forbidden", props, parent).await;

  assert_eq!(ok, Ok(Pid::new("nonhost", "allowed")));
  assert_eq!(refused, Err(SpawnError::Rejected("forbidden".to_string())));
  assert_eq!(
    *log.lock(),
    vec![
      "outer:allowed",
      "inner:allowed",
      "spawn:allowed",
      "outer:forbidden"
    ]
  );
}
