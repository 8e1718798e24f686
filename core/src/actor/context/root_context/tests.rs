use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{ActorContext, InfoPart, MessagePart, SenderContextHandle, SenderPart, SpawnerPart};
use crate::actor::core::{Props, SenderMiddleware, SenderMiddlewareNext, SpawnError, SpawnMiddleware};
use crate::actor::message::{MessageEnvelope, MessageHandle, MessageHeaders, ReadonlyMessageHeaders};
use crate::actor::pid::Pid;
use crate::actor::process::ActorFutureError;
use crate::actor::supervisor::{OneForOneStrategy, SupervisorStrategyHandle};

async fn echo_props() -> Props {
  Props::from_async_actor_receiver(|ctx: ActorContext| async move {
    if let Some(message_handle) = ctx.get_message_handle_opt().await {
      ctx.respond(message_handle).await;
    }
    Ok(())
  })
  .await
}

#[tokio::test]
async fn test_with_guardian_derives_a_new_context() {
  let system = ActorSystem::new();
  let strategy = SupervisorStrategyHandle::new(OneForOneStrategy::new(1, Duration::from_secs(1)));
  let base = system.get_root_context();
  let derived = base.clone().with_guardian(strategy.clone());

  assert!(base.get_guardian_strategy().is_none());
  assert_eq!(base.get_self_opt().await, None);
  assert_eq!(derived.get_guardian_strategy(), Some(&strategy));

  let guardian_pid = derived.get_self_opt().await.unwrap();
  assert!(guardian_pid.id().starts_with("guardian"));
  assert_eq!(derived.get_self_opt().await, Some(guardian_pid));
  assert_eq!(system.get_guardians().len(), 1);
}

#[tokio::test]
async fn test_request_future_receives_reply() {
  let system = ActorSystem::new();
  let root = system.get_root_context();
  let pid = root.spawn(echo_props().await).await;

  let future = root
    .request_future(pid, MessageHandle::new("ping".to_string()), Duration::from_secs(1))
    .await;

  assert_eq!(future.result().await, Ok(MessageHandle::new("ping".to_string())));
}

#[tokio::test]
async fn test_sender_middleware_sees_envelope_and_headers() {
  let system = ActorSystem::new();
  let seen = Arc::new(Mutex::new(Vec::<(MessageEnvelope, Option<String>)>::new()));
  let cloned = seen.clone();
  let recorder = SenderMiddleware::new(
    "recorder",
    move |next: SenderMiddlewareNext, ctx: SenderContextHandle, target: Pid, envelope: MessageEnvelope| {
      let seen = cloned.clone();
      async move {
        let tenant = ctx.get_message_header().await.and_then(|h| h.get("tenant"));
        seen.lock().push((envelope.clone(), tenant));
        next.run(ctx, target, envelope).await
      }
    },
  );
  let headers = MessageHeaders::with_values([("tenant".to_string(), "acme".to_string())]);
  let root = system
    .get_root_context()
    .with_headers(headers)
    .with_sender_middlewares([recorder]);
  let pid = root.spawn(echo_props().await).await;

  let future = root
    .request_future(pid.clone(), MessageHandle::new("hello".to_string()), Duration::from_secs(1))
    .await;
  assert_eq!(future.result().await, Ok(MessageHandle::new("hello".to_string())));

  root.send(pid, MessageHandle::new("bare".to_string())).await;

  let seen = seen.lock().clone();
  assert_eq!(seen.len(), 2);
  assert_eq!(seen[0].0.get_sender(), Some(future.get_pid()));
  assert_eq!(seen[0].1.as_deref(), Some("acme"));
  assert_eq!(seen[1].0.get_message_handle(), MessageHandle::new("bare".to_string()));
  assert_eq!(seen[1].0.get_sender(), None);
}

#[tokio::test]
async fn test_sender_middleware_can_swallow_messages() {
  let system = ActorSystem::new();
  let blackhole = SenderMiddleware::new("blackhole", |_, _, _, _| async {});
  let root = system.get_root_context().with_sender_middlewares([blackhole]);
  let pid = root.spawn(echo_props().await).await;

  let future = root
    .request_future(pid, MessageHandle::new("ping".to_string()), Duration::from_millis(50))
    .await;

  assert_eq!(future.result().await, Err(ActorFutureError::TimeoutError));
}

#[tokio::test]
async fn test_spawn_middleware_can_refuse_a_spawn() {
  let system = ActorSystem::new();
  let deny = SpawnMiddleware::new("deny", |_, _, name: String, _, _| async move {
    Err(SpawnError::Rejected(name))
  });
  let root = system.get_root_context().with_spawn_middlewares([deny]);

  let result = root.spawn_named(echo_props().await, "refused").await;

  assert_eq!(result, Err(SpawnError::Rejected("refused".to_string())));
  assert!(system.get_process_registry().find_local_process("refused").is_none());
}

#[tokio::test]
async fn test_props_guardian_becomes_parent() {
  let system = ActorSystem::new();
  let strategy = SupervisorStrategyHandle::new(OneForOneStrategy::new(1, Duration::from_secs(1)));
  let parents = Arc::new(Mutex::new(Vec::new()));
  let cloned = parents.clone();
  let props = Props::from_async_actor_receiver_with_opts(
    move |ctx: ActorContext| {
      let parents = cloned.clone();
      async move {
        let parent = ctx.get_parent().await;
        parents.lock().push(parent);
        ctx.respond(MessageHandle::new(true)).await;
        Ok(())
      }
    },
    [Props::with_guardian(strategy.clone())],
  )
  .await;
  let root = system.get_root_context();
  let pid = root.spawn(props).await;

  let future = root
    .request_future(pid, MessageHandle::new(1_i32), Duration::from_secs(1))
    .await;
  assert!(future.result().await.is_ok());

  let guardian_pid = root.clone().with_guardian(strategy).get_self_opt().await;
  assert!(guardian_pid.is_some());
  assert_eq!(*parents.lock(), vec![guardian_pid]);
}
