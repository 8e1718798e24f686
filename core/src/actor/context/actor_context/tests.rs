use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use relay_actor_utils_rs::concurrent::CountDownLatch;

use crate::actor::actor_system::ActorSystem;
use crate::actor::context::{ActorContext, MessagePart, SenderPart, SpawnerPart, StopperPart};
use crate::actor::core::{Actor, ActorError, ErrorReason, Props, SpawnError};
use crate::actor::message::{MessageHandle, Terminated};
use crate::actor::pid::Pid;
use crate::actor::supervisor::{Directive, OneForOneStrategy, SupervisorStrategyHandle};

#[derive(Debug)]
struct LifecycleActor {
  events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Actor for LifecycleActor {
  async fn receive(&mut self, ctx: ActorContext) -> Result<(), ActorError> {
    let message_handle = ctx.get_message_handle_opt().await.unwrap();
    if let Some(text) = message_handle.to_typed::<String>() {
      if text == "fail" {
        return Err(ActorError::of_receive_error(ErrorReason::new("asked to fail", 1)));
      }
      self.events.lock().push(format!("receive:{}", text));
      ctx.respond(MessageHandle::new(text)).await;
    }
    Ok(())
  }

  async fn pre_start(&mut self, _: ActorContext) -> Result<(), ActorError> {
    self.events.lock().push("pre_start".to_string());
    Ok(())
  }

  async fn pre_restart(&mut self, _: ActorContext) -> Result<(), ActorError> {
    self.events.lock().push("pre_restart".to_string());
    Ok(())
  }

  async fn post_stop(&mut self, _: ActorContext) -> Result<(), ActorError> {
    self.events.lock().push("post_stop".to_string());
    Ok(())
  }
}

async fn lifecycle_props(events: Arc<Mutex<Vec<String>>>) -> Props {
  Props::from_async_actor_producer(move |_| {
    let events = events.clone();
    async move { LifecycleActor { events } }
  })
  .await
}

async fn ask(system: &ActorSystem, pid: &Pid, text: &str) -> MessageHandle {
  system
    .get_root_context()
    .request_future(pid.clone(), MessageHandle::new(text.to_string()), Duration::from_secs(1))
    .await
    .result()
    .await
    .unwrap()
}

#[tokio::test]
async fn test_failure_restarts_with_fresh_instance() {
  let system = ActorSystem::new();
  let events = Arc::new(Mutex::new(Vec::new()));
  let root = system.get_root_context();
  let pid = root.spawn(lifecycle_props(events.clone()).await).await;

  assert_eq!(ask(&system, &pid, "one").await, MessageHandle::new("one".to_string()));
  root.send(pid.clone(), MessageHandle::new("fail".to_string())).await;
  assert_eq!(ask(&system, &pid, "two").await, MessageHandle::new("two".to_string()));

  assert_eq!(
    *events.lock(),
    vec!["pre_start", "receive:one", "pre_restart", "pre_start", "receive:two"]
  );
}

#[tokio::test]
async fn test_stop_unregisters_and_runs_post_stop() {
  let system = ActorSystem::new();
  let events = Arc::new(Mutex::new(Vec::new()));
  let root = system.get_root_context();
  let pid = root.spawn_named(lifecycle_props(events.clone()).await, "stoppable").await.unwrap();
  ask(&system, &pid, "hello").await;

  root.stop(&pid).await;

  for _ in 0..100 {
    if system.get_process_registry().find_local_process("stoppable").is_none() {
      break;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
  }
  assert!(system.get_process_registry().find_local_process("stoppable").is_none());
  assert_eq!(events.lock().last().map(|s| s.as_str()), Some("post_stop"));
}

#[tokio::test]
async fn test_children_are_named_after_parent_and_reported_on_stop() {
  let system = ActorSystem::new();
  let terminated = CountDownLatch::new(1);
  let cloned = terminated.clone();
  let children = Arc::new(Mutex::new(Vec::<Pid>::new()));
  let cloned_children = children.clone();

  #[derive(Debug)]
  struct ParentActor {
    terminated: CountDownLatch,
    children: Arc<Mutex<Vec<Pid>>>,
  }

  #[async_trait]
  impl Actor for ParentActor {
    async fn receive(&mut self, ctx: ActorContext) -> Result<(), ActorError> {
      let child_props = Props::from_async_actor_receiver(|_| async { Ok(()) }).await;
      let child = ctx.spawn_named(child_props, "child").await.unwrap();
      self.children.lock().push(child.clone());
      ctx.stop(&child).await;
      Ok(())
    }

    async fn post_child_terminate(&mut self, ctx: ActorContext, child: &Pid) -> Result<(), ActorError> {
      assert!(!ctx.get_children().contains(child));
      self.terminated.count_down().await;
      Ok(())
    }
  }

  let props = Props::from_async_actor_producer(move |_| {
    let terminated = cloned.clone();
    let children = cloned_children.clone();
    async move { ParentActor { terminated, children } }
  })
  .await;
  let root = system.get_root_context();
  let parent = root.spawn_named(props, "parent").await.unwrap();
  root.send(parent, MessageHandle::new(1_i32)).await;

  tokio::time::timeout(Duration::from_secs(1), terminated.wait())
    .await
    .unwrap();
  assert_eq!(*children.lock(), vec![Pid::new(&system.get_address(), "parent/child")]);
}

#[tokio::test]
async fn test_watcher_receives_terminated() {
  let system = ActorSystem::new();
  let root = system.get_root_context();
  let watched = root
    .spawn(Props::from_async_actor_receiver(|_| async { Ok(()) }).await)
    .await;

  let seen = Arc::new(Mutex::new(Vec::new()));
  let latch = CountDownLatch::new(1);
  let (cloned_seen, cloned_latch, target) = (seen.clone(), latch.clone(), watched.clone());
  let watcher = root
    .spawn(
      Props::from_async_actor_receiver(move |ctx: ActorContext| {
        let (seen, latch, target) = (cloned_seen.clone(), cloned_latch.clone(), target.clone());
        async move {
          let message_handle = ctx.get_message_handle_opt().await.unwrap();
          if let Some(terminated) = message_handle.to_typed::<Terminated>() {
            seen.lock().push(terminated.who);
            latch.count_down().await;
          } else {
            ctx.watch(&target).await;
            ctx.respond(MessageHandle::new(true)).await;
          }
          Ok(())
        }
      })
      .await,
    )
    .await;

  ask(&system, &watcher, "watch").await;
  root.stop(&watched).await;

  tokio::time::timeout(Duration::from_secs(1), latch.wait()).await.unwrap();
  assert_eq!(*seen.lock(), vec![watched]);
}

#[tokio::test]
async fn test_child_props_cannot_carry_a_guardian() {
  let system = ActorSystem::new();
  let result = Arc::new(Mutex::new(None));
  let cloned = result.clone();
  let root = system.get_root_context();
  let pid = root
    .spawn(
      Props::from_async_actor_receiver(move |ctx: ActorContext| {
        let result = cloned.clone();
        async move {
          let props = Props::from_async_actor_receiver_with_opts(
            |_| async { Ok(()) },
            [Props::with_guardian(crate::actor::supervisor::DEFAULT_SUPERVISION_STRATEGY.clone())],
          )
          .await;
          let spawned = ctx.spawn_named(props, "guarded").await;
          *result.lock() = Some(spawned);
          ctx.respond(MessageHandle::new(true)).await;
          Ok(())
        }
      })
      .await,
    )
    .await;

  ask(&system, &pid, "go").await;

  assert!(matches!(*result.lock(), Some(Err(SpawnError::Rejected(_)))));
}

#[tokio::test]
async fn test_request_sets_self_as_sender() {
  let system = ActorSystem::new();
  let root = system.get_root_context();
  let responder = root
    .spawn(
      Props::from_async_actor_receiver(|ctx: ActorContext| async move {
        if let Some(sender) = ctx.get_sender().await {
          ctx.send(sender.clone(), MessageHandle::new(sender.id().to_string())).await;
        }
        Ok(())
      })
      .await,
    )
    .await;

  let replies = Arc::new(Mutex::new(Vec::new()));
  let latch = CountDownLatch::new(1);
  let (cloned_replies, cloned_latch, target) = (replies.clone(), latch.clone(), responder.clone());
  let requester = root
    .spawn_named(
      Props::from_async_actor_receiver(move |ctx: ActorContext| {
        let (replies, latch, target) = (cloned_replies.clone(), cloned_latch.clone(), target.clone());
        async move {
          let message_handle = ctx.get_message_handle_opt().await.unwrap();
          match message_handle.to_typed::<String>() {
            Some(reply) => {
              replies.lock().push(reply);
              latch.count_down().await;
            }
            None => ctx.request(target, MessageHandle::new(0_i32)).await,
          }
          Ok(())
        }
      })
      .await,
      "requester",
    )
    .await
    .unwrap();

  root.send(requester, MessageHandle::new(1_i32)).await;

  tokio::time::timeout(Duration::from_secs(1), latch.wait()).await.unwrap();
  assert_eq!(*replies.lock(), vec!["requester".to_string()]);
}

fn deciding(directive: Directive) -> SupervisorStrategyHandle {
  SupervisorStrategyHandle::new(
    OneForOneStrategy::new(10, Duration::from_secs(10)).with_decider(move |_| async move { directive }),
  )
}

#[derive(Debug)]
struct LeafActor {
  events: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Actor for LeafActor {
  async fn receive(&mut self, ctx: ActorContext) -> Result<(), ActorError> {
    let message_handle = ctx.get_message_handle_opt().await.unwrap();
    if message_handle.to_typed::<String>().as_deref() == Some("fail") {
      return Err(ActorError::of_receive_error(ErrorReason::new("leaf failed", 1)));
    }
    Ok(())
  }

  async fn post_stop(&mut self, _: ActorContext) -> Result<(), ActorError> {
    self.events.lock().push("leaf:post_stop".to_string());
    Ok(())
  }
}

#[derive(Debug)]
struct MiddleActor {
  generation: usize,
  events: Arc<Mutex<Vec<String>>>,
  leaf: Arc<Mutex<Option<Pid>>>,
}

#[async_trait]
impl Actor for MiddleActor {
  async fn receive(&mut self, ctx: ActorContext) -> Result<(), ActorError> {
    let text = ctx.get_message_handle_opt().await.and_then(|m| m.to_typed::<String>());
    match text.as_deref() {
      Some("spawn-leaf") => {
        let events = self.events.clone();
        let props = Props::from_async_actor_producer(move |_| {
          let events = events.clone();
          async move { LeafActor { events } }
        })
        .await;
        let pid = ctx.spawn_named(props, "leaf").await.unwrap();
        *self.leaf.lock() = Some(pid);
        ctx.respond(MessageHandle::new(true)).await;
      }
      Some("after") => {
        self.events.lock().push(format!("mid:after:{}", self.generation));
        ctx.respond(MessageHandle::new(true)).await;
      }
      _ => {}
    }
    Ok(())
  }

  async fn pre_restart(&mut self, _: ActorContext) -> Result<(), ActorError> {
    self.events.lock().push("mid:pre_restart".to_string());
    Ok(())
  }
}

#[tokio::test]
async fn test_escalation_reaches_the_grandparent() {
  let system = ActorSystem::new();
  let events = Arc::new(Mutex::new(Vec::<String>::new()));
  let leaf = Arc::new(Mutex::new(None::<Pid>));
  let middle = Arc::new(Mutex::new(None::<Pid>));
  let generations = Arc::new(AtomicUsize::new(0));

  let middle_props = {
    let events = events.clone();
    let leaf = leaf.clone();
    Props::from_async_actor_producer_with_opts(
      move |_| {
        let events = events.clone();
        let leaf = leaf.clone();
        let generation = generations.fetch_add(1, Ordering::SeqCst) + 1;
        async move { MiddleActor { generation, events, leaf } }
      },
      [Props::with_supervisor_strategy(deciding(Directive::Escalate))],
    )
    .await
  };
  let top_props = {
    let middle = middle.clone();
    Props::from_async_actor_receiver_with_opts(
      move |ctx: ActorContext| {
        let middle = middle.clone();
        let middle_props = middle_props.clone();
        async move {
          let pid = ctx.spawn_named(middle_props, "middle").await.unwrap();
          *middle.lock() = Some(pid);
          ctx.respond(MessageHandle::new(true)).await;
          Ok(())
        }
      },
      [Props::with_supervisor_strategy(deciding(Directive::Restart))],
    )
    .await
  };

  let root = system.get_root_context();
  let top = root.spawn_named(top_props, "top").await.unwrap();
  ask(&system, &top, "spawn-middle").await;
  let middle_pid = middle.lock().clone().unwrap();
  ask(&system, &middle_pid, "spawn-leaf").await;
  let leaf_pid = leaf.lock().clone().unwrap();
  assert_eq!(leaf_pid.id(), "top/middle/leaf");

  root.send(leaf_pid.clone(), MessageHandle::new("fail".to_string())).await;
  for _ in 0..200 {
    if events.lock().iter().any(|e| e == "leaf:post_stop") {
      break;
    }
    tokio::time::sleep(Duration::from_millis(5)).await;
  }
  ask(&system, &middle_pid, "after").await;

  assert_eq!(*events.lock(), vec!["mid:pre_restart", "leaf:post_stop", "mid:after:2"]);
  assert!(system.get_process_registry().find_local_process(leaf_pid.id()).is_none());
  assert!(system.get_process_registry().find_local_process(middle_pid.id()).is_some());
}
