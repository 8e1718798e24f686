use std::sync::{Arc, Weak};

use uuid::Uuid;

use crate::actor::context::RootContext;
use crate::actor::guardian::GuardiansValue;
use crate::actor::process::{DeadLetterProcess, ProcessHandle, ProcessRegistry, DEAD_LETTER_ID};
use crate::actor::{Config, ConfigOption};
use crate::event_stream::EventStream;


#[derive(Debug)]
struct ActorSystemInner {
  id: String,
  config: Config,
  process_registry: ProcessRegistry,
  guardians: GuardiansValue,
  event_stream: EventStream,
}

/// Owner of everything shared by the actors of one runtime: the registry, the guardians, the
/// event stream and the configuration. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct ActorSystem {
  inner: Arc<ActorSystemInner>,
}

/// Non-owning reference held by long-lived processes (dead letter, futures, guardians).
#[derive(Debug, Clone)]
pub struct WeakActorSystem {
  inner: Weak<ActorSystemInner>,
}

static_assertions::assert_impl_all!(ActorSystem: Send, Sync);

impl ActorSystem {
  pub fn new() -> Self {
    Self::new_config_options([])
  }

  pub fn new_config_options(options: impl IntoIterator<Item = ConfigOption>) -> Self {
    Self::new_with_config(Config::from(options))
  }

  pub fn new_with_config(config: Config) -> Self {
    let inner = Arc::new_cyclic(|weak: &Weak<ActorSystemInner>| {
      let dead_letter = ProcessHandle::new(DeadLetterProcess::new(WeakActorSystem { inner: weak.clone() }));
      let process_registry = ProcessRegistry::new(dead_letter.clone());
      let (pid, absent) = process_registry.add_process(dead_letter, DEAD_LETTER_ID);
      if !absent {
        tracing::error!("ActorSystem: dead letter process already registered: pid = {}", pid);
      }
      ActorSystemInner {
        id: Uuid::new_v4().to_string(),
        config,
        process_registry,
        guardians: GuardiansValue::new(),
        event_stream: EventStream::new(),
      }
    });
    let system = ActorSystem { inner };
    DeadLetterProcess::subscribe(&system);
    tracing::debug!("ActorSystem: started: id = {}", system.get_id());
    system
  }

  pub fn downgrade(&self) -> WeakActorSystem {
    WeakActorSystem {
      inner: Arc::downgrade(&self.inner),
    }
  }

  pub fn get_id(&self) -> &str {
    &self.inner.id
  }

  pub fn get_address(&self) -> String {
    self.inner.process_registry.get_address()
  }

  pub fn get_config(&self) -> &Config {
    &self.inner.config
  }

  pub fn get_process_registry(&self) -> &ProcessRegistry {
    &self.inner.process_registry
  }

  pub fn get_guardians(&self) -> &GuardiansValue {
    &self.inner.guardians
  }

  pub fn get_event_stream(&self) -> &EventStream {
    &self.inner.event_stream
  }

  pub fn get_dead_letter(&self) -> ProcessHandle {
    self.inner.process_registry.get_dead_letter()
  }

  /// A fresh root context with no headers, middleware or guardian.
  pub fn get_root_context(&self) -> RootContext {
    RootContext::new(self.clone())
  }
}

impl Default for ActorSystem {
  fn default() -> Self {
    Self::new()
  }
}

impl PartialEq for ActorSystem {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl Eq for ActorSystem {}

impl WeakActorSystem {
  pub fn upgrade(&self) -> Option<ActorSystem> {
    self.inner.upgrade().map(|inner| ActorSystem { inner })
  }
}
