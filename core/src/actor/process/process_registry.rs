use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use siphasher::sip::SipHasher;
use thiserror::Error;

use crate::actor::pid::{Pid, LOCAL_ADDRESS};
use crate::actor::process::{Process, ProcessHandle};


const BUCKET_COUNT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessRegistryError {
  #[error("Name already exists: {0}")]
  NameExists(Pid),
}

#[derive(Debug, Clone)]
struct SliceMap {
  buckets: Arc<Vec<DashMap<String, ProcessHandle>>>,
}

impl SliceMap {
  fn new() -> Self {
    let mut buckets = Vec::with_capacity(BUCKET_COUNT);
    for _ in 0..BUCKET_COUNT {
      buckets.push(DashMap::new());
    }
    Self {
      buckets: Arc::new(buckets),
    }
  }

  fn get_bucket(&self, key: &str) -> &DashMap<String, ProcessHandle> {
    let mut hasher = SipHasher::new();
    key.hash(&mut hasher);
    let index = (hasher.finish() % BUCKET_COUNT as u64) as usize;
    &self.buckets[index]
  }
}

type AddressResolverFn = Arc<dyn Fn(&Pid) -> BoxFuture<'static, Option<ProcessHandle>> + Send + Sync + 'static>;

/// Resolves a pid on another node to a process able to forward to it.
#[derive(Clone)]
pub struct AddressResolver(AddressResolverFn);

impl Debug for AddressResolver {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "AddressResolver")
  }
}

impl PartialEq for AddressResolver {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for AddressResolver {}

impl AddressResolver {
  pub fn new<F, Fut>(f: F) -> Self
  where
    F: Fn(&Pid) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<ProcessHandle>> + Send + 'static, {
    AddressResolver(Arc::new(move |p| Box::pin(f(p))))
  }

  pub async fn run(&self, pid: &Pid) -> Option<ProcessHandle> {
    (self.0)(pid).await
  }
}

/// Map from process identity to process, sharded over a fixed set of buckets.
///
/// Lookups never fail: anything that cannot be resolved goes to the dead-letter process.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
  sequence_id: Arc<AtomicU64>,
  address: Arc<RwLock<String>>,
  local_pids: SliceMap,
  remote_handlers: Arc<RwLock<Vec<AddressResolver>>>,
  dead_letter: ProcessHandle,
}

impl ProcessRegistry {
  pub fn new(dead_letter: ProcessHandle) -> Self {
    ProcessRegistry {
      sequence_id: Arc::new(AtomicU64::new(0)),
      address: Arc::new(RwLock::new(LOCAL_ADDRESS.to_string())),
      local_pids: SliceMap::new(),
      remote_handlers: Arc::new(RwLock::new(Vec::new())),
      dead_letter,
    }
  }

  pub fn register_address_resolver(&self, handler: AddressResolver) {
    self.remote_handlers.write().push(handler);
  }

  pub fn set_address(&self, address: &str) {
    *self.address.write() = address.to_string();
  }

  pub fn get_address(&self) -> String {
    self.address.read().clone()
  }

  pub fn next_id(&self) -> String {
    let counter = self.sequence_id.fetch_add(1, Ordering::SeqCst);
    uint64_to_id(counter)
  }

  /// Registers `process` under `id`. The returned flag is `false` when the id was taken, in
  /// which case the existing registration is left untouched.
  pub fn add_process(&self, process: ProcessHandle, id: &str) -> (Pid, bool) {
    let pid = Pid::new(&self.get_address(), id);
    let bucket = self.local_pids.get_bucket(id);
    let absent = match bucket.entry(id.to_string()) {
      Entry::Occupied(_) => false,
      Entry::Vacant(entry) => {
        entry.insert(process);
        true
      }
    };
    (pid, absent)
  }

  /// Registers under `name`, or under a freshly generated id when no name is given.
  pub fn register_process(&self, process: ProcessHandle, name: Option<&str>) -> Result<Pid, ProcessRegistryError> {
    let id = match name {
      Some(name) => name.to_string(),
      None => self.next_id(),
    };
    match self.add_process(process, &id) {
      (pid, true) => Ok(pid),
      (pid, false) => Err(ProcessRegistryError::NameExists(pid)),
    }
  }

  pub fn remove_process(&self, pid: &Pid) {
    let bucket = self.local_pids.get_bucket(pid.id());
    if let Some((_, process)) = bucket.remove(pid.id()) {
      process.set_dead();
    }
  }

  pub async fn get_process(&self, pid: &Pid) -> ProcessHandle {
    if !pid.is_local_to(&self.get_address()) {
      let handlers = self.remote_handlers.read().clone();
      for handler in handlers.iter() {
        if let Some(process) = handler.run(pid).await {
          return process;
        }
      }
      return self.dead_letter.clone();
    }
    self.get_local_process(pid.id())
  }

  pub fn get_local_process(&self, id: &str) -> ProcessHandle {
    self.find_local_process(id).unwrap_or_else(|| self.dead_letter.clone())
  }

  pub fn find_local_process(&self, id: &str) -> Option<ProcessHandle> {
    let bucket = self.local_pids.get_bucket(id);
    bucket.get(id).map(|r| r.value().clone())
  }

  pub fn get_dead_letter(&self) -> ProcessHandle {
    self.dead_letter.clone()
  }

  pub fn count(&self) -> usize {
    self.local_pids.buckets.iter().map(|b| b.len()).sum()
  }
}

/// Encodes `u` in base 64 behind a `$` marker, e.g. `$a`, `$1+`.
pub(crate) fn uint64_to_id(u: u64) -> String {
  const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ~+";
  let mut digits = Vec::with_capacity(12);
  let mut u = u;
  loop {
    digits.push(DIGITS[(u & 0x3f) as usize] as char);
    u >>= 6;
    if u == 0 {
      break;
    }
  }
  let mut id = String::with_capacity(digits.len() + 1);
  id.push('$');
  id.extend(digits.iter().rev());
  id
}
