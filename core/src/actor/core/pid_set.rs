use std::sync::Arc;

use parking_lot::Mutex;

use crate::actor::pid::Pid;

/// Insertion-ordered set of pids shared between clones.
#[derive(Debug, Clone, Default)]
pub struct PidSet {
  pids: Arc<Mutex<Vec<Pid>>>,
}

impl PidSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&self, pid: Pid) -> bool {
    let mut pids = self.pids.lock();
    if pids.contains(&pid) {
      return false;
    }
    pids.push(pid);
    true
  }

  pub fn remove(&self, pid: &Pid) -> bool {
    let mut pids = self.pids.lock();
    match pids.iter().position(|p| p == pid) {
      Some(index) => {
        pids.remove(index);
        true
      }
      None => false,
    }
  }

  pub fn contains(&self, pid: &Pid) -> bool {
    self.pids.lock().contains(pid)
  }

  pub fn len(&self) -> usize {
    self.pids.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.pids.lock().is_empty()
  }

  pub fn to_vec(&self) -> Vec<Pid> {
    self.pids.lock().clone()
  }

  pub fn clear(&self) {
    self.pids.lock().clear();
  }
}
