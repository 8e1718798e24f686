use std::collections::BTreeMap;
use std::sync::Arc;

pub trait ReadonlyMessageHeaders {
  fn get(&self, key: &str) -> Option<String>;
  fn keys(&self) -> Vec<String>;
  fn length(&self) -> usize;
  fn to_map(&self) -> BTreeMap<String, String>;
}

/// Ordered key-value metadata attached to an envelope.
///
/// Cloning is cheap; writers copy the map before mutating it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeaders {
  inner: Arc<BTreeMap<String, String>>,
}

impl MessageHeaders {
  pub fn with_values(values: impl IntoIterator<Item = (String, String)>) -> Self {
    Self {
      inner: Arc::new(values.into_iter().collect()),
    }
  }

  pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
    Arc::make_mut(&mut self.inner).insert(key.into(), value.into());
  }

  pub fn remove(&mut self, key: &str) -> Option<String> {
    Arc::make_mut(&mut self.inner).remove(key)
  }

  pub fn is_empty(&self) -> bool {
    self.inner.is_empty()
  }
}

impl ReadonlyMessageHeaders for MessageHeaders {
  fn get(&self, key: &str) -> Option<String> {
    self.inner.get(key).cloned()
  }

  fn keys(&self) -> Vec<String> {
    self.inner.keys().cloned().collect()
  }

  fn length(&self) -> usize {
    self.inner.len()
  }

  fn to_map(&self) -> BTreeMap<String, String> {
    self.inner.as_ref().clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_set_does_not_leak_into_clones() {
    let mut base = MessageHeaders::with_values(vec![("b".to_string(), "2".to_string())]);
    let snapshot = base.clone();
    base.set("a", "1");

    assert_eq!(base.keys(), vec!["a".to_string(), "b".to_string()]);
    assert_eq!(snapshot.length(), 1);
    assert_eq!(snapshot.get("a"), None);
  }
}
