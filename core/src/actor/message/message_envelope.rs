use crate::actor::message::message_handle::MessageHandle;
use crate::actor::message::message_headers::{MessageHeaders, ReadonlyMessageHeaders};
use crate::actor::pid::Pid;
use relay_actor_utils_rs::collections::Element;


/// A payload together with the metadata that has to travel with it.
///
/// Envelopes are immutable; the `with_*` builders return a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageEnvelope {
  header: Option<MessageHeaders>,
  message_handle: MessageHandle,
  sender: Option<Pid>,
}

static_assertions::assert_impl_all!(MessageEnvelope: Send, Sync);

impl MessageEnvelope {
  pub fn new(message_handle: MessageHandle) -> Self {
    Self {
      header: None,
      message_handle,
      sender: None,
    }
  }

  pub fn with_header(mut self, header: MessageHeaders) -> Self {
    self.header = Some(header);
    self
  }

  pub fn with_header_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    let mut header = self.header.take().unwrap_or_default();
    header.set(key, value);
    self.header = Some(header);
    self
  }

  pub fn with_sender(mut self, sender: Pid) -> Self {
    self.sender = Some(sender);
    self
  }

  pub fn with_sender_opt(mut self, sender: Option<Pid>) -> Self {
    self.sender = sender;
    self
  }

  pub fn get_message_handle(&self) -> MessageHandle {
    self.message_handle.clone()
  }

  pub fn get_sender(&self) -> Option<Pid> {
    self.sender.clone()
  }

  pub fn get_header(&self) -> Option<MessageHeaders> {
    self.header.clone()
  }

  pub fn get_header_value(&self, key: &str) -> Option<String> {
    self.header.as_ref().and_then(|h| h.get(key))
  }
}

/// What a user mailbox holds: either a bare payload or an envelope.
///
/// The distinction is structural so middleware and receivers never need to inspect the
/// payload type to find a sender or headers.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageOrEnvelope {
  Message(MessageHandle),
  Envelope(MessageEnvelope),
}

impl Element for MessageOrEnvelope {}

impl MessageOrEnvelope {
  pub fn of_message(message_handle: MessageHandle) -> Self {
    MessageOrEnvelope::Message(message_handle)
  }

  pub fn of_envelope(envelope: MessageEnvelope) -> Self {
    MessageOrEnvelope::Envelope(envelope)
  }

  pub fn get_message_handle(&self) -> MessageHandle {
    match self {
      MessageOrEnvelope::Message(message_handle) => message_handle.clone(),
      MessageOrEnvelope::Envelope(envelope) => envelope.get_message_handle(),
    }
  }

  pub fn get_sender(&self) -> Option<Pid> {
    match self {
      MessageOrEnvelope::Message(_) => None,
      MessageOrEnvelope::Envelope(envelope) => envelope.get_sender(),
    }
  }

  pub fn get_header(&self) -> Option<MessageHeaders> {
    match self {
      MessageOrEnvelope::Message(_) => None,
      MessageOrEnvelope::Envelope(envelope) => envelope.get_header(),
    }
  }

  pub fn is_envelope(&self) -> bool {
    matches!(self, MessageOrEnvelope::Envelope(_))
  }
}

impl From<MessageHandle> for MessageOrEnvelope {
  fn from(message_handle: MessageHandle) -> Self {
    MessageOrEnvelope::Message(message_handle)
  }
}

impl From<MessageEnvelope> for MessageOrEnvelope {
  fn from(envelope: MessageEnvelope) -> Self {
    MessageOrEnvelope::Envelope(envelope)
  }
}

/// Returns the envelope as-is, or wraps a bare payload into one with no header and no sender.
pub fn wrap_envelope(message: MessageOrEnvelope) -> MessageEnvelope {
  match message {
    MessageOrEnvelope::Message(message_handle) => MessageEnvelope::new(message_handle),
    MessageOrEnvelope::Envelope(envelope) => envelope,
  }
}

pub fn unwrap_envelope(message: &MessageOrEnvelope) -> (Option<MessageHeaders>, MessageHandle, Option<Pid>) {
  (message.get_header(), message.get_message_handle(), message.get_sender())
}

pub fn unwrap_envelope_header(message: &MessageOrEnvelope) -> MessageHeaders {
  message.get_header().unwrap_or_default()
}
