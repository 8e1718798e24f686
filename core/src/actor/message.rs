mod dead_letter_response;
mod failure;
#[allow(clippy::module_inception)]
mod message;
mod message_envelope;
mod message_handle;
mod message_headers;
mod system_message;
mod terminated;

pub use self::{
  dead_letter_response::*, failure::*, message::*, message_envelope::*, message_handle::*, message_headers::*,
  system_message::*, terminated::*,
};
