use std::any::Any;
use std::fmt::Debug;

/// Payload carried to an actor.
///
/// Derive it with `#[derive(Message)]`; the derive relies on `PartialEq` for `eq_message`.
pub trait Message: Debug + Send + Sync + 'static {
  fn eq_message(&self, other: &dyn Message) -> bool;
  fn as_any(&self) -> &(dyn Any + Send + Sync + 'static);

  fn get_type_name(&self) -> String {
    std::any::type_name_of_val(self).to_string()
  }
}

macro_rules! impl_message_for_primitive {
  ($($t:ty),* $(,)?) => {
    $(
      impl Message for $t {
        fn eq_message(&self, other: &dyn Message) -> bool {
          other.as_any().downcast_ref::<$t>().map_or(false, |other| self == other)
        }

        fn as_any(&self) -> &(dyn Any + Send + Sync + 'static) {
          self
        }
      }
    )*
  };
}

impl_message_for_primitive!(i8, u8, i16, u16, i32, u32, i64, u64, usize, f32, f64, bool, String, &'static str);
