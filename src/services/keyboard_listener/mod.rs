mod dry_keyboard_listener;
mod keyboard_listener;
mod key_forwarder;
mod key_mapping;
mod r#trait;

pub use self::r#trait::{KeyboardListenerTrait, create_keyboard_listener};
