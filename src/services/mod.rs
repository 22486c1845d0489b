pub mod hotkey_service;
pub mod keyboard_listener;
pub mod window_service;

pub use hotkey_service::serve_hotkey;
pub use keyboard_listener::create_keyboard_listener;
pub use window_service::{create_window_service, WindowCatalogClient};
