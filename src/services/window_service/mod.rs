//! WindowService: remote catalog of open windows
//!
//! This module and its submodules are responsible ONLY for talking to the
//! window-management service (`List` / `Activate`) and turning its reply into a
//! `WindowCatalog`. Mnemonic assignment, input matching and visibility are owned
//! by the switcher controller.

mod client;
mod dbus;
mod dry_run;
mod r#trait;

pub use self::client::{WindowCatalogClient, ACTIVATE_OK};
pub use self::r#trait::{create_window_service, RawWindow, WindowService};
