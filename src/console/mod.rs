//! Role console module
//!
//! CLI rendition of the browser console: role-scoped operation menus, the
//! login/session flow, and the HTTP dispatch toward the gateway.

pub mod client;
pub mod error;
pub mod menu;
pub mod session;

pub use client::{ConsoleClient, OPENING_BALANCE};
pub use error::{ConsoleError, ConsoleResult};
pub use menu::{find, menu, method_for, HttpMethod, Operation};
pub use session::Session;
