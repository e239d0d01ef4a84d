//! Centralized configuration defaults
//!
//! Every default lives here so the serde attributes, `Default` impl, and
//! merge logic all agree on what "unset" means.

use std::net::SocketAddr;

pub fn listen() -> SocketAddr {
    "0.0.0.0:8080".parse().unwrap()
}

pub fn log_level() -> String {
    "info".to_string()
}

pub fn environment() -> String {
    "production".to_string()
}

pub fn dev_mode() -> bool {
    false
}

/// Token lifetime; matches the one-day cookie the browser console kept
pub fn token_ttl_secs() -> u64 {
    86_400
}
