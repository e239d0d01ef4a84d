//! Console session persistence
//!
//! The stored access token, the file-backed equivalent of the one-day
//! cookie the browser console kept.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::network::Org;

use super::error::{ConsoleError, ConsoleResult};

/// Session lifetime in days; matches the gateway's token lifetime
const SESSION_DAYS: i64 = 1;

/// Persisted login session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub org: Org,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Session starting now with the standard lifetime
    pub fn new(token: &str, username: &str, org: Org) -> Self {
        Self {
            token: token.to_string(),
            username: username.to_string(),
            org,
            expires_at: Utc::now() + Duration::days(SESSION_DAYS),
        }
    }

    /// Write the session to disk
    pub fn save(&self, path: &Path) -> ConsoleResult<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Load a session, rejecting missing or expired ones
    pub fn load(path: &Path) -> ConsoleResult<Self> {
        if !path.exists() {
            return Err(ConsoleError::Session(
                "Not logged in. Run the login command first".to_string(),
            ));
        }

        let text = fs::read_to_string(path)?;
        let session: Session = serde_json::from_str(&text)
            .map_err(|e| ConsoleError::Session(format!("Corrupt session file: {}", e)))?;

        if Utc::now() > session.expires_at {
            return Err(ConsoleError::Session(
                "Session expired. Log in again".to_string(),
            ));
        }

        Ok(session)
    }

    /// Delete the session file if present
    pub fn clear(path: &Path) -> ConsoleResult<()> {
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
