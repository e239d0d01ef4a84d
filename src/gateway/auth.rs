//! Authentication and Authorization Module
//!
//! This module issues bearer tokens at login and resolves them back into
//! enrolled identities on every chaincode request.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::network::Org;

use super::error::ApiError;

/// Identity enrolled at login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Operator name from the login form
    pub username: String,

    /// Organization the identity enrolled under
    pub org: Org,
}

/// Issued token bound to an identity
#[derive(Debug, Clone)]
struct Session {
    token: String,
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// Authentication state shared across handlers
#[derive(Clone)]
pub struct AuthState {
    sessions: Arc<RwLock<Vec<Session>>>,
    secret: String,
    ttl: Duration,
}

impl AuthState {
    /// Create a new authentication state
    ///
    /// `token_ttl_secs` bounds how long issued tokens stay valid.
    pub fn new(token_ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Vec::new())),
            // Per-process secret; restarting the gateway revokes all tokens
            secret: Uuid::new_v4().to_string(),
            ttl: Duration::seconds(token_ttl_secs as i64),
        }
    }

    /// Issue a token for an enrolled identity
    pub fn issue_token(&self, identity: Identity) -> Result<String, ApiError> {
        let mut hasher = Sha256::new();
        hasher.update(Uuid::new_v4().as_bytes());
        hasher.update(self.secret.as_bytes());
        hasher.update(identity.username.as_bytes());
        let token = format!("{:x}", hasher.finalize());

        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| ApiError::Internal("session lock poisoned".to_string()))?;

        // One live session per identity; a fresh login replaces the old token
        sessions.retain(|s| s.identity != identity);
        sessions.push(Session {
            token: token.clone(),
            identity: identity.clone(),
            expires_at: Utc::now() + self.ttl,
        });

        log::info!(
            "Issued token for {} ({})",
            identity.username,
            identity.org
        );

        Ok(token)
    }

    /// Validate a token and return the identity it was issued to
    pub fn validate_token(&self, token: &str) -> Option<Identity> {
        let sessions = self.sessions.read().ok()?;

        for session in sessions.iter() {
            // Constant-time comparison to prevent timing attacks
            if constant_time_compare(&session.token, token) {
                if Utc::now() > session.expires_at {
                    log::warn!(
                        "Authentication attempt with expired token for user: {}",
                        session.identity.username
                    );
                    return None;
                }
                return Some(session.identity.clone());
            }
        }

        None
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (byte_a, byte_b) in a.bytes().zip(b.bytes()) {
        result |= byte_a ^ byte_b;
    }

    result == 0
}

/// Authentication middleware
///
/// Extracts the `Bearer` token, resolves the identity, and stores it in the
/// request extensions for the handlers.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth_header = match auth_header {
        Some(value) => value,
        None => {
            log::warn!(
                "Authentication failure: Missing Authorization header from {}",
                req.uri().path()
            );
            return Err(ApiError::Authentication(
                "Missing Authorization header".to_string(),
            ));
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(token) => token,
        None => {
            log::warn!(
                "Authentication failure: Invalid Authorization header format from {}",
                req.uri().path()
            );
            return Err(ApiError::Authentication(
                "Invalid Authorization header format".to_string(),
            ));
        }
    };

    let identity = match auth_state.validate_token(token) {
        Some(identity) => identity,
        None => {
            log::warn!(
                "Authentication failure: Invalid token attempt from {}",
                req.uri().path()
            );
            return Err(ApiError::Authentication("Invalid token".to_string()));
        }
    };

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret", "secret"));
        assert!(!constant_time_compare("secret", "public"));
        assert!(!constant_time_compare("short", "longer"));
    }

    #[test]
    fn test_issue_and_validate_token() {
        let auth = AuthState::new(3600);
        let identity = Identity {
            username: "alice".to_string(),
            org: Org::User,
        };

        let token = auth.issue_token(identity.clone()).unwrap();
        let resolved = auth.validate_token(&token).unwrap();
        assert_eq!(resolved, identity);

        assert!(auth.validate_token("not-a-token").is_none());
    }

    #[test]
    fn test_relogin_revokes_previous_token() {
        let auth = AuthState::new(3600);
        let identity = Identity {
            username: "alice".to_string(),
            org: Org::User,
        };

        let first = auth.issue_token(identity.clone()).unwrap();
        let second = auth.issue_token(identity).unwrap();

        assert!(auth.validate_token(&first).is_none());
        assert!(auth.validate_token(&second).is_some());
    }

    #[test]
    fn test_tokens_are_unique() {
        let auth = AuthState::new(3600);
        let a = auth
            .issue_token(Identity {
                username: "a".to_string(),
                org: Org::User,
            })
            .unwrap();
        let b = auth
            .issue_token(Identity {
                username: "b".to_string(),
                org: Org::Repairer,
            })
            .unwrap();
        assert_ne!(a, b);
    }
}
