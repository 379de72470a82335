//! Session store and cookie plumbing
//!
//! Sessions are opaque random tokens mapped to a user id with an expiry.
//! The store is a concurrent map; expired entries are rejected on use and
//! reaped by the periodic sweep task spawned at startup.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::{SESSION_COOKIE, SESSION_TOKEN_BYTES};

/// A live authenticated session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// Concurrent token -> session map with TTL
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Open a session for a user and return it (token included)
    pub fn create(&self, user_id: i64) -> Session {
        let now = Utc::now();
        let session = Session {
            token: mint_token(),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.sessions
            .insert(session.token.clone(), session.clone());
        session
    }

    /// Resolve a token to its session, dropping it if expired
    pub fn resolve(&self, token: &str) -> Option<Session> {
        let session = self.sessions.get(token)?.clone();
        if session.is_expired() {
            drop(self.sessions.remove(token));
            return None;
        }
        Some(session)
    }

    /// Revoke a single session. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Revoke every session belonging to a user (account deletion)
    pub fn revoke_user(&self, user_id: i64) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.user_id != user_id);
        before - self.sessions.len()
    }

    /// Remove all expired sessions. Returns how many were reaped.
    pub fn sweep_expired(&self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired());
        before - self.sessions.len()
    }

    /// Number of unexpired sessions currently held
    pub fn active_count(&self) -> usize {
        self.sessions.iter().filter(|s| !s.is_expired()).count()
    }
}

/// Mint a fresh opaque token from the OS CSPRNG
pub fn mint_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

// =============================================================================
// COOKIE PLUMBING
// =============================================================================

/// Build the Set-Cookie value that installs a session token
pub fn session_cookie(token: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Build the Set-Cookie value that clears the session cookie
pub fn clear_session_cookie(secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Extract the session token from request Cookie headers, if present
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, val)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !val.is_empty() {
                    return Some(val.to_string());
                }
            }
        }
    }
    None
}
