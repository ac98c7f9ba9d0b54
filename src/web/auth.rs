//! Session handling for the web app.
//!
//! Sessions are random tokens kept server-side and carried in the
//! `news_session` cookie. The extractors here resolve the signed-in user and
//! gate `/scrape` when accounts are required.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use rand::{Rng, distr::Alphanumeric};

use super::AppState;

pub const COOKIE_NAME: &str = "news_session";
const TOKEN_LEN: usize = 32;

/// Server-side sessions: random token to username.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    /// Start a session for `username` and return its token.
    pub fn create(&self, username: &str) -> String {
        let token: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect();
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), username.to_string());
        token
    }

    pub fn username(&self, token: &str) -> Option<String> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    pub fn remove(&self, token: &str) -> Option<String> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
    }
}

/// Build the Set-Cookie header value for a new session.
pub fn session_cookie(token: &str) -> String {
    format!("{COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Build a Set-Cookie header that clears the session.
pub fn clear_session_cookie() -> String {
    format!("{COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Session token carried by the request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    parse_cookie(cookie_header, COOKIE_NAME).filter(|token| !token.is_empty())
}

/// Parse a specific cookie from the Cookie header string.
fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix(name) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value);
            }
        }
    }
    None
}

fn signed_in_user(parts: &Parts, state: &AppState) -> Option<String> {
    session_token(&parts.headers).and_then(|token| state.sessions.username(token))
}

/// The signed-in user, if any. Never rejects.
pub struct SessionUser(pub Option<String>);

impl FromRequestParts<Arc<AppState>> for SessionUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(SessionUser(signed_in_user(parts, state)))
    }
}

/// Permission to run an export.
///
/// When accounts are required, requests without a valid session are
/// rejected with 401; otherwise everyone passes.
pub struct ScrapeAccess {
    pub user: Option<String>,
}

impl FromRequestParts<Arc<AppState>> for ScrapeAccess {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = signed_in_user(parts, state);
        if state.require_auth && user.is_none() {
            return Err((StatusCode::UNAUTHORIZED, "Not authenticated").into_response());
        }
        Ok(ScrapeAccess { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_session_roundtrip() {
        let store = SessionStore::default();
        let token = store.create("layla");
        assert_eq!(token.len(), TOKEN_LEN);
        assert_eq!(store.username(&token).as_deref(), Some("layla"));
        assert_eq!(store.remove(&token).as_deref(), Some("layla"));
        assert_eq!(store.username(&token), None);
    }

    #[test]
    fn test_tokens_are_distinct() {
        let store = SessionStore::default();
        assert_ne!(store.create("a"), store.create("a"));
    }

    #[test]
    fn parse_cookie_works() {
        assert_eq!(
            parse_cookie("news_session=abc123; other=xyz", "news_session"),
            Some("abc123")
        );
        assert_eq!(
            parse_cookie("other=xyz; news_session=abc123", "news_session"),
            Some("abc123")
        );
        assert_eq!(parse_cookie("other=xyz", "news_session"), None);
    }

    #[test]
    fn test_cleared_cookie_is_not_a_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("news_session="));
        assert_eq!(session_token(&headers), None);
    }
}
