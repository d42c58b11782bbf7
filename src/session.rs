//! Session state and the authenticated-session gate
//!
//! Sessions are keyed by an opaque cookie token. The store is an injected
//! capability on [`AppState`](crate::AppState) rather than process-global
//! state, so handlers and tests receive it explicitly.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "taskdeck_session";

#[derive(Debug, Clone)]
struct SessionData {
    values: HashMap<String, Value>,
    last_seen: DateTime<Utc>,
}

impl SessionData {
    fn new() -> Self {
        Self {
            values: HashMap::new(),
            last_seen: Utc::now(),
        }
    }
}

/// Process-wide session registry
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Create a store with the default 24h idle lifetime
    pub fn new() -> Self {
        Self::with_ttl(Duration::hours(24))
    }

    /// Create a store with a custom idle lifetime
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Resolve the request's session from its cookie, creating a fresh one
    /// when the token is missing or unknown
    pub fn open(&self, headers: &HeaderMap) -> Session {
        if let Some(token) = token_from_headers(headers) {
            let mut sessions = self.sessions.write().unwrap();
            if let Some(data) = sessions.get_mut(&token) {
                data.last_seen = Utc::now();
                return Session {
                    store: self.clone(),
                    token,
                    fresh: false,
                    destroyed: false,
                };
            }
        }

        let token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap()
            .insert(token.clone(), SessionData::new());

        Session {
            store: self.clone(),
            token,
            fresh: true,
            destroyed: false,
        }
    }

    /// Drop sessions idle longer than the configured lifetime
    pub fn sweep_expired(&self) {
        let cutoff = Utc::now() - self.ttl;
        let mut sessions = self.sessions.write().unwrap();
        let before = sessions.len();
        sessions.retain(|_, data| data.last_seen > cutoff);

        let swept = before - sessions.len();
        if swept > 0 {
            tracing::debug!("Swept {} expired session(s)", swept);
        }
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Short-circuit produced by the authenticated-session gate
#[derive(Debug)]
pub enum AuthGate {
    /// Send the browser to the login entry point
    Redirect(String),
    /// Unauthorized signal for programmatic endpoints
    Unauthorized,
}

impl IntoResponse for AuthGate {
    fn into_response(self) -> Response {
        match self {
            Self::Redirect(location) => Redirect::to(&location).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "unauthorized"})),
            )
                .into_response(),
        }
    }
}

/// Handle to the current request's session
pub struct Session {
    store: SessionStore,
    token: String,
    fresh: bool,
    destroyed: bool,
}

impl Session {
    /// Opaque session token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Store an arbitrary session value
    pub fn set(&self, key: &str, value: Value) {
        let mut sessions = self.store.sessions.write().unwrap();
        if let Some(data) = sessions.get_mut(&self.token) {
            data.values.insert(key.to_string(), value);
        }
    }

    /// Read an arbitrary session value
    pub fn get(&self, key: &str) -> Option<Value> {
        let sessions = self.store.sessions.read().unwrap();
        sessions
            .get(&self.token)
            .and_then(|data| data.values.get(key))
            .cloned()
    }

    /// Read a session value, falling back to a default
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Establish the authenticated identity for this session
    pub fn set_auth(&self, user_id: u64, name: &str, role: &str) {
        self.set("user_id", Value::from(user_id));
        self.set("user_name", Value::from(name));
        self.set("user_role", Value::from(role));
    }

    /// Authenticated user id, if any
    pub fn user_id(&self) -> Option<u64> {
        self.get("user_id").and_then(|v| v.as_u64())
    }

    /// True iff an authenticated `user_id` is present and non-empty
    pub fn is_authenticated(&self) -> bool {
        self.get("user_id")
            .map(|value| !is_empty_value(&value))
            .unwrap_or(false)
    }

    /// Fail-closed gate for page handlers: unauthenticated callers are sent
    /// to the login screen and the handler body never runs
    pub fn require_authenticated(&self, base_path: &str) -> Result<(), AuthGate> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AuthGate::Redirect(format!("{}/auth/login", base_path)))
        }
    }

    /// Fail-closed gate for JSON endpoints
    pub fn require_authenticated_api(&self) -> Result<(), AuthGate> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AuthGate::Unauthorized)
        }
    }

    /// Clear all session state and invalidate the token; a new token is
    /// required afterward
    pub fn destroy(&mut self) {
        self.store.sessions.write().unwrap().remove(&self.token);
        self.destroyed = true;
    }

    /// Attach the session cookie to an outgoing response.
    ///
    /// Fresh sessions get their token set; destroyed sessions get the cookie
    /// expired. Called exactly once per request, by the dispatcher.
    pub fn finish(&self, mut response: Response) -> Response {
        let cookie = if self.destroyed {
            if self.fresh {
                // Never sent to the client, nothing to clear
                return response;
            }
            format!("{}=; Path=/; Max-Age=0; HttpOnly", SESSION_COOKIE)
        } else if self.fresh {
            format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax",
                SESSION_COOKIE, self.token
            )
        } else {
            return response;
        };

        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
        response
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for cookie in cookie_header.split(';') {
        if let Some((name, value)) = cookie.trim().split_once('=') {
            if name == SESSION_COOKIE {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Mirror of the source's emptiness check: absent, null, `""`, `"0"`, 0 and
/// false all count as unauthenticated
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, token)).unwrap(),
        );
        headers
    }

    #[test]
    fn fail_closed_gate_blocks_handler_body() {
        let store = SessionStore::new();
        let session = store.open(&HeaderMap::new());

        let mut sentinel = false;
        let outcome = (|| -> Result<(), AuthGate> {
            session.require_authenticated("")?;
            sentinel = true;
            Ok(())
        })();

        assert!(matches!(outcome, Err(AuthGate::Redirect(ref to)) if to == "/auth/login"));
        assert!(!sentinel, "protected body must not run unauthenticated");
    }

    #[test]
    fn gate_uses_the_base_path() {
        let store = SessionStore::new();
        let session = store.open(&HeaderMap::new());

        let outcome = session.require_authenticated("/apps/board");
        assert!(
            matches!(outcome, Err(AuthGate::Redirect(ref to)) if to == "/apps/board/auth/login")
        );
    }

    #[test]
    fn authenticated_session_passes_the_gate() {
        let store = SessionStore::new();
        let session = store.open(&HeaderMap::new());
        session.set_auth(7, "Ada", "admin");

        assert!(session.is_authenticated());
        assert!(session.require_authenticated("").is_ok());
        assert!(session.require_authenticated_api().is_ok());
        assert_eq!(session.user_id(), Some(7));
        assert_eq!(session.get("user_role"), Some(json!("admin")));
    }

    #[test]
    fn empty_user_id_stays_anonymous() {
        let store = SessionStore::new();
        let session = store.open(&HeaderMap::new());

        for empty in [json!(null), json!(""), json!("0"), json!(0), json!(false)] {
            session.set("user_id", empty.clone());
            assert!(!session.is_authenticated(), "{:?} should not authenticate", empty);
        }
    }

    #[test]
    fn session_survives_cookie_round_trip() {
        let store = SessionStore::new();
        let first = store.open(&HeaderMap::new());
        first.set_auth(1, "Ada", "user");

        let second = store.open(&cookie_headers(first.token()));
        assert!(second.is_authenticated());
        assert_eq!(second.get("user_name"), Some(json!("Ada")));
    }

    #[test]
    fn destroy_invalidates_the_token() {
        let store = SessionStore::new();
        let session = store.open(&HeaderMap::new());
        session.set_auth(1, "Ada", "user");
        let token = session.token().to_string();

        let mut again = store.open(&cookie_headers(&token));
        again.destroy();

        let after = store.open(&cookie_headers(&token));
        assert!(!after.is_authenticated());
        assert_ne!(after.token(), token);
    }

    #[test]
    fn finish_sets_and_clears_the_cookie() {
        let store = SessionStore::new();

        let fresh = store.open(&HeaderMap::new());
        let response = fresh.finish(Response::new(axum::body::Body::empty()));
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(set_cookie.to_str().unwrap().contains(fresh.token()));

        let mut known = store.open(&cookie_headers(fresh.token()));
        known.destroy();
        let response = known.finish(Response::new(axum::body::Body::empty()));
        let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
        assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
    }

    #[test]
    fn sweep_removes_idle_sessions() {
        let store = SessionStore::with_ttl(Duration::zero());
        store.open(&HeaderMap::new());
        assert_eq!(store.len(), 1);

        std::thread::sleep(std::time::Duration::from_millis(10));
        store.sweep_expired();
        assert!(store.is_empty());
    }
}
