use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::response::Redirect;
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use uuid::Uuid;

use super::{AppState, DashboardError};

pub const SESSION_COOKIE: &str = "dashboard_session";

/// Shared-secret comparison. Plain string equality in memory; empty input
/// never passes even against an empty configured secret.
pub fn password_matches(secret: &str, submitted: &str) -> bool {
    !submitted.is_empty() && submitted == secret
}

pub fn session_is_valid(sessions: &Mutex<HashSet<String>>, jar: &CookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .map(|c| sessions.lock().unwrap().contains(c.value()))
        .unwrap_or(false)
}

/// Gate helper for every data route.
pub fn require_session(state: &AppState, jar: &CookieJar) -> Result<(), DashboardError> {
    if session_is_valid(&state.sessions, jar) {
        Ok(())
    } else {
        Err(DashboardError::Unauthorized)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> (CookieJar, Redirect) {
    if password_matches(&state.password, &form.password) {
        let token = Uuid::new_v4().to_string();
        state.sessions.lock().unwrap().insert(token.clone());

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .build();
        (jar.add(cookie), Redirect::to("/"))
    } else {
        metrics::counter!("failed_logins_total").increment(1);
        (jar, Redirect::to("/?error=1"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_never_satisfies_the_gate() {
        assert!(!password_matches("s3cret", ""));
        assert!(!password_matches("", ""));
    }

    #[test]
    fn wrong_input_is_rejected() {
        assert!(!password_matches("s3cret", "s3cret "));
        assert!(!password_matches("s3cret", "S3CRET"));
        assert!(!password_matches("s3cret", "guess"));
    }

    #[test]
    fn exact_match_passes() {
        assert!(password_matches("s3cret", "s3cret"));
    }

    #[test]
    fn session_cookie_must_reference_a_live_token() {
        let sessions = Mutex::new(HashSet::new());
        let empty_jar = CookieJar::new();
        assert!(!session_is_valid(&sessions, &empty_jar));

        let stale = empty_jar
            .clone()
            .add(Cookie::new(SESSION_COOKIE, "not-a-token"));
        assert!(!session_is_valid(&sessions, &stale));

        sessions.lock().unwrap().insert("tok-1".to_string());
        let live = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "tok-1"));
        assert!(session_is_valid(&sessions, &live));
    }
}
