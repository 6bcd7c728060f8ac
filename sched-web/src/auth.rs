use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::Deserialize;
use serde_json::json;
use subtle::ConstantTimeEq;

use crate::state::AppState;

const TOKEN_COOKIE: &str = "token";

/// Password gate for the task API. Holds the configured password and the
/// bearer token handed out on sign-in; the token lives for the process
/// lifetime, so a restart rotates it.
pub struct AuthGate {
    password: String,
    token: String,
}

impl AuthGate {
    pub fn new(password: String) -> Self {
        let token = rand::rng()
            .sample_iter(Alphanumeric)
            .take(48)
            .map(char::from)
            .collect();
        Self { password, token }
    }

    fn password_matches(&self, candidate: &str) -> bool {
        candidate.as_bytes().ct_eq(self.password.as_bytes()).into()
    }

    fn token_matches(&self, candidate: &str) -> bool {
        candidate.as_bytes().ct_eq(self.token.as_bytes()).into()
    }
}

#[derive(Deserialize)]
pub struct SigninRequest {
    #[serde(default)]
    password: String,
}

/// POST /api/signin: check the password, hand out the token (in the body
/// and as a `token` cookie).
pub async fn signin(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SigninRequest>,
) -> Response {
    let Some(gate) = &state.auth else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "auth disabled"})),
        )
            .into_response();
    };
    if !gate.password_matches(&req.password) {
        log::warn!("sign-in attempt with wrong password");
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "invalid password"})),
        )
            .into_response();
    }
    let cookie = format!("{TOKEN_COOKIE}={}; Path=/; HttpOnly", gate.token);
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({"token": gate.token})),
    )
        .into_response()
}

/// Middleware guarding the task routes. A no-op when no password is
/// configured.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(gate) = &state.auth else {
        return next.run(request).await;
    };
    let authorized = request_token(&request)
        .map(|t| gate.token_matches(&t))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "authentication required"})),
        )
            .into_response();
    }
    next.run(request).await
}

/// Pull the token from the `token` cookie or an `Authorization: Bearer`
/// header.
fn request_token(request: &Request) -> Option<String> {
    if let Some(cookies) = header_str(request, header::COOKIE) {
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == TOKEN_COOKIE {
                    return Some(value.to_string());
                }
            }
        }
    }
    header_str(request, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn header_str(request: &Request, name: header::HeaderName) -> Option<&str> {
    request.headers().get(name).and_then(|v| v.to_str().ok())
}
