use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::directory::AdminDirectory;
use crate::errors::AuthError;
use crate::nonce::NonceService;
use crate::session::SessionGuard;
use crate::types::{login_message, SESSION_COOKIE, SESSION_TTL_SECS};

#[derive(Default)]
pub struct AuthMetrics {
    pub issued: AtomicU64,
    pub verified: AtomicU64,
    pub rejected: AtomicU64,
}

#[derive(Clone)]
pub struct AppState {
    pub nonces: Arc<NonceService>,
    pub guard: Arc<SessionGuard>,
    pub directory: Arc<dyn AdminDirectory>,
    pub metrics: Arc<AuthMetrics>,
}

impl AppState {
    pub fn new(directory: Arc<dyn AdminDirectory>) -> Self {
        Self {
            nonces: Arc::new(NonceService::default()),
            guard: Arc::new(SessionGuard::new(directory.clone())),
            directory,
            metrics: Arc::new(AuthMetrics::default()),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    product: &'static str,
    phase: &'static str,
}

#[derive(Serialize)]
struct NonceResponse {
    ok: bool,
    nonce: String,
    message: String,
}

#[derive(Serialize)]
struct VerifyResponse {
    success: bool,
    redirect: &'static str,
}

#[derive(Serialize)]
struct SessionResponse {
    ok: bool,
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_id: Option<u64>,
}

fn error_response(err: AuthError) -> Response {
    let status = match err {
        AuthError::MalformedPayload | AuthError::NonceInvalidOrExpired => StatusCode::BAD_REQUEST,
        AuthError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthError::SignatureInvalid | AuthError::SessionInvalid => StatusCode::UNAUTHORIZED,
        AuthError::AddressNotAuthorized => StatusCode::FORBIDDEN,
    };
    let body = serde_json::json!({
        "ok": false,
        "error": { "code": err.code_str(), "message": err.to_string() },
    });
    (status, Json(body)).into_response()
}

/// Pulls a required string field out of a raw JSON body. Keeps "field
/// absent" (422) distinct from "body is not JSON" (400).
fn require_str<'a>(
    body: &'a serde_json::Value,
    field: &'static str,
) -> Result<&'a str, AuthError> {
    body.get(field)
        .and_then(|v| v.as_str())
        .ok_or(AuthError::MissingField(field))
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        product: "AIRewardrop Admin API",
        phase: "wallet auth",
    })
}

async fn auth_nonce(State(state): State<AppState>) -> impl IntoResponse {
    let nonce = state.nonces.issue();
    state.metrics.issued.fetch_add(1, Ordering::Relaxed);

    Json(NonceResponse {
        ok: true,
        message: login_message(&nonce),
        nonce,
    })
}

async fn auth_verify(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
        return error_response(AuthError::MalformedPayload);
    };

    let parsed: Result<_, AuthError> = (|| {
        let nonce = require_str(&body, "nonce")?;
        let address = require_str(&body, "address")?;
        let signature = require_str(&body, "signature")?;
        Ok((nonce, address, signature))
    })();
    let (nonce, address, signature) = match parsed {
        Ok(fields) => fields,
        Err(e) => {
            state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
            return error_response(e);
        }
    };

    // The signed message is reconstructed from the submitted nonce value;
    // the template must match the client byte for byte.
    let message = login_message(nonce);
    let recovered = match crate::signature::verify_wallet_signature(&message, address, signature)
    {
        Ok(a) => a,
        Err(e) => {
            state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
            return error_response(e);
        }
    };

    // Allow-list before consumption: an unauthorized signer never burns a
    // nonce.
    let Some(admin) = state
        .directory
        .admin_by_wallet(&recovered)
        .filter(|a| a.authorized)
    else {
        state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
        return error_response(AuthError::AddressNotAuthorized);
    };

    if !state.nonces.consume(nonce, admin.admin_id) {
        state.metrics.rejected.fetch_add(1, Ordering::Relaxed);
        return error_response(AuthError::NonceInvalidOrExpired);
    }

    let prior = session_id_from_headers(&headers);
    let session_id = state.guard.login(
        prior.as_deref(),
        admin.admin_id,
        &client_ip(&headers),
        &user_agent(&headers),
    );
    state.metrics.verified.fetch_add(1, Ordering::Relaxed);

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, session_id, SESSION_TTL_SECS
    );
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(VerifyResponse {
            success: true,
            redirect: "/admin/dashboard",
        }),
    )
        .into_response()
}

async fn auth_logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(session_id) = session_id_from_headers(&headers) {
        state.guard.logout(&session_id);
    }

    let expired_cookie = format!("{}=; Path=/; HttpOnly; Max-Age=0", SESSION_COOKIE);
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/admin/login".to_string()),
            (header::SET_COOKIE, expired_cookie),
        ],
    )
        .into_response()
}

async fn session_status(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let context =
        session_id_from_headers(&headers).and_then(|sid| state.guard.context(&sid));

    Json(SessionResponse {
        ok: true,
        authenticated: context.is_some(),
        admin_id: context.map(|ctx| ctx.admin_id),
    })
}

async fn auth_metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "metrics": {
            "issued": state.metrics.issued.load(Ordering::Relaxed),
            "verified": state.metrics.verified.load(Ordering::Relaxed),
            "rejected": state.metrics.rejected.load(Ordering::Relaxed),
        },
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/admin/auth/nonce", post(auth_nonce))
        .route("/admin/auth/verify", post(auth_verify))
        .route("/admin/auth/logout", post(auth_logout))
        .route("/admin/auth/metrics", get(auth_metrics))
        .route("/admin/session", get(session_status))
        .with_state(state)
}

pub async fn run_http_server(addr: SocketAddr, state: AppState) {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind api listener");
    axum::serve(listener, build_router(state))
        .await
        .expect("run api server");
}
