//! Black-box tests for the session store against a fake backend.
//!
//! The backend is an axum app bound to an ephemeral port, with request
//! counters so tests can assert not just the resulting phase but exactly
//! which calls went on the wire.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use medvault_auth::{BearerClaims, Role, RoleAttributes, SessionPhase};
use medvault_session::{
    AccountDetails, ApiClient, AuthErrorKind, ClientConfig, CredentialStore, DoctorRegistration,
    MemoryCredentialStore, RegisterRequest, SessionStore,
    client::{LOGIN_NETWORK_MESSAGE, LOGIN_REJECTED_FALLBACK},
};

// ─────────────────────────────────────────────────────────────────────────────
// Fake backend
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum LoginReply {
    Success { token: String, user: Value },
    RejectJson { status: u16, message: String },
    RejectText { status: u16, body: String },
}

#[derive(Clone)]
enum ValidateReply {
    Accept { user: Value },
    Reject,
}

struct BackendInner {
    login: LoginReply,
    validate: ValidateReply,
    validate_delay: Option<Duration>,
    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    validate_calls: AtomicUsize,
    seen_bearer: Mutex<Option<String>>,
    seen_register_body: Mutex<Option<Value>>,
}

#[derive(Clone)]
struct BackendState(Arc<BackendInner>);

async fn login_handler(State(state): State<BackendState>, Json(_body): Json<Value>) -> Response {
    state.0.login_calls.fetch_add(1, Ordering::SeqCst);
    match &state.0.login {
        LoginReply::Success { token, user } => (
            StatusCode::OK,
            Json(json!({ "token": token, "user": user })),
        )
            .into_response(),
        LoginReply::RejectJson { status, message } => (
            StatusCode::from_u16(*status).unwrap(),
            Json(json!({ "message": message })),
        )
            .into_response(),
        LoginReply::RejectText { status, body } => {
            (StatusCode::from_u16(*status).unwrap(), body.clone()).into_response()
        }
    }
}

async fn register_handler(State(state): State<BackendState>, Json(body): Json<Value>) -> Response {
    state.0.register_calls.fetch_add(1, Ordering::SeqCst);
    *state.0.seen_register_body.lock().unwrap() = Some(body.clone());

    let user = json!({
        "id": 99,
        "name": body["name"],
        "email": body["email"],
        "role": body["role"],
    });
    (StatusCode::OK, Json(user)).into_response()
}

async fn validate_handler(State(state): State<BackendState>, headers: HeaderMap) -> Response {
    state.0.validate_calls.fetch_add(1, Ordering::SeqCst);

    let bearer = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    *state.0.seen_bearer.lock().unwrap() = bearer;

    if let Some(delay) = state.0.validate_delay {
        tokio::time::sleep(delay).await;
    }

    match &state.0.validate {
        ValidateReply::Accept { user } => (
            StatusCode::OK,
            Json(json!({ "valid": true, "user": user })),
        )
            .into_response(),
        ValidateReply::Reject => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "valid": false }))).into_response()
        }
    }
}

struct FakeBackend {
    base_url: String,
    state: BackendState,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeBackend {
    async fn spawn(login: LoginReply, validate: ValidateReply, validate_delay: Option<Duration>) -> Self {
        let state = BackendState(Arc::new(BackendInner {
            login,
            validate,
            validate_delay,
            login_calls: AtomicUsize::new(0),
            register_calls: AtomicUsize::new(0),
            validate_calls: AtomicUsize::new(0),
            seen_bearer: Mutex::new(None),
            seen_register_body: Mutex::new(None),
        }));

        let app = Router::new()
            .route("/api/auth/login", post(login_handler))
            .route("/api/auth/register", post(register_handler))
            .route("/api/auth/validate", get(validate_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    fn validate_calls(&self) -> usize {
        self.state.0.validate_calls.load(Ordering::SeqCst)
    }

    fn login_calls(&self) -> usize {
        self.state.0.login_calls.load(Ordering::SeqCst)
    }

    fn register_calls(&self) -> usize {
        self.state.0.register_calls.load(Ordering::SeqCst)
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn patient_user() -> Value {
    json!({
        "id": 11,
        "name": "Asha Rao",
        "email": "asha@clinic.org",
        "role": "patient",
        "bloodGroup": "O+",
        "emergencyContact": "+91 98100 00000",
    })
}

fn mint_token(exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = BearerClaims {
        sub: Some("asha@clinic.org".to_string()),
        iat: Some(now),
        exp: Some(now + exp_offset_secs),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"fake-backend-secret"),
    )
    .expect("failed to encode token")
}

fn store_at(base_url: &str, credentials: Arc<MemoryCredentialStore>) -> SessionStore {
    let client = ApiClient::new(ClientConfig::new(base_url)).unwrap();
    SessionStore::new(client, credentials)
}

fn doctor_registration() -> RegisterRequest {
    RegisterRequest::Doctor(DoctorRegistration {
        account: AccountDetails {
            name: "Dr. Gupta".to_string(),
            email: "gupta@clinic.org".to_string(),
            password: "hunter2x".to_string(),
            phone: Some("+91 98100 11111".to_string()),
            address: None,
            date_of_birth: None,
        },
        specialization: "Cardiology".to_string(),
        license_number: "MD-1204".to_string(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// initialize()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_without_stored_credential_stays_offline() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept { user: patient_user() },
        None,
    )
    .await;

    let store = store_at(&backend.base_url, Arc::new(MemoryCredentialStore::new()));
    let phase = store.initialize().await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert!(!store.is_loading());
    assert_eq!(backend.validate_calls(), 0);
}

#[tokio::test]
async fn initialize_purges_malformed_credential_without_network() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept { user: patient_user() },
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token("not-a-jwt"));
    let store = store_at(&backend.base_url, credentials.clone());
    let phase = store.initialize().await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert_eq!(credentials.load().unwrap(), None);
    assert_eq!(backend.validate_calls(), 0);
}

#[tokio::test]
async fn initialize_purges_expired_credential_without_network() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept { user: patient_user() },
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token(mint_token(-300)));
    let store = store_at(&backend.base_url, credentials.clone());
    let phase = store.initialize().await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert_eq!(credentials.load().unwrap(), None);
    assert_eq!(backend.validate_calls(), 0);
}

#[tokio::test]
async fn initialize_confirms_live_credential_with_one_call() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept { user: patient_user() },
        None,
    )
    .await;

    let token = mint_token(600);
    let credentials = Arc::new(MemoryCredentialStore::with_token(token.clone()));
    let store = store_at(&backend.base_url, credentials.clone());
    let phase = store.initialize().await;

    let session = phase.session().expect("expected authenticated phase");
    assert_eq!(session.role(), Role::Patient);
    assert_eq!(session.display_name, "Asha Rao");
    assert!(matches!(
        session.attributes,
        RoleAttributes::Patient { ref blood_group, .. } if blood_group.as_deref() == Some("O+")
    ));

    assert_eq!(backend.validate_calls(), 1);
    assert_eq!(
        backend.state.0.seen_bearer.lock().unwrap().as_deref(),
        Some(token.as_str())
    );
    assert_eq!(credentials.load().unwrap(), Some(token));
}

#[tokio::test]
async fn initialize_downgrades_on_remote_rejection() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Reject,
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token(mint_token(600)));
    let store = store_at(&backend.base_url, credentials.clone());
    let phase = store.initialize().await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert_eq!(credentials.load().unwrap(), None);
    assert_eq!(backend.validate_calls(), 1);
}

#[tokio::test]
async fn initialize_fails_safe_on_transport_error() {
    // Bind and immediately drop a listener so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let credentials = Arc::new(MemoryCredentialStore::with_token(mint_token(600)));
    let store = store_at(&dead_url, credentials.clone());
    let phase = store.initialize().await;

    assert_eq!(phase, SessionPhase::Anonymous);
    assert_eq!(credentials.load().unwrap(), None);
}

#[tokio::test]
async fn concurrent_initialize_coalesces_into_one_validation() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept { user: patient_user() },
        Some(Duration::from_millis(150)),
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token(mint_token(600)));
    let store = Arc::new(store_at(&backend.base_url, credentials));

    let first = {
        let store = store.clone();
        tokio::spawn(async move { store.initialize().await })
    };
    let second = {
        let store = store.clone();
        tokio::spawn(async move { store.initialize().await })
    };

    let first = first.await.unwrap();
    let second = second.await.unwrap();

    assert_eq!(backend.validate_calls(), 1);
    assert_eq!(first, second);
    assert!(first.session().is_some());
}

#[tokio::test]
async fn initialize_with_unknown_role_is_terminal() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Accept {
            user: json!({
                "id": 5,
                "name": "Root",
                "email": "root@clinic.org",
                "role": "superuser",
            }),
        },
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token(mint_token(600)));
    let store = store_at(&backend.base_url, credentials.clone());
    let phase = store.initialize().await;

    assert_eq!(
        phase,
        SessionPhase::InvalidRole {
            email: "root@clinic.org".to_string(),
            role: "superuser".to_string(),
        }
    );
    assert_eq!(credentials.load().unwrap(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// login()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_persists_token_and_adopts_backend_role() {
    let backend = FakeBackend::spawn(
        LoginReply::Success {
            token: "t1".to_string(),
            user: patient_user(),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let store = store_at(&backend.base_url, credentials.clone());

    // Requested role is doctor; the backend says patient. The backend wins.
    let session = store
        .login("asha@clinic.org", "pw", Role::Doctor)
        .await
        .unwrap();

    assert_eq!(session.role(), Role::Patient);
    assert_eq!(credentials.load().unwrap(), Some("t1".to_string()));
    assert_eq!(store.phase(), SessionPhase::Authenticated(session));
    assert_eq!(backend.login_calls(), 1);
}

#[tokio::test]
async fn login_rejection_mutates_nothing() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectJson {
            status: 400,
            message: "Invalid password".to_string(),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::with_token("pre-existing"));
    let store = store_at(&backend.base_url, credentials.clone());
    let before = store.phase();

    let err = store
        .login("asha@clinic.org", "wrong", Role::Patient)
        .await
        .unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::Rejected);
    assert_eq!(err.message, "Invalid password");
    assert_eq!(store.phase(), before);
    assert_eq!(credentials.load().unwrap(), Some("pre-existing".to_string()));
}

#[tokio::test]
async fn login_rejection_surfaces_plain_text_bodies() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText {
            status: 400,
            body: "User not found".to_string(),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let store = store_at(&backend.base_url, Arc::new(MemoryCredentialStore::new()));
    let err = store
        .login("nobody@clinic.org", "pw", Role::Patient)
        .await
        .unwrap_err();

    assert_eq!(err.message, "User not found");
}

#[tokio::test]
async fn login_rejection_with_empty_body_uses_fallback_message() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText {
            status: 401,
            body: String::new(),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let store = store_at(&backend.base_url, Arc::new(MemoryCredentialStore::new()));
    let err = store
        .login("asha@clinic.org", "pw", Role::Patient)
        .await
        .unwrap_err();

    assert_eq!(err.message, LOGIN_REJECTED_FALLBACK);
}

#[tokio::test]
async fn login_transport_error_reports_connectivity() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let credentials = Arc::new(MemoryCredentialStore::new());
    let store = store_at(&dead_url, credentials.clone());
    let err = store
        .login("asha@clinic.org", "pw", Role::Patient)
        .await
        .unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::Network);
    assert_eq!(err.message, LOGIN_NETWORK_MESSAGE);
    assert_eq!(credentials.load().unwrap(), None);
}

#[tokio::test]
async fn login_with_unsupported_backend_role_does_not_authenticate() {
    let backend = FakeBackend::spawn(
        LoginReply::Success {
            token: "t1".to_string(),
            user: json!({
                "id": 5,
                "name": "Root",
                "email": "root@clinic.org",
                "role": "superuser",
            }),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let store = store_at(&backend.base_url, credentials.clone());
    let err = store
        .login("root@clinic.org", "pw", Role::Admin)
        .await
        .unwrap_err();

    assert_eq!(err.kind, AuthErrorKind::Rejected);
    assert!(matches!(store.phase(), SessionPhase::InvalidRole { .. }));
    assert_eq!(credentials.load().unwrap(), None);
}

// ─────────────────────────────────────────────────────────────────────────────
// register() / logout()
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_sends_role_tagged_payload_without_authenticating() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Reject,
        None,
    )
    .await;

    let store = store_at(&backend.base_url, Arc::new(MemoryCredentialStore::new()));
    let before = store.phase();

    let created = store.register(&doctor_registration()).await.unwrap();
    assert_eq!(created.name, "Dr. Gupta");

    let body = backend
        .state
        .0
        .seen_register_body
        .lock()
        .unwrap()
        .clone()
        .expect("register body not captured");
    assert_eq!(body["role"], "doctor");
    assert_eq!(body["specialization"], "Cardiology");
    assert_eq!(body["licenseNumber"], "MD-1204");
    assert!(body.get("bloodGroup").is_none());

    assert_eq!(store.phase(), before);
    assert_eq!(backend.register_calls(), 1);
}

#[tokio::test]
async fn register_validation_failures_never_reach_the_wire() {
    let backend = FakeBackend::spawn(
        LoginReply::RejectText { status: 400, body: String::new() },
        ValidateReply::Reject,
        None,
    )
    .await;

    let store = store_at(&backend.base_url, Arc::new(MemoryCredentialStore::new()));

    let mut registration = doctor_registration();
    if let RegisterRequest::Doctor(d) = &mut registration {
        d.account.password = "abc".to_string();
    }

    let err = store.register(&registration).await.unwrap_err();
    assert_eq!(err.kind, AuthErrorKind::Invalid);
    assert_eq!(backend.register_calls(), 0);
}

#[tokio::test]
async fn logout_clears_session_and_credential_idempotently() {
    let backend = FakeBackend::spawn(
        LoginReply::Success {
            token: "t1".to_string(),
            user: patient_user(),
        },
        ValidateReply::Reject,
        None,
    )
    .await;

    let credentials = Arc::new(MemoryCredentialStore::new());
    let store = store_at(&backend.base_url, credentials.clone());

    store
        .login("asha@clinic.org", "pw", Role::Patient)
        .await
        .unwrap();
    assert!(store.phase().session().is_some());

    store.logout();
    assert_eq!(store.phase(), SessionPhase::Anonymous);
    assert_eq!(credentials.load().unwrap(), None);

    // Safe to call with no active session.
    store.logout();
    assert_eq!(store.phase(), SessionPhase::Anonymous);
}
