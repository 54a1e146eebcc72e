#![allow(dead_code)]

//! In-process stand-in for the external mood API.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const EMAIL: &str = "lisa@example.com";
pub const PASSWORD: &str = "secret";
pub const USER_ID: &str = "u1";

pub struct Backend {
    pub me_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub fail_logout: AtomicBool,
    /// Holds `/auth/me` back this long before answering.
    pub me_delay_ms: AtomicU64,
    users: Mutex<Vec<(String, Value)>>,
    tokens: Mutex<HashMap<String, String>>,
    refresh_tokens: Mutex<HashMap<String, String>>,
    entries: Mutex<HashMap<String, Vec<Value>>>,
    issued: AtomicUsize,
}

impl Backend {
    fn new() -> Self {
        let lisa = json!({
            "id": USER_ID,
            "name": "Lisa",
            "email": EMAIL,
            "password": PASSWORD,
        });
        Self {
            me_calls: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            fail_logout: AtomicBool::new(false),
            me_delay_ms: AtomicU64::new(0),
            users: Mutex::new(vec![(USER_ID.to_string(), lisa)]),
            tokens: Mutex::new(HashMap::new()),
            refresh_tokens: Mutex::new(HashMap::new()),
            entries: Mutex::new(HashMap::new()),
            issued: AtomicUsize::new(0),
        }
    }

    /// Registers an access token for `user_id`, as if issued earlier.
    pub fn grant(&self, token: &str, user_id: &str) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), user_id.to_string());
    }

    pub fn grant_refresh(&self, token: &str, user_id: &str) {
        self.refresh_tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), user_id.to_string());
    }

    pub fn seed_entry(&self, user_id: &str, date: &str, mood: Value, sleep: &str) {
        self.entries
            .lock()
            .unwrap()
            .entry(user_id.to_string())
            .or_default()
            .push(json!({
                "_id": format!("e{}", self.issued.fetch_add(1, Ordering::SeqCst)),
                "userId": user_id,
                "date": date,
                "overallMood": mood,
                "feelings": ["calm"],
                "journalEntry": "seeded",
                "sleepHours": sleep,
            }));
    }

    pub fn entry_count(&self, user_id: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .get(user_id)
            .map_or(0, Vec::len)
    }

    pub fn last_entry(&self, user_id: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap()
            .get(user_id)
            .and_then(|entries| entries.last().cloned())
    }

    fn public_user(&self, user_id: &str) -> Option<Value> {
        let users = self.users.lock().unwrap();
        let (_, user) = users.iter().find(|(id, _)| id == user_id)?;
        let mut user = user.clone();
        user.as_object_mut()?.remove("password");
        Some(user)
    }

    fn issue(&self, user_id: &str) -> (String, String) {
        let n = self.issued.fetch_add(1, Ordering::SeqCst);
        let access = format!("access-{n}");
        let refresh = format!("refresh-{n}");
        self.grant(&access, user_id);
        self.grant_refresh(&refresh, user_id);
        (access, refresh)
    }

    fn bearer_user(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = value.strip_prefix("Bearer ")?;
        self.tokens.lock().unwrap().get(token).cloned()
    }
}

type Shared = Arc<Backend>;

fn fail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "success": false, "message": message }))).into_response()
}

fn ok(message: &str, data: Value) -> Response {
    Json(json!({ "success": true, "message": message, "data": data })).into_response()
}

async fn signup(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    {
        let users = backend.users.lock().unwrap();
        if users.iter().any(|(_, user)| user["email"] == email.as_str()) {
            return fail(StatusCode::CONFLICT, "Email already registered");
        }
    }
    let id = format!("u{}", backend.issued.fetch_add(1, Ordering::SeqCst) + 100);
    let mut user = json!({
        "id": id,
        "name": body["name"],
        "email": email,
        "password": body["password"],
    });
    if let Some(image) = body.get("profileImage") {
        user["profileImage"] = image.clone();
    }
    backend.users.lock().unwrap().push((id.clone(), user));
    let (access, refresh) = backend.issue(&id);
    let user = backend.public_user(&id).unwrap_or(Value::Null);
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Account created",
            "data": { "user": user, "accessToken": access, "refreshToken": refresh },
        })),
    )
        .into_response()
}

async fn login(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let found = {
        let users = backend.users.lock().unwrap();
        users
            .iter()
            .find(|(_, user)| user["email"] == body["email"] && user["password"] == body["password"])
            .map(|(id, _)| id.clone())
    };
    let Some(id) = found else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid credentials");
    };
    let (access, refresh) = backend.issue(&id);
    let user = backend.public_user(&id).unwrap_or(Value::Null);
    ok(
        "Logged in",
        json!({ "user": user, "accessToken": access, "refreshToken": refresh }),
    )
}

async fn me(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    backend.me_calls.fetch_add(1, Ordering::SeqCst);
    let delay = backend.me_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    match backend.bearer_user(&headers) {
        Some(id) => ok("", json!({ "user": backend.public_user(&id) })),
        None => fail(StatusCode::UNAUTHORIZED, "Token expired"),
    }
}

async fn profile(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(id) = backend.bearer_user(&headers) else {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized");
    };
    {
        let mut users = backend.users.lock().unwrap();
        if let Some((_, user)) = users.iter_mut().find(|(user_id, _)| *user_id == id) {
            for key in ["name", "email", "profileImage"] {
                if let Some(value) = body.get(key) {
                    user[key] = value.clone();
                }
            }
        }
    }
    ok("Profile updated", json!({ "user": backend.public_user(&id) }))
}

async fn update_name(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if backend.bearer_user(&headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized");
    }
    let id = body["userId"].as_str().unwrap_or_default().to_string();
    let mut users = backend.users.lock().unwrap();
    match users.iter_mut().find(|(user_id, _)| *user_id == id) {
        Some((_, user)) => {
            user["name"] = body["name"].clone();
            Json(json!({ "success": true, "message": "Name updated" })).into_response()
        }
        None => fail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn logout(State(backend): State<Shared>) -> Response {
    backend.logout_calls.fetch_add(1, Ordering::SeqCst);
    if backend.fail_logout.load(Ordering::SeqCst) {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Logout failed");
    }
    Json(json!({ "success": true, "message": "Logged out" })).into_response()
}

async fn refresh(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let token = body["refreshToken"].as_str().unwrap_or_default();
    let owner = backend.refresh_tokens.lock().unwrap().remove(token);
    let Some(id) = owner else {
        return fail(StatusCode::UNAUTHORIZED, "Invalid refresh token");
    };
    let (access, refresh) = backend.issue(&id);
    ok(
        "Token refreshed",
        json!({ "accessToken": access, "refreshToken": refresh }),
    )
}

async fn create_entry(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(id) = backend.bearer_user(&headers) else {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized");
    };
    if body["userId"] != id.as_str() {
        return fail(StatusCode::FORBIDDEN, "Wrong user");
    }
    let mut entry = body.clone();
    entry["date"] = json!(chrono::Utc::now().to_rfc3339());
    entry["_id"] = json!(format!("e{}", backend.issued.fetch_add(1, Ordering::SeqCst)));
    backend
        .entries
        .lock()
        .unwrap()
        .entry(id)
        .or_default()
        .push(entry);
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "message": "Mood logged" })),
    )
        .into_response()
}

async fn list_entries(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    if backend.bearer_user(&headers).is_none() {
        return fail(StatusCode::UNAUTHORIZED, "Not authorized");
    }
    let entries = backend
        .entries
        .lock()
        .unwrap()
        .get(&user_id)
        .cloned()
        .unwrap_or_default();
    ok("", Value::Array(entries))
}

fn router(backend: Shared) -> Router {
    let api = Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/profile", put(profile))
        .route("/auth/logout", post(logout))
        .route("/auth/refresh", post(refresh))
        .route("/user-mode/create", post(create_entry))
        .route("/user-mode/get/:user_id", get(list_entries))
        .route("/user/update", post(update_name));
    Router::new().nest("/api", api).with_state(backend)
}

/// Serves the fake API on the current runtime. Returns its base URL.
pub async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake api");
    let addr = listener.local_addr().expect("fake api address");
    let app = router(Arc::clone(&backend));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake api stopped");
    });
    (format!("http://{addr}/api"), backend)
}

/// Serves the fake API on its own thread so it outlives any one test runtime.
pub fn spawn_backend_thread() -> (String, Arc<Backend>) {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("fake api runtime");
        runtime.block_on(async move {
            let spawned = spawn_backend().await;
            tx.send(spawned).expect("report fake api");
            std::future::pending::<()>().await;
        });
    });
    rx.recv().expect("fake api did not start")
}

pub fn unique_path(prefix: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("{prefix}_{}_{}.json", std::process::id(), nanos));
    path
}
