//! In-process mock of the task board API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use taskboard_client::{ApiClient, ClientConfig, CredentialStore};

pub const PASSWORD: &str = "secret";
pub const INITIAL_TOKEN: &str = "access-1";
pub const RENEWED_TOKEN: &str = "access-2";
pub const REFRESH_TOKEN: &str = "refresh-1";

/// Opaque cursors handed out page by page.
const CURSORS: [&str; 4] = ["", "abc", "def", "ghi"];

type Reply = (StatusCode, Json<Value>);

pub struct MockState {
    /// The only bearer token the API accepts.
    pub access_token: Mutex<String>,
    pub refresh_succeeds: AtomicBool,
    pub refresh_calls: AtomicUsize,
    pub task_requests: AtomicUsize,
    pub user_requests: AtomicUsize,
    pub logout_calls: AtomicUsize,
    /// Bearer tokens presented to protected endpoints, in arrival order.
    pub seen_tokens: Mutex<Vec<String>>,
    pub tasks: Mutex<Vec<Value>>,
}

impl MockState {
    fn new() -> Self {
        let tasks = ["Write brief", "Review draft", "Ship release", "slow", "fast"]
            .iter()
            .enumerate()
            .map(|(i, title)| {
                json!({
                    "id": format!("t{}", i + 1),
                    "projectId": "p1",
                    "status": "ToDo",
                    "title": title,
                })
            })
            .collect();
        Self {
            access_token: Mutex::new(INITIAL_TOKEN.into()),
            refresh_succeeds: AtomicBool::new(true),
            refresh_calls: AtomicUsize::new(0),
            task_requests: AtomicUsize::new(0),
            user_requests: AtomicUsize::new(0),
            logout_calls: AtomicUsize::new(0),
            seen_tokens: Mutex::new(Vec::new()),
            tasks: Mutex::new(tasks),
        }
    }

    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn task_requests(&self) -> usize {
        self.task_requests.load(Ordering::SeqCst)
    }

    pub fn seen_tokens(&self) -> Vec<String> {
        self.seen_tokens.lock().unwrap().clone()
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);
        let Some(token) = token else {
            return false;
        };
        self.seen_tokens.lock().unwrap().push(token.clone());
        *self.access_token.lock().unwrap() == token
    }
}

pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockApi {
    pub async fn spawn() -> Self {
        let state = Arc::new(MockState::new());
        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register-admin", post(register_admin))
            .route("/auth/refresh-token", post(refresh_token))
            .route("/auth/logout", delete(logout))
            .route("/tasks", get(list_tasks).post(create_task))
            .route("/projects", get(list_projects))
            .route("/users", get(list_users))
            .route("/users/exists-by-email", get(email_exists))
            .route("/teams/owner", get(team_by_owner))
            .with_state(Arc::clone(&state));
        let app = Router::new().nest("/api/v1", api);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api/v1"),
            state,
        }
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            session_file: None,
            request_timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Client with an empty in-memory session.
    pub fn client(&self) -> ApiClient {
        ApiClient::with_credentials(&self.config(), CredentialStore::in_memory()).unwrap()
    }

    /// Client holding a session whose access token the API no longer accepts.
    pub fn client_with_expired_token(&self) -> ApiClient {
        let credentials = CredentialStore::in_memory();
        credentials
            .set_session("expired".into(), REFRESH_TOKEN.into(), None)
            .unwrap();
        ApiClient::with_credentials(&self.config(), credentials).unwrap()
    }
}

fn unauthorized() -> Reply {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "unauthorized", "statusCode": 401})),
    )
}

fn session_reply(state: &MockState, email: &Value, status: StatusCode) -> Reply {
    let access_token = state.access_token.lock().unwrap().clone();
    (
        status,
        Json(json!({
            "accessToken": access_token,
            "refreshToken": REFRESH_TOKEN,
            "user": {"id": "u1", "email": email, "role": "Admin", "username": "ada"},
        })),
    )
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    if body["email"] == "locked@example.com" {
        return unauthorized();
    }
    if body["password"] == PASSWORD {
        session_reply(&state, &body["email"], StatusCode::OK)
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({"message": "invalid credentials", "statusCode": 409})),
        )
    }
}

async fn register_admin(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    if body["email"] == "taken@example.com" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "email already registered", "statusCode": 409})),
        );
    }
    session_reply(&state, &body["email"], StatusCode::CREATED)
}

async fn refresh_token(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Reply {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;

    if state.refresh_succeeds.load(Ordering::SeqCst) && body["refreshToken"] == REFRESH_TOKEN {
        *state.access_token.lock().unwrap() = RENEWED_TOKEN.into();
        (StatusCode::OK, Json(json!({"accessToken": RENEWED_TOKEN})))
    } else {
        unauthorized()
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    state.logout_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(json!({"statusCode": 200})))
}

async fn list_tasks(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    state.task_requests.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }

    let title = params.get("title").cloned().unwrap_or_default();
    if title == "slow" {
        tokio::time::sleep(Duration::from_millis(300)).await;
    }

    let limit = params
        .get("limit")
        .and_then(|limit| limit.parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(10);
    let cursor = params.get("cursor").map(String::as_str).unwrap_or("");
    let page = CURSORS.iter().position(|c| *c == cursor).unwrap_or(0);

    let matching: Vec<Value> = state
        .tasks
        .lock()
        .unwrap()
        .iter()
        .filter(|task| {
            title.is_empty() || task["title"].as_str().is_some_and(|t| t.contains(&title))
        })
        .cloned()
        .collect();

    let start = (page * limit).min(matching.len());
    let end = (start + limit).min(matching.len());
    let data = &matching[start..end];
    let next_cursor = if end < matching.len() {
        CURSORS.get(page + 1).copied().unwrap_or("")
    } else {
        ""
    };
    let prev_cursor = if page > 0 { CURSORS[page - 1] } else { "" };

    (
        StatusCode::OK,
        Json(json!({
            "data": if data.is_empty() { Value::Null } else { json!(data) },
            "pagination": {"prev_cursor": prev_cursor, "next_cursor": next_cursor},
        })),
    )
}

async fn create_task(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let Some(title) = body["title"].as_str().filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "title is required", "statusCode": 400})),
        );
    };

    let mut tasks = state.tasks.lock().unwrap();
    let id = format!("t{}", tasks.len() + 1);
    tasks.push(json!({
        "id": id,
        "projectId": body["projectId"],
        "status": "ToDo",
        "title": title,
    }));
    (
        StatusCode::CREATED,
        Json(json!({"id": id, "statusCode": 201})),
    )
}

/// Sits behind a misbehaving gateway.
async fn list_projects() -> Reply {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({"message": "bad gateway"})),
    )
}

/// Rejects every token, renewed or not.
async fn list_users(State(state): State<Arc<MockState>>) -> Reply {
    state.user_requests.fetch_add(1, Ordering::SeqCst);
    unauthorized()
}

async fn email_exists(Query(params): Query<HashMap<String, String>>) -> Reply {
    let exists = params.get("email").is_some_and(|e| e == "ada@example.com");
    (StatusCode::OK, Json(json!({"exists": exists})))
}

async fn team_by_owner(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!({
            "exists": true,
            "team": {"id": "team-1", "name": "Core", "ownerId": "u1"},
        })),
    )
}
