//! Common test utilities: an in-process mock of the marketplace backend
//!
//! The mock serves the consumed REST contract over a real socket so the
//! reqwest-based client is exercised end to end. Per-route hit counters
//! let tests assert that an operation issued no network traffic.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use onetask_client::{ApiClient, Config, MemorySessionStore, SessionManager};
use onetask_core::{
    decode_basic, LoginStatus, ProfileUpdate, Proposal, ProposalCreation, ProposalId,
    Registration, Role, Task, TaskCreation, TaskId, TaskStatus, TaskType, UserId, UserProfile,
};

/// A registered user in the mock backend
#[derive(Clone)]
pub struct MockUser {
    pub profile: UserProfile,
    pub password: String,
}

/// Request counters, one per interesting route
#[derive(Default)]
pub struct Hits {
    pub login: AtomicUsize,
    pub register: AtomicUsize,
    pub proposals_list: AtomicUsize,
    pub proposals_create: AtomicUsize,
    pub assign: AtomicUsize,
}

/// Shared state behind the mock router
#[derive(Default)]
pub struct BackendState {
    users: RwLock<Vec<MockUser>>,
    tasks: RwLock<Vec<Task>>,
    proposals: RwLock<Vec<Proposal>>,
    next_id: AtomicI32,
    /// When set, POST /rest/proposals answers 201 with an empty body
    pub empty_proposal_body: AtomicBool,
    /// When set, the assignment endpoint answers 500
    pub fail_assignment: AtomicBool,
    pub hits: Hits,
}

impl BackendState {
    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn authenticate(&self, headers: &HeaderMap) -> Option<MockUser> {
        let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (username, password) = decode_basic(header).ok()?;
        self.users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.profile.username == username && u.password == password)
            .cloned()
    }

    pub fn seed_user(&self, username: &str, password: &str) -> UserId {
        let id = UserId(self.next_id());
        let profile = UserProfile {
            id,
            username: username.to_string(),
            first_name: username.to_string(),
            last_name: "Tester".to_string(),
            email: format!("{username}@example.com"),
            rating: None,
            role: Some(Role::User),
        };
        self.users.write().unwrap().push(MockUser {
            profile,
            password: password.to_string(),
        });
        id
    }

    pub fn seed_task(&self, customer: UserId, customer_username: &str, title: &str) -> TaskId {
        let id = TaskId(self.next_id());
        self.tasks.write().unwrap().push(Task {
            id,
            title: title.to_string(),
            problem: format!("Problem statement for {title}"),
            task_type: TaskType::ProgrammingAndDevelopment,
            deadline: Utc::now() + Duration::days(14),
            payment: 100.0,
            status: TaskStatus::Unassigned,
            customer_id: Some(customer),
            customer_username: Some(customer_username.to_string()),
            freelancer_id: None,
            freelancer_username: None,
            posted_date: Some(Utc::now()),
            assigned_date: None,
            submitted_date: None,
        });
        id
    }

    pub fn seed_proposal(&self, task_id: TaskId, freelancer_id: UserId) -> ProposalId {
        let id = ProposalId(self.next_id());
        self.proposals.write().unwrap().push(Proposal {
            id: Some(id),
            task_id,
            freelancer_id,
        });
        id
    }

    pub fn task_status(&self, task_id: TaskId) -> Option<TaskStatus> {
        self.tasks
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id)
            .map(|t| t.status)
    }

    pub fn task_freelancer(&self, task_id: TaskId) -> Option<UserId> {
        self.tasks
            .read()
            .unwrap()
            .iter()
            .find(|t| t.id == task_id)
            .and_then(|t| t.freelancer_id)
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.read().unwrap().len()
    }

    pub fn user_email(&self, username: &str) -> Option<String> {
        self.users
            .read()
            .unwrap()
            .iter()
            .find(|u| u.profile.username == username)
            .map(|u| u.profile.email.clone())
    }
}

/// Handle to a running mock backend
pub struct MockBackend {
    pub base_url: String,
    pub state: Arc<BackendState>,
}

impl MockBackend {
    pub fn client(&self) -> ApiClient {
        let config = Config {
            api_url: self.base_url.clone(),
            ..Config::default()
        };
        ApiClient::new(&config).expect("Failed to build api client")
    }

    pub fn session_manager(&self) -> SessionManager<MemorySessionStore> {
        SessionManager::new(self.client(), MemorySessionStore::new())
    }
}

/// Spawn the mock backend on an ephemeral port
pub async fn spawn_backend() -> MockBackend {
    let state = Arc::new(BackendState::default());
    let app = router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock backend");
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock backend crashed");
    });

    MockBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

fn router(state: Arc<BackendState>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/rest/users", post(register))
        .route("/rest/users/current", get(current_user))
        .route("/rest/users/username/:username", get(user_by_username))
        .route("/rest/users/:id", get(user_by_id).put(update_user))
        .route("/rest/tasks", post(create_task))
        .route("/rest/tasks/taskBoard", get(task_board))
        .route("/rest/tasks/posted", get(posted_tasks))
        .route("/rest/tasks/taken", get(taken_tasks))
        .route("/rest/tasks/posted/:id/proposals/:fid", post(assign))
        .route("/rest/tasks/:id", get(task_by_id))
        .route("/rest/proposals", get(list_proposals).post(create_proposal))
        .with_state(state)
}

async fn login(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> impl IntoResponse {
    state.hits.login.fetch_add(1, Ordering::SeqCst);
    match state.authenticate(&headers) {
        Some(user) => (
            StatusCode::OK,
            Json(LoginStatus {
                logged_in: true,
                success: true,
                user_id: Some(user.profile.id),
                username: Some(user.profile.username),
                error_message: None,
            }),
        ),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(LoginStatus {
                logged_in: false,
                success: false,
                user_id: None,
                username: None,
                error_message: Some("Bad credentials".to_string()),
            }),
        ),
    }
}

async fn register(
    State(state): State<Arc<BackendState>>,
    Json(reg): Json<Registration>,
) -> StatusCode {
    state.hits.register.fetch_add(1, Ordering::SeqCst);
    {
        let users = state.users.read().unwrap();
        if users.iter().any(|u| u.profile.username == reg.username) {
            return StatusCode::CONFLICT;
        }
    }
    let id = UserId(state.next_id());
    state.users.write().unwrap().push(MockUser {
        profile: UserProfile {
            id,
            username: reg.username,
            first_name: reg.first_name,
            last_name: reg.last_name,
            email: reg.email,
            rating: None,
            role: Some(Role::User),
        },
        password: reg.password,
    });
    StatusCode::CREATED
}

async fn current_user(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    match state.authenticate(&headers) {
        Some(user) => Json(user.profile).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn user_by_id(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let users = state.users.read().unwrap();
    match users.iter().find(|u| u.profile.id == UserId(id)) {
        Some(user) => Json(user.profile.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn user_by_username(
    State(state): State<Arc<BackendState>>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let users = state.users.read().unwrap();
    match users.iter().find(|u| u.profile.username == username) {
        Some(user) => Json(user.profile.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn update_user(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> StatusCode {
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED;
    };
    if update.id != UserId(id) {
        return StatusCode::BAD_REQUEST;
    }
    if user.profile.id != UserId(id) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut users = state.users.write().unwrap();
    if let Some(stored) = users.iter_mut().find(|u| u.profile.id == UserId(id)) {
        stored.profile.first_name = update.first_name;
        stored.profile.last_name = update.last_name;
        stored.profile.email = update.email;
    }
    StatusCode::OK
}

#[derive(Deserialize)]
struct BoardQuery {
    #[serde(rename = "fromNewest")]
    from_newest: bool,
}

async fn task_board(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<BoardQuery>,
) -> Json<Vec<Task>> {
    let mut tasks = state.tasks.read().unwrap().clone();
    tasks.sort_by_key(|t| t.posted_date);
    if query.from_newest {
        tasks.reverse();
    }
    Json(tasks)
}

#[derive(Deserialize)]
struct PostedQuery {
    expired: bool,
}

async fn posted_tasks(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<PostedQuery>,
) -> impl IntoResponse {
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let now = Utc::now();
    let tasks: Vec<Task> = state
        .tasks
        .read()
        .unwrap()
        .iter()
        .filter(|t| t.customer_id == Some(user.profile.id))
        .filter(|t| (t.deadline < now) == query.expired)
        .cloned()
        .collect();
    Json(tasks).into_response()
}

#[derive(Deserialize)]
struct TakenQuery {
    #[serde(rename = "taskStatus")]
    task_status: Option<String>,
    expired: bool,
}

async fn taken_tasks(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Query(query): Query<TakenQuery>,
) -> impl IntoResponse {
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    let now = Utc::now();
    let tasks: Vec<Task> = state
        .tasks
        .read()
        .unwrap()
        .iter()
        .filter(|t| t.freelancer_id == Some(user.profile.id))
        .filter(|t| (t.deadline < now) == query.expired)
        .filter(|t| match query.task_status.as_deref() {
            Some(status) => t.status.as_str() == status,
            None => true,
        })
        .cloned()
        .collect();
    Json(tasks).into_response()
}

async fn task_by_id(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let tasks = state.tasks.read().unwrap();
    match tasks.iter().find(|t| t.id == TaskId(id)) {
        Some(task) => Json(task.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn create_task(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(creation): Json<TaskCreation>,
) -> StatusCode {
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED;
    };
    let id = TaskId(state.next_id());
    state.tasks.write().unwrap().push(Task {
        id,
        title: creation.title,
        problem: creation.problem,
        task_type: creation.task_type,
        deadline: creation.deadline,
        payment: creation.payment,
        status: creation.task_status,
        customer_id: Some(user.profile.id),
        customer_username: Some(user.profile.username),
        freelancer_id: None,
        freelancer_username: None,
        posted_date: Some(Utc::now()),
        assigned_date: None,
        submitted_date: None,
    });
    StatusCode::CREATED
}

async fn list_proposals(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.hits.proposals_list.fetch_add(1, Ordering::SeqCst);
    if state.authenticate(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(state.proposals.read().unwrap().clone()).into_response()
}

async fn create_proposal(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(creation): Json<ProposalCreation>,
) -> impl IntoResponse {
    state.hits.proposals_create.fetch_add(1, Ordering::SeqCst);
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };
    if creation.freelancer_id != user.profile.id {
        return StatusCode::FORBIDDEN.into_response();
    }

    let id = ProposalId(state.next_id());
    state.proposals.write().unwrap().push(Proposal {
        id: Some(id),
        task_id: creation.task_id,
        freelancer_id: creation.freelancer_id,
    });

    let location = (header::LOCATION, format!("/rest/proposals/{id}"));
    if state.empty_proposal_body.load(Ordering::SeqCst) {
        (StatusCode::CREATED, [location]).into_response()
    } else {
        (StatusCode::CREATED, [location], Json(json!({ "id": id.0 }))).into_response()
    }
}

async fn assign(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Path((task_id, freelancer_id)): Path<(i32, i32)>,
) -> StatusCode {
    state.hits.assign.fetch_add(1, Ordering::SeqCst);
    let Some(user) = state.authenticate(&headers) else {
        return StatusCode::UNAUTHORIZED;
    };
    if state.fail_assignment.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    let freelancer_username = state
        .users
        .read()
        .unwrap()
        .iter()
        .find(|u| u.profile.id == UserId(freelancer_id))
        .map(|u| u.profile.username.clone());

    let mut tasks = state.tasks.write().unwrap();
    let Some(task) = tasks.iter_mut().find(|t| t.id == TaskId(task_id)) else {
        return StatusCode::NOT_FOUND;
    };
    if task.customer_id != Some(user.profile.id) {
        return StatusCode::FORBIDDEN;
    }

    task.status = TaskStatus::Assigned;
    task.freelancer_id = Some(UserId(freelancer_id));
    task.freelancer_username = freelancer_username;
    task.assigned_date = Some(Utc::now());
    StatusCode::NO_CONTENT
}
