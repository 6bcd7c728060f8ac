use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::services::ServeDir;

use sched::error::SchedError;
use sched::model::Task;
use sched::ops::{self, Completion};
use sched::recur;

use crate::auth;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);
type ApiResult<T> = Result<T, ApiError>;

pub fn create_router(state: Arc<AppState>, web_dir: &str) -> Router {
    let tasks = Router::new()
        .route(
            "/api/task",
            post(add_task)
                .get(get_task)
                .put(update_task)
                .delete(delete_task),
        )
        .route("/api/tasks", get(list_tasks))
        .route("/api/task/done", post(complete_task))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .merge(tasks)
        .route("/api/signin", post(auth::signin))
        .route("/api/nextdate", get(next_date))
        .fallback_service(ServeDir::new(web_dir))
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn err(code: StatusCode, msg: impl Into<String>) -> ApiError {
    let msg: String = msg.into();
    (code, Json(json!({ "error": msg })))
}

fn map_sched_error(e: SchedError) -> ApiError {
    let code = match &e {
        SchedError::NotFound(_) => StatusCode::NOT_FOUND,
        SchedError::Storage(_) | SchedError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };
    err(code, e.to_string())
}

/// Ids cross the wire as strings; only positive integers are accepted.
fn parse_wire_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "no id"));
    }
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(err(StatusCode::BAD_REQUEST, format!("bad id '{raw}'"))),
    }
}

/// Wire form of one task: every field a string.
#[derive(Serialize)]
struct TaskOut {
    id: String,
    date: String,
    title: String,
    comment: String,
    repeat: String,
}

impl From<Task> for TaskOut {
    fn from(t: Task) -> Self {
        Self {
            id: t.id.to_string(),
            date: t.date,
            title: t.title,
            comment: t.comment,
            repeat: t.repeat,
        }
    }
}

#[derive(Deserialize)]
struct TaskIn {
    #[serde(default)]
    id: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    repeat: String,
}

#[derive(Deserialize)]
struct IdParam {
    id: Option<String>,
}

impl IdParam {
    fn parse(&self) -> Result<i64, ApiError> {
        parse_wire_id(self.id.as_deref().unwrap_or(""))
    }
}

async fn add_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskIn>,
) -> ApiResult<Json<Value>> {
    let mut task = Task {
        id: 0,
        date: req.date,
        title: req.title,
        comment: req.comment,
        repeat: req.repeat,
    };
    let conn = state.conn();
    let id = ops::add_task(&conn, &mut task, today()).map_err(map_sched_error)?;
    log::info!("added task {id} due {}", task.date);
    Ok(Json(json!({ "id": id.to_string() })))
}

async fn get_task(
    State(state): State<Arc<AppState>>,
    Query(param): Query<IdParam>,
) -> ApiResult<Json<TaskOut>> {
    let id = param.parse()?;
    let conn = state.conn();
    let task = ops::get_task(&conn, id).map_err(map_sched_error)?;
    Ok(Json(task.into()))
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TaskIn>,
) -> ApiResult<Json<Value>> {
    let id = parse_wire_id(&req.id)?;
    let mut task = Task {
        id,
        date: req.date,
        title: req.title,
        comment: req.comment,
        repeat: req.repeat,
    };
    let conn = state.conn();
    ops::update_task(&conn, &mut task, today()).map_err(map_sched_error)?;
    Ok(Json(json!({})))
}

async fn delete_task(
    State(state): State<Arc<AppState>>,
    Query(param): Query<IdParam>,
) -> ApiResult<Json<Value>> {
    let id = param.parse()?;
    let conn = state.conn();
    ops::delete_task(&conn, id).map_err(map_sched_error)?;
    log::info!("removed task {id}");
    Ok(Json(json!({})))
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    Query(param): Query<IdParam>,
) -> ApiResult<Json<Value>> {
    let id = param.parse()?;
    let conn = state.conn();
    match ops::complete_task(&conn, id, today()).map_err(map_sched_error)? {
        Completion::Removed => log::info!("completed and removed task {id}"),
        Completion::Rescheduled(ref next) => log::info!("completed task {id}, next due {next}"),
    }
    Ok(Json(json!({})))
}

#[derive(Deserialize)]
struct ListParams {
    #[serde(default)]
    search: String,
    limit: Option<usize>,
}

async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Value>> {
    let conn = state.conn();
    let tasks = ops::list_tasks(&conn, params.limit.unwrap_or(0), &params.search)
        .map_err(map_sched_error)?;
    let out: Vec<TaskOut> = tasks.into_iter().map(TaskOut::from).collect();
    Ok(Json(json!({ "tasks": out })))
}

#[derive(Deserialize)]
struct NextDateParams {
    #[serde(default)]
    now: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    repeat: String,
}

/// GET /api/nextdate?now=YYYYMMDD&date=YYYYMMDD&repeat=...
/// Returns the computed date as plain text; an empty `now` means today.
async fn next_date(Query(params): Query<NextDateParams>) -> Result<String, ApiError> {
    let now = if params.now.trim().is_empty() {
        today()
    } else {
        recur::parse_date(params.now.trim()).map_err(map_sched_error)?
    };
    recur::next_date(now, params.date.trim(), params.repeat.trim()).map_err(map_sched_error)
}
