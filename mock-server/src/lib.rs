use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct List {
    pub id: i64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub done: bool,
    pub list_id: i64,
}

/// Missing fields take their zero value, as the Go service's decoder does.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateList {
    #[serde(alias = "name", default)]
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateListResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub list_id: i64,
}

/// Lists and tasks in insertion order. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct Store {
    lists: Vec<List>,
    tasks: Vec<Task>,
}

impl Store {
    pub fn lists(&self) -> Vec<List> {
        self.lists.clone()
    }

    pub fn tasks_of(&self, list_id: i64) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.list_id == list_id)
            .cloned()
            .collect()
    }

    pub fn insert_list(&mut self, name: String) -> i64 {
        let id = self.lists.len() as i64 + 1;
        self.lists.push(List { id, name });
        id
    }

    /// Returns `None` when `list_id` names no list.
    pub fn insert_task(&mut self, name: String, list_id: i64) -> Option<i64> {
        if !self.lists.iter().any(|list| list.id == list_id) {
            return None;
        }
        let id = self.tasks.len() as i64 + 1;
        self.tasks.push(Task {
            id,
            name,
            done: false,
            list_id,
        });
        Some(id)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/list", get(list_lists).post(create_list))
        .route("/list/", get(list_lists))
        .route("/list/{id}", get(list_tasks))
        .route("/task", post(create_task))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Malformed input is a server error here, not a client one.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, StatusCode> {
    serde_json::from_slice(body).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn list_lists(State(db): State<Db>) -> Json<Vec<List>> {
    Json(db.read().await.lists())
}

async fn list_tasks(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Task>>, StatusCode> {
    let list_id: i64 = id.parse().map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(db.read().await.tasks_of(list_id)))
}

async fn create_list(
    State(db): State<Db>,
    body: Bytes,
) -> Result<Json<CreateListResponse>, StatusCode> {
    let input: CreateList = parse_body(&body)?;
    let id = db.write().await.insert_list(input.name);
    Ok(Json(CreateListResponse { id }))
}

async fn create_task(State(db): State<Db>, body: Bytes) -> Result<&'static str, StatusCode> {
    let input: CreateTask = parse_body(&body)?;
    db.write()
        .await
        .insert_task(input.name, input.list_id)
        .map(|_| "OK")
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}
