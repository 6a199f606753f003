//! HTTP surface for the todo service.
//!
//! # Overview
//! Maps the REST routes onto the SQLite-backed [`store::SqliteStore`].
//! Handlers are stateless: the store sits behind an async mutex in shared
//! axum state and every request takes it for the duration of a single
//! store call. Validation runs before any mutation; error translation to
//! the wire happens once, in [`error::ApiError`].

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use todo_core::{CreateTodo, Todo, TodoFilter, UpdateTodo};

pub mod error;
pub mod store;
pub mod validate;

use error::ApiError;
use store::SqliteStore;

pub type Db = Arc<Mutex<SqliteStore>>;

pub fn app(store: SqliteStore) -> Router {
    let db: Db = Arc::new(Mutex::new(store));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/todos/{id}/toggle", patch(toggle_todo))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener, store: SqliteStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn list_todos(
    State(db): State<Db>,
    Query(filter): Query<TodoFilter>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    tracing::info!(
        is_completed = ?filter.is_completed,
        priority = ?filter.priority,
        "listing todos"
    );
    let todos = db.lock().await.list(&filter)?;
    Ok(Json(todos))
}

async fn get_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Todo>, ApiError> {
    let todo = db.lock().await.get(id)?;
    Ok(Json(todo))
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    validate::validate_create(&input)?;
    tracing::info!(title = %input.title.trim(), "creating todo");
    let todo = db.lock().await.create(&input)?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTodo>,
) -> Result<Json<Todo>, ApiError> {
    validate::validate_update(&input)?;
    tracing::info!(id, "updating todo");
    let todo = db.lock().await.update(id, &input)?;
    Ok(Json(todo))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    tracing::info!(id, "deleting todo");
    db.lock().await.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_todo(State(db): State<Db>, Path(id): Path<i64>) -> Result<Json<Todo>, ApiError> {
    tracing::info!(id, "toggling todo completion");
    let todo = db.lock().await.toggle(id)?;
    Ok(Json(todo))
}

/// Resolves when SIGINT (Ctrl+C) or, on Unix, SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
