use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Deserialize;

use crate::{
    application::todo_service::TodoService,
    domain::todo::{NewTodo, Todo, TodoId, TodoPatch},
    http::types::ApiError,
};

#[derive(Clone)]
pub struct AppState<S: TodoService> { pub service: S }

pub fn router<S: TodoService + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/todo", get(list_todos::<S>).post(create_todo::<S>))
        .route("/todo/:id", get(get_todo::<S>).put(update_todo::<S>).delete(delete_todo::<S>))
        .with_state(state)
}

/// Paging applies only when both parameters are given.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams { page_index: Option<u32>, page_size: Option<u32> }

async fn list_todos<S: TodoService>(State(state): State<AppState<S>>, params: Result<Query<PageParams>, QueryRejection>) -> Result<Response, ApiError> {
    let Query(params) = params?;
    match (params.page_index, params.page_size) {
        (Some(page_index), Some(page_size)) => {
            let page = state.service.list_page(page_index, page_size).await?;
            Ok(Json(page).into_response())
        }
        _ => Ok(Json(state.service.list_all().await?).into_response()),
    }
}

async fn get_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.get_by_id(id).await?))
}

async fn create_todo<S: TodoService>(State(state): State<AppState<S>>, payload: Result<Json<NewTodo>, JsonRejection>) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(payload) = payload?;
    let todo = state.service.create(payload).await?;
    tracing::info!(id = %todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>, patch: Result<Json<TodoPatch>, JsonRejection>) -> Result<Json<Todo>, ApiError> {
    let id = parse_id(&id)?;
    let Json(patch) = patch?;
    Ok(Json(state.service.update(id, patch).await?))
}

async fn delete_todo<S: TodoService>(State(state): State<AppState<S>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(s: &str) -> Result<TodoId, ApiError> { s.parse::<i64>().map(TodoId).map_err(|_| ApiError::bad_request("invalid id")) }
