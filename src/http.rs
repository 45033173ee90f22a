//! The HTTP shell: a single `/query` endpoint wrapping one process-wide
//! `Engine` behind a mutex, plus a `/health` liveness check.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use crate::engine::Engine;
use crate::error::{EngineError, ExecutionError, ParseError, QueryError};
use crate::row::RowMap;
use crate::session;
use crate::value::SqlValue;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<Engine>>,
}

impl AppState {
    pub fn new(engine: Engine) -> Self {
        AppState {
            engine: Arc::new(Mutex::new(engine)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", get(query_endpoint))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({"status": "OK"}))
}

/// `GET /query?sql=...`. One statement per request; statements are
/// serialized through the mutex.
async fn query_endpoint(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let sql = match params.get("sql") {
        Some(sql) => sql,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": "ERROR", "message": "no query provided"})),
            )
        }
    };

    tracing::info!(sql = %sql, "executing query");

    let mut engine = state.engine.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match session::execute(&mut engine, sql) {
        Ok(outcome) => {
            tracing::debug!(rows = outcome.rows.len(), "query succeeded");
            let mut body = Map::new();
            body.insert("status".to_string(), json!("OK"));
            body.insert(
                "data".to_string(),
                Value::Array(outcome.rows.iter().map(row_to_json).collect()),
            );
            if let Some(warning) = outcome.warning {
                body.insert("warning".to_string(), json!(warning));
            }
            (StatusCode::OK, Json(Value::Object(body)))
        }
        Err(err) => {
            let (status, type_name, message) = classify(&err);
            tracing::warn!(error_type = type_name, %message, "query failed");
            (
                status,
                Json(json!({
                    "status": "ERROR",
                    "error": {"type": type_name, "message": message},
                })),
            )
        }
    }
}

/// Maps a `QueryError` to an HTTP status and the error envelope's
/// `{type, message}` pair.
fn classify(err: &QueryError) -> (StatusCode, &'static str, String) {
    match err {
        QueryError::Parse(e) => (StatusCode::BAD_REQUEST, "ParseError", parse_error_message(e)),
        QueryError::Execution(ExecutionError::Engine(engine_err)) => {
            (StatusCode::BAD_REQUEST, engine_err.class_name(), engine_err.to_string())
        }
        QueryError::Execution(e) => (StatusCode::BAD_REQUEST, "ExecutionError", e.to_string()),
    }
}

fn parse_error_message(e: &ParseError) -> String {
    e.to_string()
}

fn row_to_json(row: &RowMap) -> Value {
    let mut obj = Map::new();
    for (key, value) in row.iter() {
        obj.insert(key.clone(), value_to_json(value));
    }
    Value::Object(obj)
}

fn value_to_json(value: &SqlValue) -> Value {
    match value {
        SqlValue::Int(i) => json!(i),
        SqlValue::Float(f) => json!(f),
        SqlValue::Text(s) => json!(s),
        SqlValue::Null => Value::Null,
    }
}
