//! Handlers shared by the `/pizzas`, `/orders` and `/deliveries` routers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::store::DocumentQuery;
use crate::types::{Document, Stored};
use crate::Error;

type Rejection = (StatusCode, String);

/// Router for one collection, meant to be nested under `/<collection>`
pub fn router<T: Document>() -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/:id", get(fetch::<T>))
}

/// Create a document
pub async fn create<T: Document>(
    State(state): State<AppState>,
    Json(document): Json<T>,
) -> Result<(StatusCode, Json<Stored<T>>), Rejection> {
    let store = state.store()?;
    let stored = store.insert(document).await.map_err(|e| {
        tracing::error!(collection = T::COLLECTION, error = %e, "Insert failed");
        Rejection::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(stored)))
}

/// List documents matching the query string
pub async fn list<T: Document>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Stored<T>>>, Rejection> {
    let store = state.store()?;
    let query = DocumentQuery::from_pairs(params)?;
    let documents = store.find::<T>(&query).await?;

    Ok(Json(documents))
}

/// Fetch a single document by id
pub async fn fetch<T: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stored<T>>, Rejection> {
    let store = state.store()?;
    let id = Uuid::parse_str(&id)
        .map_err(|_| Error::invalid_request(format!("'{}' is not a valid document id", id)))?;

    store
        .get::<T>(id)
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found(format!("{}/{}", T::COLLECTION, id)).into())
}
