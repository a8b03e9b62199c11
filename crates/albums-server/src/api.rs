//! Album API handlers.

use crate::AppState;
use albums_db::{Album, AlbumError, NewAlbum};
use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Body message for a missing album, shared by get and delete.
const ALBUM_NOT_FOUND: &str = "album not found";

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("invalid input: {msg}") }),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "message": msg })),
            ApiError::InternalServerError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg }))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an accessor error to an API error.
///
/// Store failures are logged with their cause and reported to the client
/// only as `context`.
fn store_error(context: &'static str) -> impl Fn(AlbumError) -> ApiError {
    move |e| match e {
        AlbumError::NotFound(_) => ApiError::NotFound(ALBUM_NOT_FOUND.to_string()),
        AlbumError::Database(err) => {
            tracing::error!(error = %err, "{}", context);
            ApiError::InternalServerError(context.to_string())
        }
        AlbumError::PriceOutOfRange(price) => {
            tracing::error!(price, "{}: numeric field overflow", context);
            ApiError::InternalServerError(context.to_string())
        }
    }
}

/// Runs one store call on the blocking pool with a pooled connection.
async fn with_connection<T, F>(
    state: Arc<AppState>,
    context: &'static str,
    f: F,
) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Connection) -> Result<T, AlbumError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state.pool.get().map_err(|e| {
            tracing::error!(error = %e, "db connection failed");
            ApiError::InternalServerError(context.to_string())
        })?;

        f(&conn).map_err(store_error(context))
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "task join error");
        ApiError::InternalServerError(context.to_string())
    })?
}

/// Parses a path id.
///
/// Ids are not validated: a value that is not an integer cannot match any
/// stored row and is reported as not found.
fn parse_album_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound(ALBUM_NOT_FOUND.to_string()))
}

/// Handler for `GET /albums`.
pub async fn list_albums_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Album>>, ApiError> {
    let albums = with_connection(state, "database error", albums_db::list_albums).await?;
    Ok(Json(albums))
}

/// Handler for `GET /albums/{id}`.
pub async fn get_album_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Album>, ApiError> {
    let id = parse_album_id(&raw_id)?;
    let album = with_connection(state, "database error", move |conn| {
        albums_db::get_album(conn, id)
    })
    .await?;
    Ok(Json(album))
}

/// Handler for `POST /albums`.
pub async fn create_album_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<NewAlbum>, JsonRejection>,
) -> Result<(StatusCode, Json<Album>), ApiError> {
    let Json(new_album) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected album payload");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let album = with_connection(state, "failed to insert album", move |conn| {
        albums_db::create_album(conn, &new_album)
    })
    .await?;

    tracing::info!(album_id = album.id, "album created");
    Ok((StatusCode::CREATED, Json(album)))
}

/// Handler for `DELETE /albums/{id}`.
pub async fn delete_album_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_album_id(&raw_id)?;
    with_connection(state, "failed to delete album", move |conn| {
        albums_db::delete_album(conn, id)
    })
    .await?;

    tracing::info!(album_id = id, "album deleted");
    Ok(Json(json!({ "message": "album deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn not_found_uses_message_body() {
        let response = ApiError::NotFound(ALBUM_NOT_FOUND.to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "album not found");
    }

    #[tokio::test]
    async fn store_failure_hides_cause() {
        let err = store_error("failed to insert album")(AlbumError::Database(
            rusqlite::Error::QueryReturnedNoRows,
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "failed to insert album");
    }

    #[tokio::test]
    async fn price_overflow_is_a_store_failure() {
        let response =
            store_error("failed to insert album")(AlbumError::PriceOutOfRange(1e308)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "failed to insert album");
    }

    #[tokio::test]
    async fn bad_request_uses_error_body() {
        let response = ApiError::BadRequest("missing field `price`".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "invalid input: missing field `price`"
        );
    }

    #[test]
    fn non_numeric_ids_are_not_found() {
        assert!(matches!(parse_album_id("abc"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_album_id("1.5"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_album_id(" 1"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_album_id("1 "), Err(ApiError::NotFound(_))));
        assert_eq!(parse_album_id("12").unwrap(), 12);
        assert_eq!(parse_album_id("-3").unwrap(), -3);
    }
}
