//! Book catalog handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::error::Result;
use crate::middleware::AuthenticatedUser;
use crate::models::Book;
use crate::services::BookService;
use crate::state::AppState;

/// Book listing response body.
#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub books: Vec<Book>,
}

/// List the catalog. Requires a session token.
pub async fn list(
    State(state): State<AppState>,
    AuthenticatedUser(_user): AuthenticatedUser,
) -> Result<Json<BooksResponse>> {
    let books = BookService::new(state.pool()).list_books().await?;
    Ok(Json(BooksResponse { books }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use crate::routes::test_support::{lazy_state, send};

    #[tokio::test]
    async fn test_requires_token() {
        let response = send(
            lazy_state(),
            Request::builder().uri("/v1/books").body(Body::empty()).unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
