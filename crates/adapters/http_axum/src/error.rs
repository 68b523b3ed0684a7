//! HTTP error response mapping.

use std::str::FromStr;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use shoplist_domain::error::{ShoppingListError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ShoppingListError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(ShoppingListError);

impl From<ShoppingListError> for ApiError {
    fn from(err: ShoppingListError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ShoppingListError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ShoppingListError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ShoppingListError::IllegalTree(err) => (StatusCode::CONFLICT, err.to_string()),
            ShoppingListError::Storage(err) => {
                tracing::error!(error = %err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Parse an identifier taken from a path segment or a request body.
pub(crate) fn parse_id<T: FromStr>(kind: &'static str, value: &str) -> Result<T, ApiError> {
    T::from_str(value).map_err(|_| {
        ApiError::from(ValidationError::InvalidId {
            kind,
            value: value.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shoplist_domain::error::{IllegalTreeError, NotFoundError};
    use shoplist_domain::id::ItemId;

    fn status_of(err: ShoppingListError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn should_map_error_kinds_to_status_codes() {
        assert_eq!(
            status_of(ValidationError::AmbiguousPlacement.into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(
                NotFoundError {
                    entity: "Item",
                    id: "x".into()
                }
                .into()
            ),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(
                IllegalTreeError {
                    item: "a".into(),
                    parent: "b".into()
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ShoppingListError::Storage("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn should_reject_malformed_id() {
        let result = parse_id::<ItemId>("item", "not-a-uuid");
        let status = result.unwrap_err().into_response().status();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
