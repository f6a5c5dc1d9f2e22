//! Custom extractors for the HTTP server.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Extractor for JSON request bodies.
///
/// Behaves like [`axum::Json`] but reports rejections with the same
/// `{"detail": ...}` body as every other error: a body that parses but does
/// not fit the target type is a 422, unparseable JSON a 400, and a missing
/// `application/json` content type a 415.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection.into()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => AppError::Validation(message),
            JsonRejection::MissingJsonContentType(_) => AppError::UnsupportedMediaType(message),
            _ => AppError::BadRequest(message),
        }
    }
}
