// src/extractors/json.rs

use crate::error::AppError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use tracing::warn;
use validator::Validate;

/// JSON ボディをデシリアライズして検証する Extractor
///
/// 空ボディは `{}` として扱うため、必須項目の欠落は 422 になる。
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        let value = parse_body::<T>(&bytes)?;

        value.validate().map_err(|errors| {
            warn!(error = %errors, "Request validation failed");
            AppError::ValidationFailure(errors)
        })?;

        Ok(ValidatedJson(value))
    }
}

fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, AppError> {
    let body = if bytes.iter().all(u8::is_ascii_whitespace) {
        b"{}".as_slice()
    } else {
        bytes
    };

    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Malformed JSON body");
        AppError::field("body", format!("The request body is not valid JSON: {}", e))
    })
}
