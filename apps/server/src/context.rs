use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Per-request identity, taken from the `x-user-id` header the (out of
/// scope) authentication gateway sets. There is no global user state;
/// every handler receives its own context.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::bad_request("missing x-user-id header"))?;

        Ok(RequestContext {
            user_id: user_id.to_string(),
        })
    }
}
