//! User identity extraction.
//!
//! Authentication happens upstream of this service. The authenticating proxy or
//! middleware forwards the verified user id in the `x-user-id` header; requests
//! without a usable id are rejected before any handler runs.

use crate::errors::Error;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user a request acts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| Error::Unauthorized {
                message: format!("missing {USER_ID_HEADER} header"),
            })?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(Self)
            .ok_or_else(|| Error::Unauthorized {
                message: format!("invalid {USER_ID_HEADER} header"),
            })
    }
}
