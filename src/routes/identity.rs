use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

/// Header carrying the authenticated caller's user id.
///
/// Session handling and token verification live in the surrounding
/// gateway; by the time a request reaches this service the header is
/// authoritative.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Required caller identity extracted from [`USER_ID_HEADER`].
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Uuid);

impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?;

        parse_user_id(value).map(Self)
    }
}

/// Optional caller identity for read endpoints that personalize their
/// response when the header is present.
#[derive(Debug, Clone, Copy)]
pub struct MaybeCallerId(pub Option<Uuid>);

impl<S> FromRequestParts<S> for MaybeCallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get(USER_ID_HEADER) {
            Some(value) => parse_user_id(value).map(|id| Self(Some(id))),
            None => Ok(Self(None)),
        }
    }
}

fn parse_user_id(value: &axum::http::HeaderValue) -> Result<Uuid, AppError> {
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.parse::<Uuid>().ok())
        .ok_or_else(|| AppError::BadRequest(format!("invalid {USER_ID_HEADER} header")))
}
