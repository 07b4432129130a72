//! Bearer token authentication for HTTP handlers.
//!
//! [`BearerIdentity`] is an extractor: listing it as a handler argument makes
//! the route require `Authorization: Bearer <token>`. The token is checked
//! through the [`TokenVerifier`](crate::domain::ports::TokenVerifier) port,
//! which also confirms the user still exists.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Error, INVALID_TOKEN_MESSAGE, UserId};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Authenticated caller of a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerIdentity(pub UserId);

impl BearerIdentity {
    /// Identifier of the authenticated user.
    pub fn user_id(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl FromRequest for BearerIdentity {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                debug!("request without a bearer token");
                return Err(Error::unauthorized(INVALID_TOKEN_MESSAGE));
            };
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state.tokens.verify(&token).await.map(BearerIdentity)
        })
    }
}
