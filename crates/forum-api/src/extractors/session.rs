//! Session extractors
//!
//! The session token travels in the session cookie or as a bearer token.
//! [`MaybeAuthUser`] authorizes the request; [`AuthUser`] also requires it to
//! be authenticated.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization, Cookie},
    TypedHeader,
};
use forum_core::ActorId;
use forum_service::{AccessGuard, AuthDecision, Identity};

use crate::response::ApiError;
use crate::state::AppState;

/// Raw session token, if the request carries one
#[derive(Debug, Clone, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Bearer header wins over the cookie
        if let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        {
            return Ok(Self(Some(bearer.token().to_string())));
        }

        let app_state = AppState::from_ref(state);
        let token = TypedHeader::<Cookie>::from_request_parts(parts, state)
            .await
            .ok()
            .and_then(|TypedHeader(cookie)| {
                cookie
                    .get(&app_state.session().cookie_name)
                    .map(str::to_string)
            })
            .filter(|token| !token.is_empty());

        Ok(Self(token))
    }
}

/// Identity of the caller; anonymous when there is no live session
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Identity);

impl MaybeAuthUser {
    pub fn actor_id(&self) -> Option<ActorId> {
        self.0.actor_id()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = SessionToken::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        let identity = AccessGuard::new(app_state.service_context())
            .authorize(token.as_deref())
            .await?;

        Ok(Self(identity))
    }
}

/// Authenticated caller. Anonymous requests are redirected to the login page.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub actor_id: ActorId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = SessionToken::from_request_parts(parts, state).await?;
        let app_state = AppState::from_ref(state);

        match AccessGuard::new(app_state.service_context())
            .require_authenticated(token.as_deref())
            .await?
        {
            AuthDecision::Allowed(actor_id) => Ok(Self { actor_id }),
            AuthDecision::Rejected(_) => Err(ApiError::LoginRequired {
                cookie_name: app_state.session().cookie_name.clone(),
            }),
        }
    }
}
