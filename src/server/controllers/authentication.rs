//! OAuth consent flow.
//!
//! ```text
//! frontend                     backend                          Google
//!    │ GET /start_authentication  │                                │
//!    │───────────────────────────▶│ sign state                     │
//!    │◀── {authorizationUrl,state}│                                │
//!    │────────────── consent screen ──────────────────────────────▶│
//!    │◀───────────────────────────── redirect ?code&state ─────────│
//!    │ POST /persist_registration │                                │
//!    │───────────────────────────▶│ verify state, exchange code ──▶│
//!    │                            │ fetch profile ────────────────▶│
//!    │                            │ save registration              │
//!    │◀── {refreshToken,profile}  │                                │
//! ```

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classroom::{ClassroomApi, TeacherProfile};
use crate::error::{ApiError, ClassroomError};
use crate::server::handlers::AppState;
use crate::server::route_paths::auth;
use crate::store::{ClassroomStore, Registration};

use super::Controller;

pub struct AuthenticationController;

impl<C, S> Controller<C, S> for AuthenticationController
where
    C: ClassroomApi + 'static,
    S: ClassroomStore + 'static,
{
    fn register(&self, router: Router<AppState<C, S>>) -> Router<AppState<C, S>> {
        router
            .route(auth::START_AUTHENTICATION, get(start_authentication::<C, S>))
            .route(auth::PERSIST_REGISTRATION, post(persist_registration::<C, S>))
    }
}

/// Response of `GET /start_authentication`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationResponse {
    pub authorization_url: String,
    pub state: String,
}

/// Body of `POST /persist_registration`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub code: String,
    pub state: String,
}

/// Response of `POST /persist_registration`.
///
/// The frontend keeps `refresh_token` and sends it back as the bearer
/// credential on every protected route.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub refresh_token: String,
    pub profile: TeacherProfile,
}

async fn start_authentication<C, S>(
    State(state): State<AppState<C, S>>,
) -> Json<AuthorizationResponse>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let oauth_state = state.state_signer.issue();
    let authorization_url = state.classroom.authorization_url(&oauth_state);

    Json(AuthorizationResponse {
        authorization_url,
        state: oauth_state,
    })
}

async fn persist_registration<C, S>(
    State(state): State<AppState<C, S>>,
    body: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>, ApiError>
where
    C: ClassroomApi,
    S: ClassroomStore,
{
    let Json(request) = body.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    state.state_signer.verify(&request.state)?;

    if request.code.trim().is_empty() {
        return Err(ApiError::InvalidInput("code is required".to_string()));
    }

    let tokens = state.classroom.exchange_code(&request.code).await?;
    let refresh_token = tokens.refresh_token.ok_or_else(|| {
        ClassroomError::InvalidResponse("token exchange returned no refresh token".to_string())
    })?;

    let profile = state.classroom.teacher_profile(&tokens.access_token).await?;
    state
        .store
        .save_registration(&Registration::from(profile.clone()))
        .await?;

    info!(user_id = %profile.id, "teacher registered");

    Ok(Json(RegistrationResponse {
        refresh_token,
        profile,
    }))
}
