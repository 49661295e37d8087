//! HTTP handlers for the authentication endpoints.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::AppJson,
    api::models::auth::{
        LoginRequest, LoginResponse, MessageResponse, SessionInfo, SessionResponse, UserProfile,
    },
    auth::{BearerToken, CurrentUser},
    db::handlers::Users,
    errors::{Error, Result},
    supabase::AuthError,
    types::{UserId, abbrev_uuid},
};

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Profile lookup failed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let (Some(email), Some(password)) = (body.email.as_deref(), body.password.as_deref()) else {
        return Err(missing_credentials());
    };
    if email.is_empty() || password.is_empty() {
        return Err(missing_credentials());
    }

    let email = email.trim().to_lowercase();
    let session = state
        .supabase
        .sign_in_with_password(&email, password)
        .await
        .map_err(|err| {
            match &err {
                AuthError::InvalidCredentials => tracing::debug!("Sign-in rejected"),
                other => tracing::warn!("Sign-in failed upstream: {other}"),
            }
            // The caller learns nothing beyond "rejected", whatever went wrong
            Error::Unauthenticated {
                message: Some("Credenciais inválidas".to_string()),
            }
        })?;

    let user = fetch_profile(&state, session.user.id).await?;

    Ok(Json(LoginResponse {
        user,
        session: SessionInfo::from(session),
    }))
}

/// Invalidate the caller's session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logout acknowledged", body = MessageResponse),
        (status = 401, description = "Missing bearer token"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>> {
    // Provider-side failure is not the caller's problem; logout reports
    // success either way, so calling it twice also succeeds twice.
    if let Err(err) = state.supabase.sign_out(&token).await {
        tracing::warn!("Sign-out failed upstream: {err}");
    }

    Ok(Json(MessageResponse::new("Logout realizado com sucesso")))
}

/// Resolve the caller's token to a profile
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Session is valid", body = SessionResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 500, description = "Profile lookup failed"),
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn session(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SessionResponse>> {
    let user = fetch_profile(&state, user.id).await?;
    Ok(Json(SessionResponse { user }))
}

fn missing_credentials() -> Error {
    Error::BadRequest {
        message: "Email e senha são obrigatórios".to_string(),
    }
}

/// Fetches the profile row for an already-authenticated user. Any failure is
/// a server error: the identity provider vouched for the id, so a missing row
/// means the profile table is out of step with it.
async fn fetch_profile(state: &AppState, user_id: UserId) -> Result<UserProfile> {
    let row = Users::new(&state.supabase)
        .get_by_id(user_id)
        .await
        .map_err(|source| Error::Store {
            message: "Erro interno do servidor".to_string(),
            source,
        })?
        .ok_or_else(|| {
            tracing::error!(
                user_id = %abbrev_uuid(&user_id),
                "Profile row missing for authenticated user"
            );
            Error::Internal {
                message: "Erro interno do servidor".to_string(),
            }
        })?;

    Ok(UserProfile::from(row))
}
