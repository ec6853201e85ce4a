//! Authentication handlers.

use actix_web::{HttpResponse, web};

use blog_core::DomainError;
use blog_core::domain::User;
use blog_shared::dto::{
    AuthResponse, CurrentUserResponse, LoginRequest, RegisterUserRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        role: user.role.to_string(),
    }
}

fn auth_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, user.role)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(AuthResponse {
        success: true,
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
        user: user_response(user),
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .create_user(&req.username, &req.password, state.registration_role)
        .await?;

    Ok(HttpResponse::Created().json(auth_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .authenticate(&req.username, &req.password)
        .await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    Ok(HttpResponse::Ok().json(auth_response(&state, &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    // A valid token for a since-removed account is no longer a session.
    let user = state
        .accounts
        .find_by_id(identity.user_id)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => {
                AppError::Unauthorized("User no longer exists".to_string())
            }
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(CurrentUserResponse {
        success: true,
        user: user_response(&user),
    }))
}
