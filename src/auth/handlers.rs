use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            is_valid_email, LoginRequest, MeResponse, PublicUser, RegisterRequest, TokenResponse,
        },
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{CreateUserError, User},
    },
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

fn token_response(state: &AppState, user: User) -> ApiResult<TokenResponse> {
    let keys = JwtKeys::from_ref(state);
    let access_token = keys.sign(user.id, &user.email)?;
    Ok(TokenResponse::bearer(
        access_token,
        PublicUser {
            id: user.id,
            email: user.email,
            name: user.name,
        },
    ))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    // Cheap pre-check for a friendly error; the unique constraint in the
    // store is what actually guarantees no duplicate sneaks in between
    // this check and the insert.
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::EmailTaken);
    }

    let hash = hash_password(&payload.password)?;

    let user = User::create(&state.db, &payload.email, &hash, payload.name.as_deref())
        .await
        .map_err(|e| match e {
            CreateUserError::DuplicateEmail => {
                warn!(email = %payload.email, "registration lost duplicate race");
                ApiError::EmailTaken
            }
            CreateUserError::Database(e) => ApiError::Internal(e.into()),
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(token_response(&state, user)?))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    // Unknown email and wrong password must be indistinguishable.
    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    // Checked after the password so only valid credentials can learn
    // whether the account is deactivated.
    if !user.is_active {
        warn!(user_id = %user.id, "login on inactive account");
        return Err(ApiError::AccountInactive);
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(token_response(&state, user)?))
}

#[instrument(skip_all)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    })
}
