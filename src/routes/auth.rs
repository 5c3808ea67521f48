use axum::{extract::State, response::Json};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::encode_token;
use crate::error::ApiError;
use crate::models::user::{SigninRequest, SignupRequest, User};
use crate::state::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.username.trim().is_empty()
        || payload.email.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(ApiError::InvalidArgument(
            "Username, email and password are required.".to_string(),
        ));
    }

    let existing_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(payload.email.trim())
        .fetch_optional(&state.db)
        .await?;

    if existing_user.is_some() {
        return Err(ApiError::Conflict(
            "Email is already registered.".to_string(),
        ));
    }

    let user_id = Uuid::new_v4();
    let password_hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;

    let new_user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(user_id)
    .bind(payload.username.trim())
    .bind(payload.email.trim())
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Account created.",
        "data": {
            "id": new_user.id,
            "username": new_user.username,
            "email": new_user.email,
            "created_at": new_user.created_at
        }
    })))
}

pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<Json<Value>, ApiError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ApiError::InvalidArgument(
            "Email and password are required.".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(payload.email.trim())
        .fetch_optional(&state.db)
        .await?;

    // One message for both an unknown email and a wrong password.
    let user = user.ok_or_else(|| {
        ApiError::Unauthorized("Email or password is incorrect.".to_string())
    })?;

    if !bcrypt::verify(&payload.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized(
            "Email or password is incorrect.".to_string(),
        ));
    }

    let token = encode_token(user.id, &state.keys.encoding)?;

    Ok(Json(json!({
        "success": true,
        "message": "Signed in.",
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "username": user.username,
                "email": user.email,
                "created_at": user.created_at
            }
        }
    })))
}
