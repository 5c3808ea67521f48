use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::database::Database;
use crate::error::ApiError;
use crate::models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use crate::state::AppState;

/// Resolve a category only if it exists and belongs to `user_id`.
///
/// Expense create and update call this before writing; a category id that
/// exists but belongs to another user fails the same way as one that does
/// not exist at all.
pub async fn find_owned_category(
    db: &Database,
    user_id: Uuid,
    category_id: i32,
) -> Result<Category, ApiError> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    category.ok_or_else(|| ApiError::InvalidArgument("Category not found.".to_string()))
}

// Get all categories for the signed-in user
pub async fn get_all_categories(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": categories
    })))
}

pub async fn get_category_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let category =
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1 AND user_id = $2")
            .bind(category_id)
            .bind(user.id)
            .fetch_optional(&state.db)
            .await?;

    match category {
        Some(category) => Ok(Json(json!({
            "success": true,
            "message": "",
            "data": category
        }))),
        None => Err(ApiError::NotFound("Category not found.".to_string())),
    }
}

pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidArgument(
            "Category name is required.".to_string(),
        ));
    }

    let existing_category = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 AND name = $2",
    )
    .bind(user.id)
    .bind(name)
    .fetch_optional(&state.db)
    .await?;

    if existing_category.is_some() {
        return Err(ApiError::Conflict(
            "A category with that name already exists.".to_string(),
        ));
    }

    let new_category = sqlx::query_as::<_, Category>(
        "INSERT INTO categories (user_id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(user.id)
    .bind(name)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Category created.",
        "data": new_category
    })))
}

pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<i32>,
    Json(payload): Json<UpdateCategoryRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidArgument(
            "Category name is required.".to_string(),
        ));
    }

    let duplicate_category = sqlx::query_as::<_, Category>(
        "SELECT * FROM categories WHERE user_id = $1 AND name = $2 AND id != $3",
    )
    .bind(user.id)
    .bind(name)
    .bind(category_id)
    .fetch_optional(&state.db)
    .await?;

    if duplicate_category.is_some() {
        return Err(ApiError::Conflict(
            "A category with that name already exists.".to_string(),
        ));
    }

    let updated_category = sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $1, updated_at = NOW() WHERE id = $2 AND user_id = $3 RETURNING *",
    )
    .bind(name)
    .bind(category_id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    match updated_category {
        Some(category) => Ok(Json(json!({
            "success": true,
            "message": "Category updated.",
            "data": category
        }))),
        None => Err(ApiError::NotFound("Category not found.".to_string())),
    }
}

/// Expenses referencing the deleted category keep their rows; the foreign
/// key sets their category to NULL so they show up as uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let deleted_category = sqlx::query_as::<_, Category>(
        "DELETE FROM categories WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(category_id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    match deleted_category {
        Some(category) => Ok(Json(json!({
            "success": true,
            "message": "Category deleted.",
            "data": category
        }))),
        None => Err(ApiError::NotFound("Category not found.".to_string())),
    }
}
