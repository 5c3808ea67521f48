use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::expense::{
    CreateExpenseRequest, Expense, ExpenseWithCategory, UpdateExpenseRequest,
};
use crate::reporting;
use crate::routes::categories::find_owned_category;
use crate::state::AppState;

// Every query here pairs the caller's id with any client-supplied expense id,
// so one user's ids are useless against another user's rows.

pub async fn get_all_expenses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let expenses = sqlx::query_as::<_, ExpenseWithCategory>(
        r#"
        SELECT
            e.id,
            e.user_id,
            e.category_id,
            c.name as category_name,
            e.money,
            e.note,
            e.spent_on,
            e.created_at,
            e.updated_at
        FROM expenses e
        LEFT JOIN categories c ON e.category_id = c.id
        WHERE e.user_id = $1
        ORDER BY e.spent_on DESC, e.created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": expenses
    })))
}

// A missing or foreign-owned id is not an error here: the response is a
// success envelope with null data, like the list endpoint returning empty.
pub async fn get_expense_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(expense_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let expense = sqlx::query_as::<_, ExpenseWithCategory>(
        r#"
        SELECT
            e.id,
            e.user_id,
            e.category_id,
            c.name as category_name,
            e.money,
            e.note,
            e.spent_on,
            e.created_at,
            e.updated_at
        FROM expenses e
        LEFT JOIN categories c ON e.category_id = c.id
        WHERE e.id = $1 AND e.user_id = $2
        "#,
    )
    .bind(expense_id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": expense
    })))
}

pub async fn create_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<Json<Value>, ApiError> {
    let spent_on = reporting::parse_day(&payload.date).ok_or_else(|| {
        ApiError::InvalidArgument("Invalid date format. Use YYYY-MM-DD.".to_string())
    })?;

    let category = find_owned_category(&state.db, user.id, payload.category_id).await?;

    let new_expense = sqlx::query_as::<_, Expense>(
        "INSERT INTO expenses (user_id, category_id, money, note, spent_on) VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user.id)
    .bind(category.id)
    .bind(payload.money)
    .bind(payload.note.as_deref().map(str::trim))
    .bind(spent_on)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Expense created.",
        "data": new_expense
    })))
}

pub async fn update_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(expense_id): Path<i32>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<Value>, ApiError> {
    let spent_on = reporting::parse_day(&payload.date).ok_or_else(|| {
        ApiError::InvalidArgument("Invalid date format. Use YYYY-MM-DD.".to_string())
    })?;

    let category = find_owned_category(&state.db, user.id, payload.category_id).await?;

    let updated_expense = sqlx::query_as::<_, Expense>(
        r#"
        UPDATE expenses SET
            category_id = $1,
            money = $2,
            note = $3,
            spent_on = $4,
            updated_at = NOW()
        WHERE id = $5 AND user_id = $6
        RETURNING *
        "#,
    )
    .bind(category.id)
    .bind(payload.money)
    .bind(payload.note.as_deref().map(str::trim))
    .bind(spent_on)
    .bind(expense_id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    let updated_expense = updated_expense.ok_or_else(|| {
        ApiError::NotFound("Expense not found or already deleted.".to_string())
    })?;

    // The category was resolved just above, so the response can carry its
    // name without a second round trip.
    let data = ExpenseWithCategory {
        id: updated_expense.id,
        user_id: updated_expense.user_id,
        category_id: updated_expense.category_id,
        category_name: Some(category.name),
        money: updated_expense.money,
        note: updated_expense.note,
        spent_on: updated_expense.spent_on,
        created_at: updated_expense.created_at,
        updated_at: updated_expense.updated_at,
    };

    Ok(Json(json!({
        "success": true,
        "message": "Expense updated.",
        "data": data
    })))
}

pub async fn delete_expense(
    State(state): State<AppState>,
    user: AuthUser,
    Path(expense_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    let deleted_expense = sqlx::query_as::<_, Expense>(
        "DELETE FROM expenses WHERE id = $1 AND user_id = $2 RETURNING *",
    )
    .bind(expense_id)
    .bind(user.id)
    .fetch_optional(&state.db)
    .await?;

    match deleted_expense {
        Some(expense) => Ok(Json(json!({
            "success": true,
            "message": "Expense deleted.",
            "data": expense
        }))),
        None => Err(ApiError::NotFound("Expense not found.".to_string())),
    }
}
