use axum::{
    extract::{Query, State},
    response::Json,
};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::expense::ExpenseWithCategory;
use crate::models::report::{
    DailyReport, DailyReportQuery, MonthlyDetailQuery, MonthlyReport, MonthlyReportQuery,
};
use crate::reporting;
use crate::state::AppState;

// One day's expenses plus their total
pub async fn report_daily(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<DailyReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let day = reporting::parse_day(&query.day).ok_or_else(|| {
        ApiError::InvalidArgument("Invalid day format. Use YYYY-MM-DD.".to_string())
    })?;

    let daily_expenses = sqlx::query_as::<_, ExpenseWithCategory>(
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
        WHERE e.user_id = $1 AND e.spent_on = $2
        ORDER BY e.created_at DESC
        "#,
    )
    .bind(user.id)
    .bind(day)
    .fetch_all(&state.db)
    .await?;

    let total_money = reporting::total_money(&daily_expenses);

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": DailyReport {
            daily_expenses,
            total_money
        }
    })))
}

// One calendar month, merged into one entry per category
pub async fn report_monthly(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let date = reporting::parse_day(&query.date).ok_or_else(|| {
        ApiError::InvalidArgument("Invalid date format. Use YYYY-MM-DD.".to_string())
    })?;
    let (from_date, to_date) = reporting::month_range(date);

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
        WHERE e.user_id = $1 AND e.spent_on >= $2 AND e.spent_on <= $3
        ORDER BY e.spent_on ASC, e.created_at ASC
        "#,
    )
    .bind(user.id)
    .bind(from_date)
    .bind(to_date)
    .fetch_all(&state.db)
    .await?;

    // Total over the full month, then one merged entry per category.
    let total_money = reporting::total_money(&expenses);
    let monthly_expenses = reporting::group_by_category(expenses);

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": MonthlyReport {
            monthly_expenses,
            total_money
        }
    })))
}

// The month's expenses for a single category
pub async fn report_monthly_detail(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<MonthlyDetailQuery>,
) -> Result<Json<Value>, ApiError> {
    let date = reporting::parse_day(&query.date).ok_or_else(|| {
        ApiError::InvalidArgument("Invalid date format. Use YYYY-MM-DD.".to_string())
    })?;
    let (from_date, to_date) = reporting::month_range(date);

    // A missing or unparseable category id selects the uncategorized group
    // instead of failing, matching how the grouped report keys them.
    let category_id: Option<i32> = query
        .category_id
        .as_deref()
        .and_then(|raw| raw.trim().parse().ok());

    let expenses = match category_id {
        Some(category_id) => {
            sqlx::query_as::<_, ExpenseWithCategory>(
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
                    AND e.category_id = $2
                    AND e.spent_on >= $3
                    AND e.spent_on <= $4
                ORDER BY e.spent_on ASC, e.created_at ASC
                "#,
            )
            .bind(user.id)
            .bind(category_id)
            .bind(from_date)
            .bind(to_date)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as::<_, ExpenseWithCategory>(
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
                    AND e.category_id IS NULL
                    AND e.spent_on >= $2
                    AND e.spent_on <= $3
                ORDER BY e.spent_on ASC, e.created_at ASC
                "#,
            )
            .bind(user.id)
            .bind(from_date)
            .bind(to_date)
            .fetch_all(&state.db)
            .await?
        }
    };

    Ok(Json(json!({
        "success": true,
        "message": "",
        "data": expenses
    })))
}
