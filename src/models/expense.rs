use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An expense row as stored. `money` is in integer minor units (e.g. cents)
/// so report totals stay exact. `spent_on` is the day the money was spent,
/// which is also the key for the daily and monthly reports.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: i32,
    pub user_id: Uuid,
    pub category_id: Option<i32>,
    pub money: i64,
    pub note: Option<String>,
    pub spent_on: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// An expense with its category resolved via LEFT JOIN. `category_id` and
/// `category_name` are both None when the category has been deleted out from
/// under the expense.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpenseWithCategory {
    pub id: i32,
    pub user_id: Uuid,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub money: i64,
    pub note: Option<String>,
    pub spent_on: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub money: i64,
    pub category_id: i32,
    pub date: String, // Format: "YYYY-MM-DD"
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub money: i64,
    pub category_id: i32,
    pub date: String, // Format: "YYYY-MM-DD"
    pub note: Option<String>,
}
