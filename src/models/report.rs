use serde::{Deserialize, Serialize};

use crate::models::expense::ExpenseWithCategory;

#[derive(Debug, Serialize)]
pub struct DailyReport {
    pub daily_expenses: Vec<ExpenseWithCategory>,
    pub total_money: i64,
}

/// `monthly_expenses` holds one entry per distinct category, with `money`
/// summed across the category's expenses for the month.
#[derive(Debug, Serialize)]
pub struct MonthlyReport {
    pub monthly_expenses: Vec<ExpenseWithCategory>,
    pub total_money: i64,
}

#[derive(Debug, Deserialize)]
pub struct DailyReportQuery {
    pub day: String, // Format: "YYYY-MM-DD"
}

#[derive(Debug, Deserialize)]
pub struct MonthlyReportQuery {
    pub date: String, // Any day inside the target month
}

#[derive(Debug, Deserialize)]
pub struct MonthlyDetailQuery {
    pub date: String,
    pub category_id: Option<String>,
}
