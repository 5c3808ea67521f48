//! Pure date and aggregation helpers behind the report endpoints.
//!
//! Everything here works on already-fetched, already-owner-scoped rows;
//! nothing touches the database.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use crate::models::expense::ExpenseWithCategory;

/// Parse a `YYYY-MM-DD` request parameter into the same day-granularity
/// representation that `spent_on` is stored with. Used on both the write
/// path and the report path so range boundaries always line up.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Inclusive first and last day of the calendar month containing `date`.
pub fn month_range(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let year = date.year();
    let month = date.month();

    let from = NaiveDate::from_ymd_opt(year, month, 1).unwrap();

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let to = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap()
        - chrono::Duration::days(1);

    (from, to)
}

/// Sum of `money` over the given expenses. Empty input sums to 0.
pub fn total_money(expenses: &[ExpenseWithCategory]) -> i64 {
    expenses.iter().map(|expense| expense.money).sum()
}

/// Collapse expenses into one entry per distinct category.
///
/// The grouping key is the category id, not its name; expenses whose
/// category no longer resolves all land in the `None` group. Each output
/// entry carries the group's summed `money` while every other field comes
/// from the last expense seen for that category. Output order is the order
/// in which each category was first encountered.
pub fn group_by_category(expenses: Vec<ExpenseWithCategory>) -> Vec<ExpenseWithCategory> {
    let mut seen_order: Vec<Option<i32>> = Vec::new();
    let mut groups: HashMap<Option<i32>, ExpenseWithCategory> = HashMap::new();

    for expense in expenses {
        let key = expense.category_id;

        match groups.remove(&key) {
            Some(previous) => {
                let mut merged = expense;
                merged.money += previous.money;
                groups.insert(key, merged);
            }
            None => {
                seen_order.push(key);
                groups.insert(key, expense);
            }
        }
    }

    seen_order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn expense(
        id: i32,
        category_id: Option<i32>,
        money: i64,
        day: u32,
    ) -> ExpenseWithCategory {
        ExpenseWithCategory {
            id,
            user_id: Uuid::nil(),
            category_id,
            category_name: category_id.map(|c| format!("category {c}")),
            money,
            note: Some(format!("note {id}")),
            spent_on: date(2025, 6, day),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn parse_day_accepts_iso_dates() {
        assert_eq!(parse_day("2025-06-15"), Some(date(2025, 6, 15)));
        assert_eq!(parse_day(" 2025-06-15 "), Some(date(2025, 6, 15)));
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert_eq!(parse_day(""), None);
        assert_eq!(parse_day("15/06/2025"), None);
        assert_eq!(parse_day("2025-13-01"), None);
        assert_eq!(parse_day("2025-02-30"), None);
    }

    #[test]
    fn month_range_contains_its_input() {
        for day in [1, 15, 28] {
            let d = date(2025, 2, day);
            let (from, to) = month_range(d);
            assert!(from <= d && d <= to);
        }
    }

    #[test]
    fn month_range_spans_whole_month() {
        let (from, to) = month_range(date(2025, 6, 15));
        assert_eq!(from, date(2025, 6, 1));
        assert_eq!(to, date(2025, 6, 30));
    }

    #[test]
    fn month_range_handles_december() {
        let (from, to) = month_range(date(2024, 12, 31));
        assert_eq!(from, date(2024, 12, 1));
        assert_eq!(to, date(2024, 12, 31));
    }

    #[test]
    fn month_range_handles_leap_february() {
        let (_, to) = month_range(date(2024, 2, 10));
        assert_eq!(to, date(2024, 2, 29));

        let (_, to) = month_range(date(2025, 2, 10));
        assert_eq!(to, date(2025, 2, 28));
    }

    #[test]
    fn total_money_of_empty_is_zero() {
        assert_eq!(total_money(&[]), 0);
    }

    #[test]
    fn total_money_is_order_independent() {
        let mut expenses = vec![
            expense(1, Some(1), 100, 3),
            expense(2, Some(2), -40, 5),
            expense(3, None, 7, 9),
        ];
        let forward = total_money(&expenses);
        expenses.reverse();
        assert_eq!(total_money(&expenses), forward);
        assert_eq!(forward, 67);
    }

    #[test]
    fn total_money_splits_across_concatenation() {
        let left = vec![expense(1, Some(1), 100, 3), expense(2, Some(1), 50, 4)];
        let right = vec![expense(3, Some(2), 30, 5)];
        let mut all = left.clone();
        all.extend(right.clone());
        assert_eq!(total_money(&all), total_money(&left) + total_money(&right));
    }

    #[test]
    fn grouping_produces_one_entry_per_distinct_category() {
        let groups = group_by_category(vec![
            expense(1, Some(1), 100, 3),
            expense(2, Some(2), 30, 15),
            expense(3, Some(1), 50, 20),
            expense(4, None, 5, 21),
            expense(5, None, 5, 22),
        ]);
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn grouping_preserves_the_overall_total() {
        let expenses = vec![
            expense(1, Some(1), 100, 3),
            expense(2, Some(2), 30, 15),
            expense(3, Some(1), 50, 20),
            expense(4, None, 7, 21),
        ];
        let total = total_money(&expenses);
        let groups = group_by_category(expenses);
        assert_eq!(total_money(&groups), total);
    }

    #[test]
    fn grouping_sums_money_and_keeps_last_record_fields() {
        let groups = group_by_category(vec![
            expense(1, Some(1), 100, 3),
            expense(2, Some(1), 50, 20),
        ]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].money, 150);
        // Non-money fields come from the record seen last.
        assert_eq!(groups[0].id, 2);
        assert_eq!(groups[0].note.as_deref(), Some("note 2"));
        assert_eq!(groups[0].spent_on, date(2025, 6, 20));
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let groups = group_by_category(vec![
            expense(1, Some(9), 1, 1),
            expense(2, Some(4), 1, 2),
            expense(3, None, 1, 3),
            expense(4, Some(9), 1, 4),
            expense(5, Some(4), 1, 5),
        ]);

        let keys: Vec<Option<i32>> = groups.iter().map(|g| g.category_id).collect();
        assert_eq!(keys, vec![Some(9), Some(4), None]);
    }

    #[test]
    fn grouping_collects_unresolved_categories_under_none() {
        let groups = group_by_category(vec![
            expense(1, None, 10, 1),
            expense(2, None, 20, 2),
        ]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category_id, None);
        assert_eq!(groups[0].category_name, None);
        assert_eq!(groups[0].money, 30);
    }

    // Worked monthly example: X on day 3 and 20, Y on day 15.
    #[test]
    fn monthly_report_example() {
        let expenses = vec![
            expense(1, Some(1), 100, 3),
            expense(2, Some(1), 50, 20),
            expense(3, Some(2), 30, 15),
        ];

        assert_eq!(total_money(&expenses), 180);

        let groups = group_by_category(expenses);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category_id, Some(1));
        assert_eq!(groups[0].money, 150);
        assert_eq!(groups[1].category_id, Some(2));
        assert_eq!(groups[1].money, 30);
    }
}
