use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Expense;

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    AmountDesc,
    AmountAsc,
    #[default]
    DateDesc,
    DateAsc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::DateDesc,
        SortKey::DateAsc,
        SortKey::AmountDesc,
        SortKey::AmountAsc,
    ];

    fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            SortKey::AmountDesc => b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal),
            SortKey::AmountAsc => a.amount.partial_cmp(&b.amount).unwrap_or(Ordering::Equal),
            SortKey::DateDesc => b.date.cmp(&a.date),
            SortKey::DateAsc => a.date.cmp(&b.date),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortKey::AmountDesc => "amount \u{2193}",
            SortKey::AmountAsc => "amount \u{2191}",
            SortKey::DateDesc => "date \u{2193}",
            SortKey::DateAsc => "date \u{2191}",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Derived computations
// ---------------------------------------------------------------------------

/// Order a copy of `records` by `key`. The sort is stable: records with equal
/// keys keep their entry order.
pub fn order_records(records: &[Expense], key: SortKey) -> Vec<&Expense> {
    let mut ordered: Vec<&Expense> = records.iter().collect();
    ordered.sort_by(|a, b| key.compare(a, b));
    ordered
}

pub struct DayGroup<'a> {
    pub day: NaiveDate,
    pub expenses: Vec<&'a Expense>,
}

impl DayGroup<'_> {
    pub fn total(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

/// Bucket an already ordered sequence by calendar day. Groups come out in the
/// order their first member appears; members keep the input order.
pub fn group_by_day<'a>(ordered: &[&'a Expense]) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for &expense in ordered {
        let day = expense.date.date();
        let slot = *index.entry(day).or_insert_with(|| {
            groups.push(DayGroup {
                day,
                expenses: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].expenses.push(expense);
    }

    groups
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
}

impl CategoryTotal {
    /// Percentage of `grand_total` this category accounts for.
    pub fn share(&self, grand_total: f64) -> f64 {
        if grand_total != 0.0 {
            self.total / grand_total * 100.0
        } else {
            0.0
        }
    }
}

/// Sum amounts per category over the full list, in first-seen entry order.
/// Uncategorized records are skipped.
pub fn sum_by_category(records: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for expense in records {
        let Some(name) = expense.category.as_deref() else {
            continue;
        };
        let slot = *index.entry(name).or_insert_with(|| {
            totals.push(CategoryTotal {
                name: name.to_string(),
                total: 0.0,
                count: 0,
            });
            totals.len() - 1
        });
        totals[slot].total += expense.amount;
        totals[slot].count += 1;
    }

    totals
}

pub fn sum_all(records: &[Expense]) -> f64 {
    records.iter().map(|e| e.amount).sum()
}

// ---------------------------------------------------------------------------
// Combined view
// ---------------------------------------------------------------------------

/// Everything the presentation layer renders, rebuilt from scratch per call.
pub struct ExpenseReport<'a> {
    pub sort_key: SortKey,
    pub ordered: Vec<&'a Expense>,
    pub days: Vec<DayGroup<'a>>,
    pub categories: Vec<CategoryTotal>,
    pub total: f64,
}

impl<'a> ExpenseReport<'a> {
    pub fn build(records: &'a [Expense], sort_key: SortKey) -> Self {
        let ordered = order_records(records, sort_key);
        let days = group_by_day(&ordered);
        Self {
            sort_key,
            categories: sum_by_category(records),
            total: sum_all(records),
            ordered,
            days,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
