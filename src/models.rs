use std::fmt;

use chrono::NaiveDateTime;

/// Opaque per-session identifier handed out by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpenseId(pub(crate) u64);

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDateTime,
    pub category: Option<String>,
}

/// The candidate tuple collected by an input (form, CSV row, demo data)
/// before it reaches the store. Every field may still be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: Option<f64>,
    pub date: Option<NaiveDateTime>,
    pub category: Option<String>,
}

impl ExpenseDraft {
    #[cfg(test)]
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDateTime,
        category: Option<&str>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            date: Some(date),
            category: category.map(str::to_string),
        }
    }

    /// Fields that are absent, in form order. `category` is only reported
    /// when `require_category` is set.
    pub fn missing_fields(&self, require_category: bool) -> Vec<Field> {
        let mut missing = Vec::new();
        if self.description.trim().is_empty() {
            missing.push(Field::Description);
        }
        if self.amount.is_none() {
            missing.push(Field::Amount);
        }
        if self.date.is_none() {
            missing.push(Field::Date);
        }
        let has_category = self
            .category
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if require_category && !has_category {
            missing.push(Field::Category);
        }
        missing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    Amount,
    Date,
    Category,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Description => "description",
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Category => "category",
        }
    }
}
