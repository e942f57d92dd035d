use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, Result};
use crate::models::{Expense, ExpenseDraft, ExpenseId};

/// Which amounts the store accepts once the field is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    #[default]
    Any,
    NonNegative,
    Positive,
}

impl AmountPolicy {
    pub fn allows(&self, amount: f64) -> bool {
        match self {
            AmountPolicy::Any => true,
            AmountPolicy::NonNegative => amount >= 0.0,
            AmountPolicy::Positive => amount > 0.0,
        }
    }
}

impl fmt::Display for AmountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AmountPolicy::Any => "any",
            AmountPolicy::NonNegative => "non_negative",
            AmountPolicy::Positive => "positive",
        };
        f.write_str(name)
    }
}

/// Validation rules applied by [`ExpenseStore::append`] on top of the
/// required-field check.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryPolicy {
    pub require_category: bool,
    pub amount: AmountPolicy,
    /// Closed category set. `None` accepts any label.
    pub allowed_categories: Option<Vec<String>>,
}

impl Default for EntryPolicy {
    fn default() -> Self {
        Self {
            require_category: true,
            amount: AmountPolicy::Any,
            allowed_categories: None,
        }
    }
}

/// Append-only list of the session's expenses, in entry order.
#[derive(Debug, Clone)]
pub struct ExpenseStore {
    records: Vec<Expense>,
    next_id: u64,
    policy: EntryPolicy,
}

impl Default for ExpenseStore {
    fn default() -> Self {
        Self::new(EntryPolicy::default())
    }
}

impl ExpenseStore {
    pub fn new(policy: EntryPolicy) -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            policy,
        }
    }

    pub fn records(&self) -> &[Expense] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validate a draft and append it as a new record. On error the store is
    /// left untouched.
    pub fn append(&mut self, draft: ExpenseDraft) -> Result<&Expense> {
        let missing = draft.missing_fields(self.policy.require_category);
        let (true, Some(amount), Some(date)) = (missing.is_empty(), draft.amount, draft.date)
        else {
            log::debug!("rejected draft, missing {missing:?}");
            return Err(ExpenseError::MissingField(missing));
        };

        if !self.policy.amount.allows(amount) {
            return Err(ExpenseError::AmountRejected {
                amount,
                policy: self.policy.amount,
            });
        }

        // A blank label only gets here when categories are optional.
        let category = draft.category.filter(|c| !c.trim().is_empty());
        if let (Some(allowed), Some(cat)) = (&self.policy.allowed_categories, &category) {
            if !allowed.iter().any(|a| a == cat.trim()) {
                return Err(ExpenseError::UnknownCategory(cat.clone()));
            }
        }

        let id = ExpenseId(self.next_id);
        self.next_id += 1;

        self.records.push(Expense {
            id,
            description: draft.description,
            amount,
            date,
            category,
        });
        log::info!("added expense {id} ({amount})");
        Ok(&self.records[self.records.len() - 1])
    }
}
