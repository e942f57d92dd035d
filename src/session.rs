use chrono::NaiveDateTime;

use crate::error::ExpenseError;
use crate::importer::parse_amount;
use crate::models::{Expense, ExpenseDraft};
use crate::reports::{ExpenseReport, SortKey};
use crate::store::{EntryPolicy, ExpenseStore};

/// One user action against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetDescription(String),
    /// Raw amount text; unparseable input leaves the amount absent.
    SetAmount(String),
    SetDate(Option<NaiveDateTime>),
    SetCategory(Option<String>),
    ChangeSort(SortKey),
    Submit,
}

#[derive(Debug)]
pub enum Outcome {
    Updated,
    Added(Expense),
    Rejected(ExpenseError),
}

pub struct Transition {
    pub state: Session,
    pub outcome: Outcome,
}

/// The whole mutable state of a tracking session: the store, the form draft
/// being filled in, and the selected sort key.
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: ExpenseStore,
    draft: ExpenseDraft,
    sort_key: SortKey,
}

impl Session {
    pub fn new(policy: EntryPolicy, sort_key: SortKey) -> Self {
        Self {
            store: ExpenseStore::new(policy),
            draft: ExpenseDraft::default(),
            sort_key,
        }
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.store
    }

    pub fn draft(&self) -> &ExpenseDraft {
        &self.draft
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn report(&self) -> ExpenseReport<'_> {
        ExpenseReport::build(self.store.records(), self.sort_key)
    }

    pub fn apply(mut self, command: Command) -> Transition {
        let outcome = match command {
            Command::SetDescription(text) => {
                self.draft.description = text;
                Outcome::Updated
            }
            Command::SetAmount(text) => {
                self.draft.amount = parse_amount(&text);
                Outcome::Updated
            }
            Command::SetDate(date) => {
                self.draft.date = date;
                Outcome::Updated
            }
            Command::SetCategory(category) => {
                self.draft.category = category;
                Outcome::Updated
            }
            Command::ChangeSort(key) => {
                log::debug!("sort key {} -> {}", self.sort_key, key);
                self.sort_key = key;
                Outcome::Updated
            }
            Command::Submit => match self.store.append(self.draft.clone()) {
                Ok(expense) => {
                    let expense = expense.clone();
                    self.draft = ExpenseDraft::default();
                    Outcome::Added(expense)
                }
                Err(e) => Outcome::Rejected(e),
            },
        };
        Transition {
            state: self,
            outcome,
        }
    }

    /// Apply commands in order, keeping every outcome.
    pub fn replay(self, commands: impl IntoIterator<Item = Command>) -> (Session, Vec<Outcome>) {
        let mut state = self;
        let mut outcomes = Vec::new();
        for command in commands {
            let t = state.apply(command);
            state = t.state;
            outcomes.push(t.outcome);
        }
        (state, outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(y, m, d).and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    fn entry(desc: &str, amount: &str, when: Option<NaiveDateTime>, cat: &str) -> Vec<Command> {
        vec![
            Command::SetDescription(desc.into()),
            Command::SetAmount(amount.into()),
            Command::SetDate(when),
            Command::SetCategory(Some(cat.into())),
            Command::Submit,
        ]
    }

    #[test]
    fn test_lunch_and_bus_on_one_day() {
        let mut commands = entry("Lunch", "12000", date(2024, 5, 1), "Хүнс");
        commands.extend(entry("Bus", "2000", date(2024, 5, 1), "Тээвэр"));
        let (session, outcomes) = Session::default().replay(commands);

        assert_eq!(
            outcomes.iter().filter(|o| matches!(o, Outcome::Added(_))).count(),
            2
        );
        let report = session.report();
        assert_eq!(report.total, 14000.0);
        let cats: Vec<(&str, f64)> = report
            .categories
            .iter()
            .map(|c| (c.name.as_str(), c.total))
            .collect();
        assert_eq!(cats, vec![("Хүнс", 12000.0), ("Тээвэр", 2000.0)]);
        assert_eq!(report.days.len(), 1);
        assert_eq!(report.days[0].expenses.len(), 2);
    }

    #[test]
    fn test_sort_change_reorders_view_only() {
        let mut commands = entry("cheap", "5000", date(2024, 5, 1), "x");
        commands.extend(entry("dear", "9000", date(2024, 5, 2), "x"));
        commands.push(Command::ChangeSort(SortKey::AmountAsc));
        let (session, _) = Session::default().replay(commands);

        let amounts: Vec<f64> = session.report().ordered.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![5000.0, 9000.0]);

        let session = session.apply(Command::ChangeSort(SortKey::AmountDesc)).state;
        let amounts: Vec<f64> = session.report().ordered.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![9000.0, 5000.0]);
        assert_eq!(session.store().records()[0].description, "cheap");
    }

    #[test]
    fn test_empty_amount_is_rejected_and_draft_kept() {
        let commands = entry("Lunch", "", date(2024, 5, 1), "Хүнс");
        let (session, outcomes) = Session::default().replay(commands);
        assert!(matches!(
            outcomes.last(),
            Some(Outcome::Rejected(ExpenseError::MissingField(_)))
        ));
        assert_eq!(session.store().len(), 0);
        assert_eq!(session.draft().description, "Lunch");
        assert_eq!(session.draft().category.as_deref(), Some("Хүнс"));
    }

    #[test]
    fn test_successful_submit_clears_draft() {
        let (session, outcomes) =
            Session::default().replay(entry("Lunch", "12,000", date(2024, 5, 1), "Хүнс"));
        match outcomes.last() {
            Some(Outcome::Added(e)) => assert_eq!(e.amount, 12000.0),
            other => panic!("expected Added, got {other:?}"),
        }
        assert_eq!(session.draft(), &ExpenseDraft::default());
        assert_eq!(session.store().len(), 1);
    }

    #[test]
    fn test_non_numeric_amount_counts_as_missing() {
        let (session, outcomes) =
            Session::default().replay(entry("Lunch", "abc", date(2024, 5, 1), "Хүнс"));
        match outcomes.last() {
            Some(Outcome::Rejected(ExpenseError::MissingField(fields))) => {
                assert_eq!(fields, &vec![crate::models::Field::Amount]);
            }
            other => panic!("expected MissingField, got {other:?}"),
        }
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_replay_is_deterministic() {
        let mut commands = entry("a", "1", date(2024, 1, 1), "x");
        commands.extend(entry("b", "2", date(2024, 1, 2), "y"));
        commands.push(Command::ChangeSort(SortKey::DateAsc));

        let (one, _) = Session::default().replay(commands.clone());
        let (two, _) = Session::default().replay(commands);
        assert_eq!(one.store().records(), two.store().records());
        assert_eq!(one.sort_key(), two.sort_key());
    }
}
