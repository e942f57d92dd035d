use chrono::{Duration, Local, NaiveDateTime};

use crate::cli::report;
use crate::cli::summarize::describe;
use crate::error::{ExpenseError, Result};
use crate::reports::SortKey;
use crate::session::{Command, Outcome, Session};
use crate::settings::{load_settings, Settings};

struct DemoExpense {
    days_ago: i64,
    hour: u32,
    description: &'static str,
    amount: f64,
    /// Index into the configured category list.
    category: usize,
}

const EXPENSES: &[DemoExpense] = &[
    DemoExpense { days_ago: 0, hour: 8, description: "Өглөөний кофе", amount: 4500.0, category: 0 },
    DemoExpense { days_ago: 0, hour: 9, description: "Автобус", amount: 1000.0, category: 1 },
    DemoExpense { days_ago: 1, hour: 12, description: "Өдрийн хоол", amount: 12000.0, category: 0 },
    DemoExpense { days_ago: 1, hour: 18, description: "Такси", amount: 8000.0, category: 1 },
    DemoExpense { days_ago: 2, hour: 10, description: "Утасны нэгж", amount: 15000.0, category: 3 },
    DemoExpense { days_ago: 3, hour: 19, description: "Кино", amount: 18000.0, category: 6 },
    DemoExpense { days_ago: 3, hour: 20, description: "Оройн хоол", amount: 25000.0, category: 0 },
    DemoExpense { days_ago: 5, hour: 11, description: "Эмийн сан", amount: 9500.0, category: 4 },
    DemoExpense { days_ago: 6, hour: 9, description: "Сургалтын төлбөр", amount: 120000.0, category: 5 },
    DemoExpense { days_ago: 7, hour: 16, description: "Гутал", amount: 89000.0, category: 7 },
];

const COMMANDS_PER_EXPENSE: usize = 5;
const SUBMIT_OFFSET: usize = COMMANDS_PER_EXPENSE - 1;

/// Commands that enter the demo expenses through the same path as the form,
/// dated relative to `now`.
fn demo_commands(now: NaiveDateTime, settings: &Settings) -> Vec<Command> {
    let mut commands = Vec::new();
    for item in EXPENSES {
        let date = (now - Duration::days(item.days_ago))
            .date()
            .and_hms_opt(item.hour, 0, 0)
            .filter(|d| *d <= now)
            .unwrap_or(now);
        let category = settings
            .categories
            .get(item.category)
            .or_else(|| settings.categories.last())
            .cloned();
        commands.extend([
            Command::SetDescription(item.description.to_string()),
            Command::SetAmount(item.amount.to_string()),
            Command::SetDate(Some(date)),
            Command::SetCategory(category),
            Command::Submit,
        ]);
    }
    commands
}

/// Rejected submits paired with the sample they came from. Each sample
/// ends in exactly one `Submit`.
fn rejections(outcomes: &[Outcome]) -> Vec<(&'static str, &ExpenseError)> {
    outcomes
        .iter()
        .skip(SUBMIT_OFFSET)
        .step_by(COMMANDS_PER_EXPENSE)
        .zip(EXPENSES)
        .filter_map(|(outcome, item)| match outcome {
            Outcome::Rejected(e) => Some((item.description, e)),
            _ => None,
        })
        .collect()
}

pub fn run(sort: Option<SortKey>) -> Result<()> {
    let settings = load_settings();
    let sort_key = sort.unwrap_or(settings.default_sort);
    let session = Session::new(settings.entry_policy(), sort_key);
    let (session, outcomes) = session.replay(demo_commands(Local::now().naive_local(), &settings));

    for (description, err) in rejections(&outcomes) {
        log::warn!("demo expense rejected: {err}");
        eprintln!("Skipping {description}: {}", describe(&settings, err));
    }

    report::print(&session.report(), &settings);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_demo_data_is_all_accepted() {
        let settings = Settings::default();
        let (session, outcomes) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        assert!(outcomes.iter().all(|o| !matches!(o, Outcome::Rejected(_))));
        assert_eq!(session.store().len(), EXPENSES.len());
    }

    #[test]
    fn test_demo_dates_never_in_future() {
        let settings = Settings::default();
        let (session, _) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        assert!(session.store().records().iter().all(|e| e.date <= now()));
    }

    #[test]
    fn test_demo_spans_several_days_and_categories() {
        let settings = Settings::default();
        let (session, _) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        let report = session.report();
        assert!(report.days.len() >= 5);
        assert!(report.categories.len() >= 5);
        let expected: f64 = EXPENSES.iter().map(|e| e.amount).sum();
        assert_eq!(report.total, expected);
    }

    #[test]
    fn test_demo_with_short_category_list_uses_last() {
        let settings = Settings {
            categories: vec!["Food".into(), "Other".into()],
            enforce_categories: true,
            ..Settings::default()
        };
        let (session, outcomes) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        assert!(outcomes.iter().all(|o| !matches!(o, Outcome::Rejected(_))));
        assert_eq!(session.store().len(), EXPENSES.len());
    }

    #[test]
    fn test_rejections_name_each_failed_sample() {
        let settings = Settings {
            categories: vec![],
            ..Settings::default()
        };
        let (session, outcomes) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        assert!(session.store().is_empty());

        let rejected = rejections(&outcomes);
        assert_eq!(rejected.len(), EXPENSES.len());
        assert_eq!(rejected[0].0, EXPENSES[0].description);
        assert!(matches!(rejected[0].1, ExpenseError::MissingField(_)));
        assert!(describe(&settings, rejected[0].1).contains(&settings.labels.category));
    }

    #[test]
    fn test_accepted_demo_has_no_rejections() {
        let settings = Settings::default();
        let (_, outcomes) = Session::new(settings.entry_policy(), SortKey::DateDesc)
            .replay(demo_commands(now(), &settings));
        assert!(rejections(&outcomes).is_empty());
    }
}
