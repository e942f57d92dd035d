use std::path::Path;

use chrono::{Local, NaiveDateTime};

use crate::cli::report;
use crate::error::{ExpenseError, Result};
use crate::importer::{read_csv_file, ImportBatch};
use crate::reports::{ExpenseReport, SortKey};
use crate::settings::{load_settings, Settings};
use crate::store::ExpenseStore;

/// Rows that did not make it into the store, with their CSV line numbers.
pub struct Rejections(pub Vec<(usize, ExpenseError)>);

/// Feed a parsed batch through the store. Parse errors and store rejections
/// are collected together, ordered by line.
pub fn load_batch(store: &mut ExpenseStore, batch: ImportBatch) -> Rejections {
    let mut rejected = batch.errors;
    for (line, draft) in batch.drafts {
        if let Err(e) = store.append(draft) {
            rejected.push((line, e));
        }
    }
    rejected.sort_by_key(|(line, _)| *line);
    Rejections(rejected)
}

/// User-facing text for a rejected row, using the configured labels for
/// missing fields.
pub fn describe(settings: &Settings, err: &ExpenseError) -> String {
    match err {
        ExpenseError::MissingField(fields) => settings.labels.missing_message(fields),
        other => other.to_string(),
    }
}

pub fn summarize_file(
    path: &Path,
    settings: &Settings,
    now: NaiveDateTime,
) -> Result<(ExpenseStore, Rejections)> {
    let batch = read_csv_file(path, now)?;
    let mut store = ExpenseStore::new(settings.entry_policy());
    let rejected = load_batch(&mut store, batch);
    log::info!(
        "summarized {}: {} accepted, {} rejected",
        path.display(),
        store.len(),
        rejected.0.len()
    );
    Ok((store, rejected))
}

pub fn run(file: &str, sort: Option<SortKey>) -> Result<()> {
    let settings = load_settings();
    let sort_key = sort.unwrap_or(settings.default_sort);
    let (store, rejected) = summarize_file(Path::new(file), &settings, Local::now().naive_local())?;

    for (line, err) in &rejected.0 {
        eprintln!("Skipping line {line}: {}", describe(&settings, err));
    }

    report::print(&store_report(&store, sort_key), &settings);
    Ok(())
}

fn store_report(store: &ExpenseStore, sort_key: SortKey) -> ExpenseReport<'_> {
    ExpenseReport::build(store.records(), sort_key)
}
