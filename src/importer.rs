use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ExpenseError, Result};
use crate::models::ExpenseDraft;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Coerce user text to an amount. Thousands separators, spaces and currency
/// symbols are ignored; `(12.50)` reads as negative. Empty, non-numeric and
/// non-finite input yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s: String = raw
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}' | '"' | '$' | '\u{20ae}'))
        .collect();
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let value = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => -inner.parse::<f64>().ok()?,
        None => s.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a date (optionally with a time of day) and reject anything later
/// than `now`. Date-only input is taken as midnight, so today is accepted.
pub fn parse_date(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    let parsed = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| ExpenseError::InvalidDate(raw.to_string()))?;

    if parsed > now {
        return Err(ExpenseError::FutureDate(parsed.date()));
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parsed CSV: drafts ready for the store plus rows that could not be read,
/// both tagged with their 1-based line number.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub drafts: Vec<(usize, ExpenseDraft)>,
    pub errors: Vec<(usize, ExpenseError)>,
}

struct Columns {
    description: usize,
    amount: usize,
    date: usize,
    category: Option<usize>,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| find(name).ok_or_else(|| ExpenseError::MissingColumn(name.to_string()));
        Ok(Self {
            description: required("description")?,
            amount: required("amount")?,
            date: required("date")?,
            category: find("category"),
        })
    }
}

pub fn read_csv_file(path: &Path, now: NaiveDateTime) -> Result<ImportBatch> {
    let file = std::fs::File::open(path)?;
    read_csv(std::io::BufReader::new(file), now)
}

/// Read `description,amount,date[,category]` rows (header required, column
/// order free). Blank lines are skipped; unreadable rows are reported with
/// their line number and the rest of the file is still read.
pub fn read_csv<R: Read>(reader: R, now: NaiveDateTime) -> Result<ImportBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut batch = ImportBatch::default();
    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                let fatal = matches!(e.kind(), csv::ErrorKind::Io(_));
                batch.errors.push((line, e.into()));
                if fatal {
                    break;
                }
                continue;
            }
        };
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let date_text = field(columns.date);
        let date = if date_text.is_empty() {
            None
        } else {
            match parse_date(date_text, now) {
                Ok(d) => Some(d),
                Err(e) => {
                    batch.errors.push((line, e));
                    continue;
                }
            }
        };

        batch.drafts.push((
            line,
            ExpenseDraft {
                description: field(columns.description).to_string(),
                amount: parse_amount(field(columns.amount)),
                date,
                category: columns
                    .category
                    .map(|idx| field(idx).to_string())
                    .filter(|c| !c.is_empty()),
            },
        ));
    }
    Ok(batch)
}
