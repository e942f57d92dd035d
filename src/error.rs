use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Field;
use crate::store::AmountPolicy;

#[derive(Error, Debug)]
pub enum ExpenseError {
    #[error("Missing required field(s): {}", join_fields(.0))]
    MissingField(Vec<Field>),

    #[error("Amount {amount} is not allowed by the {policy} amount policy")]
    AmountRejected { amount: f64, policy: AmountPolicy },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("CSV file has no '{0}' column")]
    MissingColumn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
