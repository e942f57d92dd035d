use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, Result};
use crate::models::Field;
use crate::reports::SortKey;
use crate::store::{AmountPolicy, EntryPolicy};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Printed after every amount, e.g. `12,000₮`.
    pub currency_symbol: String,
    pub categories: Vec<String>,
    pub labels: Labels,
    pub require_category: bool,
    /// Reject categories outside `categories` instead of accepting any label.
    pub enforce_categories: bool,
    pub amount_policy: AmountPolicy,
    pub default_sort: SortKey,
}

fn default_categories() -> Vec<String> {
    [
        "Хүнс",
        "Тээвэр",
        "Орон сууц",
        "Харилцаа холбоо",
        "Эрүүл мэнд",
        "Боловсрол",
        "Зугаа цэнгэл",
        "Хувцас",
        "Бусад",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency_symbol: "\u{20ae}".to_string(),
            categories: default_categories(),
            labels: Labels::default(),
            require_category: true,
            enforce_categories: false,
            amount_policy: AmountPolicy::Any,
            default_sort: SortKey::DateDesc,
        }
    }
}

impl Settings {
    pub fn entry_policy(&self) -> EntryPolicy {
        EntryPolicy {
            require_category: self.require_category,
            amount: self.amount_policy,
            allowed_categories: self.enforce_categories.then(|| self.categories.clone()),
        }
    }
}

/// Display strings for the form, the list and the reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub title: String,
    pub description: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub sort: String,
    pub add_expense: String,
    pub expense_list: String,
    pub no_expenses: String,
    pub total: String,
    pub by_category: String,
    pub missing_fields: String,
    pub future_date: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            title: "Зардлын бүртгэл".into(),
            description: "Тайлбар".into(),
            amount: "Дүн".into(),
            date: "Огноо".into(),
            category: "Ангилал".into(),
            sort: "Эрэмбэ".into(),
            add_expense: "Зардал нэмэх".into(),
            expense_list: "Зардлын жагсаалт".into(),
            no_expenses: "Зардал байхгүй".into(),
            total: "Нийт".into(),
            by_category: "Ангиллаар".into(),
            missing_fields: "Дараах талбарыг оруулна уу".into(),
            future_date: "Ирээдүйн огноо сонгох боломжгүй".into(),
        }
    }
}

impl Labels {
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Description => &self.description,
            Field::Amount => &self.amount,
            Field::Date => &self.date,
            Field::Category => &self.category,
        }
    }

    /// User-facing message for a rejected submit.
    pub fn missing_message(&self, fields: &[Field]) -> String {
        let names: Vec<&str> = fields.iter().map(|f| self.field(*f)).collect();
        format!("{}: {}", self.missing_fields, names.join(", "))
    }
}

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("expenses")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn log_path() -> PathBuf {
    config_dir().join("expenses.log")
}

pub fn load_settings() -> Settings {
    load_from(&settings_path())
}

/// Read settings from `path`. A missing file gives the defaults; an
/// unreadable or invalid one gives the defaults plus a warning.
pub fn load_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring invalid {}: {e}", path.display());
            Settings::default()
        }),
        Err(e) => {
            log::warn!("could not read {}: {e}", path.display());
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(settings, &settings_path())
}

pub fn save_to(settings: &Settings, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| ExpenseError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn settings_file_exists() -> bool {
    settings_path().exists()
}
