use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::{load_settings, settings_path, Settings};

pub fn table(settings: &Settings) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", settings.labels.category.as_str()]);
    for (i, name) in settings.categories.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(name)]);
    }
    table
}

pub fn list() -> Result<()> {
    let settings = load_settings();
    if settings.categories.is_empty() {
        println!("No categories configured; any label is accepted.");
    } else {
        println!("{}\n{}", settings.labels.category, table(&settings));
    }
    let mode = if settings.enforce_categories {
        "closed set"
    } else {
        "free-form labels accepted"
    };
    println!("Mode: {mode} (edit {})", settings_path().display());
    Ok(())
}
