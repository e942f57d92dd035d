use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};

use crate::fmt::{day_label, money};
use crate::reports::ExpenseReport;
use crate::settings::Settings;

/// Render the day-grouped list, the category breakdown and the grand total
/// as plain-terminal tables.
pub fn render(report: &ExpenseReport<'_>, settings: &Settings) -> String {
    let labels = &settings.labels;
    let symbol = &settings.currency_symbol;
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({})\n",
        labels.expense_list.bold(),
        report.sort_key
    ));
    if report.is_empty() {
        out.push_str(&format!("{}\n", labels.no_expenses));
        return out;
    }

    for group in &report.days {
        let mut table = Table::new();
        table.set_header(vec![&labels.description, &labels.category, &labels.amount]);
        for expense in &group.expenses {
            table.add_row(vec![
                Cell::new(&expense.description),
                Cell::new(expense.category.as_deref().unwrap_or("")),
                Cell::new(money(expense.amount, symbol)).set_alignment(CellAlignment::Right),
            ]);
        }
        out.push_str(&format!(
            "\n{}  {}\n{table}\n",
            day_label(group.day).yellow().bold(),
            money(group.total(), symbol)
        ));
    }

    if !report.categories.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            labels.category.as_str(),
            labels.amount.as_str(),
            "%",
            "#",
        ]);
        for item in &report.categories {
            table.add_row(vec![
                Cell::new(&item.name),
                Cell::new(money(item.total, symbol)).set_alignment(CellAlignment::Right),
                Cell::new(format!("{:.1}%", item.share(report.total)))
                    .set_alignment(CellAlignment::Right),
                Cell::new(item.count).set_alignment(CellAlignment::Right),
            ]);
        }
        out.push_str(&format!("\n{}\n{table}\n", labels.by_category.bold()));
    }

    out.push_str(&format!(
        "\n{}: {}\n",
        labels.total.green().bold(),
        money(report.total, symbol)
    ));
    out
}

pub fn print(report: &ExpenseReport<'_>, settings: &Settings) {
    print!("{}", render(report, settings));
}
