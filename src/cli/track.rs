use chrono::{Local, NaiveDateTime};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, Paragraph,
    },
    Frame,
};

use crate::chart::{pie_slices, slice_color};
use crate::error::{ExpenseError, Result};
use crate::fmt::{day_label, money};
use crate::importer::parse_date;
use crate::reports::SortKey;
use crate::session::{Command, Outcome, Session};
use crate::settings::{load_settings, Settings};
use crate::tui::{
    money_span, run_view, truncate, wrap_text, View, ViewAction, FOCUSED_STYLE, FOOTER_STYLE,
    HEADER_STYLE, STATUS_STYLE,
};

// Field indices, in form order
const DESCRIPTION_IDX: usize = 0;
const AMOUNT_IDX: usize = 1;
const DATE_IDX: usize = 2;
const CATEGORY_IDX: usize = 3;
const SORT_IDX: usize = 4;

const NO_CATEGORY: &str = "\u{2014}";
const PIE_RESOLUTION: usize = 48;
const PAGE_ROWS: usize = 10;

struct FormField {
    value: String,
    kind: FieldKind,
}

enum FieldKind {
    Text,
    Selector { options: Vec<String>, selected: usize },
}

impl FormField {
    fn text() -> Self {
        Self {
            value: String::new(),
            kind: FieldKind::Text,
        }
    }

    fn selector(options: Vec<String>, selected: usize) -> Self {
        Self {
            value: options.get(selected).cloned().unwrap_or_default(),
            kind: FieldKind::Selector { options, selected },
        }
    }
}

/// The interactive entry form plus the live list, total and pie chart.
pub struct ExpenseForm {
    session: Session,
    settings: Settings,
    fields: Vec<FormField>,
    focused: usize,
    list_offset: usize,
    status_message: Option<String>,
    /// Remaining keypresses before the status message is cleared.
    status_ttl: u8,
    clock: fn() -> NaiveDateTime,
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl ExpenseForm {
    pub fn new(settings: Settings, sort_key: SortKey) -> Self {
        Self::with_clock(settings, sort_key, local_now)
    }

    fn with_clock(settings: Settings, sort_key: SortKey, clock: fn() -> NaiveDateTime) -> Self {
        let session = Session::new(settings.entry_policy(), sort_key);

        // Index 0 is the "nothing picked yet" placeholder.
        let mut categories = vec![NO_CATEGORY.to_string()];
        categories.extend(settings.categories.iter().cloned());
        let category_field = if settings.categories.is_empty() {
            FormField::text()
        } else {
            FormField::selector(categories, 0)
        };

        let sort_options = SortKey::ALL.iter().map(|k| k.to_string()).collect();
        let sort_selected = SortKey::ALL
            .iter()
            .position(|k| *k == sort_key)
            .unwrap_or(0);

        Self {
            session,
            settings,
            fields: vec![
                FormField::text(),
                FormField::text(),
                FormField::text(),
                category_field,
                FormField::selector(sort_options, sort_selected),
            ],
            focused: 0,
            list_offset: 0,
            status_message: None,
            status_ttl: 0,
            clock,
        }
    }

    fn apply(&mut self, command: Command) -> Outcome {
        let transition = std::mem::take(&mut self.session).apply(command);
        self.session = transition.state;
        transition.outcome
    }

    fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
        self.status_ttl = 3;
    }

    fn field_label(&self, idx: usize) -> &str {
        let labels = &self.settings.labels;
        match idx {
            DESCRIPTION_IDX => &labels.description,
            AMOUNT_IDX => &labels.amount,
            DATE_IDX => &labels.date,
            CATEGORY_IDX => &labels.category,
            _ => &labels.sort,
        }
    }

    /// Push the focused field's current value into the session draft.
    fn sync_field(&mut self, idx: usize) {
        let value = self.fields[idx].value.clone();
        let command = match idx {
            DESCRIPTION_IDX => Command::SetDescription(value),
            AMOUNT_IDX => Command::SetAmount(value),
            DATE_IDX => Command::SetDate(parse_date(&value, (self.clock)()).ok()),
            CATEGORY_IDX => {
                let picked = match &self.fields[idx].kind {
                    FieldKind::Selector { selected, .. } => *selected > 0,
                    FieldKind::Text => !value.trim().is_empty(),
                };
                Command::SetCategory(picked.then_some(value))
            }
            _ => match SortKey::ALL.iter().find(|k| k.to_string() == value) {
                Some(key) => Command::ChangeSort(*key),
                None => return,
            },
        };
        self.apply(command);
    }

    /// Shown under the date field while the typed date is in the future.
    fn date_hint(&self) -> Option<&str> {
        let text = self.fields[DATE_IDX].value.trim();
        if text.is_empty() {
            return None;
        }
        match parse_date(text, (self.clock)()) {
            Err(ExpenseError::FutureDate(_)) => Some(&self.settings.labels.future_date),
            Err(_) => Some("YYYY-MM-DD [HH:MM]"),
            Ok(_) => None,
        }
    }

    fn submit(&mut self) {
        match self.apply(Command::Submit) {
            Outcome::Added(expense) => {
                for idx in [DESCRIPTION_IDX, AMOUNT_IDX, DATE_IDX, CATEGORY_IDX] {
                    let field = &mut self.fields[idx];
                    match &mut field.kind {
                        FieldKind::Text => field.value.clear(),
                        FieldKind::Selector { options, selected } => {
                            *selected = 0;
                            field.value = options[0].clone();
                        }
                    }
                }
                self.focused = DESCRIPTION_IDX;
                let msg = format!(
                    "{}: {} {}",
                    self.settings.labels.add_expense,
                    expense.description,
                    money(expense.amount, &self.settings.currency_symbol)
                );
                self.set_status(msg);
            }
            Outcome::Rejected(ExpenseError::MissingField(fields)) => {
                let msg = self.settings.labels.missing_message(&fields);
                self.set_status(msg);
            }
            Outcome::Rejected(e) => self.set_status(e.to_string()),
            Outcome::Updated => {}
        }
    }

    fn cycle_selector(&mut self, forward: bool) {
        let idx = self.focused;
        let field = &mut self.fields[idx];
        let FieldKind::Selector { options, selected } = &mut field.kind else {
            return;
        };
        *selected = if forward {
            (*selected + 1) % options.len()
        } else if *selected == 0 {
            options.len() - 1
        } else {
            *selected - 1
        };
        field.value = options[*selected].clone();
        self.sync_field(idx);
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let labels = &self.settings.labels;
        let mut lines = vec![Line::from("")];

        for (i, field) in self.fields.iter().enumerate() {
            if i == SORT_IDX {
                lines.push(Line::from(""));
            }
            let is_focused = i == self.focused;
            let label_style = if is_focused {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value_style = if is_focused {
                FOCUSED_STYLE
            } else {
                Style::default()
            };
            let value = match &field.kind {
                FieldKind::Text => {
                    let cursor = if is_focused { "_" } else { "" };
                    format!("{}{cursor}", field.value)
                }
                FieldKind::Selector { options, selected } => {
                    let arrows = if is_focused { ("< ", " >") } else { ("  ", "  ") };
                    format!("{}{}{}", arrows.0, options[*selected], arrows.1)
                }
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<12} ", truncate(self.field_label(i), 12)), label_style),
                Span::styled(value, value_style),
            ]));
            if i == DATE_IDX {
                if let Some(hint) = self.date_hint() {
                    lines.push(Line::from(Span::styled(
                        format!(" {:<12} {hint}", ""),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }

        if let Some(msg) = &self.status_message {
            lines.push(Line::from(""));
            for part in wrap_text(msg, area.width.saturating_sub(4) as usize).0.lines() {
                lines.push(Line::from(Span::styled(format!(" {part}"), STATUS_STYLE)));
            }
        }

        frame.render_widget(
            Paragraph::new(lines).block(Block::bordered().title(format!(" {} ", labels.add_expense))),
            area,
        );
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let labels = &self.settings.labels;
        let symbol = &self.settings.currency_symbol;
        let report = self.session.report();
        let inner_width = area.width.saturating_sub(2) as usize;
        let amount_width = 14;
        let category_width = 14;
        let desc_width = inner_width
            .saturating_sub(amount_width + category_width + 4)
            .max(8);

        let mut lines: Vec<Line> = Vec::new();
        if report.is_empty() {
            lines.push(Line::from(format!(" {}", labels.no_expenses)));
        }
        for group in &report.days {
            lines.push(Line::from(vec![
                Span::styled(format!(" {}  ", day_label(group.day)), HEADER_STYLE),
                Span::styled(money(group.total(), symbol), FOOTER_STYLE),
            ]));
            for expense in &group.expenses {
                let (wrapped, _) = wrap_text(&expense.description, desc_width);
                let category = expense.category.as_deref().unwrap_or("");
                for (n, part) in wrapped.lines().enumerate() {
                    if n == 0 {
                        lines.push(Line::from(vec![
                            Span::raw(format!("   {part:<desc_width$} ")),
                            Span::styled(
                                format!("{:<category_width$}", truncate(category, category_width)),
                                FOOTER_STYLE,
                            ),
                            money_span(expense.amount, symbol),
                        ]));
                    } else {
                        lines.push(Line::from(format!("   {part}")));
                    }
                }
            }
        }

        let visible = area.height.saturating_sub(2) as usize;
        self.list_offset = self.list_offset.min(lines.len().saturating_sub(visible));

        let title = Line::from(vec![
            Span::raw(format!(" {} ({}) ", labels.expense_list, report.sort_key)),
        ]);
        let total = Line::from(vec![
            Span::styled(format!(" {}: ", labels.total), HEADER_STYLE),
            money_span(report.total, symbol),
            Span::raw(" "),
        ])
        .right_aligned();
        frame.render_widget(
            Paragraph::new(lines)
                .scroll((self.list_offset as u16, 0))
                .block(Block::bordered().title(title).title_bottom(total)),
            area,
        );
    }

    fn draw_breakdown(&self, frame: &mut Frame, area: Rect) {
        let labels = &self.settings.labels;
        let symbol = &self.settings.currency_symbol;
        let report = self.session.report();

        let pie_width = area.height.saturating_mul(2).min(area.width / 2);
        let [pie_area, legend_area] =
            Layout::horizontal([Constraint::Length(pie_width), Constraint::Fill(1)]).areas(area);

        let slices = pie_slices(&report.categories, PIE_RESOLUTION);
        frame.render_widget(
            Canvas::default()
                .block(Block::bordered().title(format!(" {} ", labels.by_category)))
                .marker(Marker::Braille)
                .x_bounds([-1.0, 1.0])
                .y_bounds([-1.0, 1.0])
                .paint(|ctx| {
                    for slice in &slices {
                        ctx.draw(&Points {
                            coords: &slice.points,
                            color: slice.color,
                        });
                    }
                }),
            pie_area,
        );

        let count = report.categories.len();
        let name_width = legend_area.width.saturating_sub(28).max(6) as usize;
        let lines: Vec<Line> = report
            .categories
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                Line::from(vec![
                    Span::styled(" \u{25a0} ", Style::default().fg(slice_color(idx, count))),
                    Span::raw(format!("{:<name_width$} ", truncate(&item.name, name_width))),
                    money_span(item.total, symbol),
                    Span::styled(
                        format!("  {:.1}%", item.share(report.total)),
                        FOOTER_STYLE,
                    ),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines).block(Block::bordered()), legend_area);
    }
}

impl View for ExpenseForm {
    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let border_style = Style::default().fg(Color::DarkGray);

        let [header_area, sep, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" {}", self.settings.labels.title)).style(HEADER_STYLE),
            header_area,
        );
        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(Paragraph::new(sep_line.as_str()).style(border_style), sep);

        let [form_area, right_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Fill(1)]).areas(body_area);
        let [list_area, breakdown_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(12)]).areas(right_area);

        self.draw_form(frame, form_area);
        self.draw_list(frame, list_area);
        self.draw_breakdown(frame, breakdown_area);

        frame.render_widget(
            Paragraph::new(
                " Tab=next field  \u{2190}\u{2192}=choose  Enter=add  PgUp/PgDn=scroll  Esc=quit",
            )
            .style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> ViewAction {
        if self.status_ttl > 0 {
            self.status_ttl -= 1;
            if self.status_ttl == 0 {
                self.status_message = None;
            }
        }

        let focused = self.focused;
        match code {
            KeyCode::Esc => return ViewAction::Close,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if focused == 0 {
                    self.fields.len() - 1
                } else {
                    focused - 1
                };
            }
            KeyCode::Left => self.cycle_selector(false),
            KeyCode::Right => self.cycle_selector(true),
            KeyCode::Char(c) => {
                if let FieldKind::Text = self.fields[focused].kind {
                    self.fields[focused].value.push(c);
                    self.sync_field(focused);
                }
            }
            KeyCode::Backspace => {
                if let FieldKind::Text = self.fields[focused].kind {
                    self.fields[focused].value.pop();
                    self.sync_field(focused);
                }
            }
            KeyCode::Enter => self.submit(),
            KeyCode::PageDown => self.list_offset += PAGE_ROWS,
            KeyCode::PageUp => self.list_offset = self.list_offset.saturating_sub(PAGE_ROWS),
            _ => {}
        }
        ViewAction::Continue
    }
}

pub fn run(sort: Option<SortKey>) -> Result<()> {
    let settings = load_settings();
    let sort_key = sort.unwrap_or(settings.default_sort);
    let mut form = ExpenseForm::new(settings, sort_key);
    run_view(&mut form)?;

    let count = form.session.store().len();
    if count > 0 {
        let symbol = form.settings.currency_symbol.clone();
        println!(
            "{count} expense(s), {}: {}",
            form.settings.labels.total,
            money(form.session.report().total, &symbol)
        );
    }
    Ok(())
}
