//! View rendering
//!
//! Thin presentation over the controllers; no state of its own
//! beyond the table highlight.

use catalog_client::{FormMode, FormPhase, ProductForm};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::{App, FormField, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.screen {
        Screen::List => draw_list(frame, app),
        Screen::Form => draw_form(frame, app),
    }
}

// ---- list view ----

fn draw_list(frame: &mut Frame, app: &App) {
    let [search_area, table_area, footer_area, help_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_search(frame, app, search_area);

    let header = Row::new(["Name", "Description", "Price", "Image"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = app
        .list
        .items()
        .iter()
        .map(|product| {
            Row::new(vec![
                Cell::from(product.title.clone()),
                Cell::from(product.description.clone()),
                Cell::from(format!("{:.2}", product.price)),
                Cell::from(product.image_url.clone()),
            ])
        })
        .collect();

    let title = if app.list.search_active() {
        format!(" Products (search: {}) ", app.list.keyword())
    } else {
        " Products ".to_string()
    };
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Percentage(35),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL).title(title));

    let mut state = TableState::default();
    if !app.list.items().is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, table_area, &mut state);

    let mut footer = format!(
        "page {} of {} · {} products",
        app.list.page() + 1,
        app.list.total_pages(),
        app.list.total_records()
    );
    if app.is_busy() {
        footer.push_str("  ·  loading...");
    }
    let footer_line = match &app.status {
        Some(status) => Line::from(vec![
            Span::raw(footer),
            Span::raw("  "),
            Span::styled(status.clone(), Style::default().fg(Color::Red)),
        ]),
        None => Line::from(footer),
    };
    frame.render_widget(Paragraph::new(footer_line), footer_area);

    frame.render_widget(
        Paragraph::new("a add · e edit · d delete · / search · ←/→ page · r refresh · q quit")
            .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_search(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.search_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(app.search.value())
        .block(Block::default().borders(Borders::ALL).title(" Search ").border_style(style));
    frame.render_widget(search, area);
    if app.search_focused {
        frame.set_cursor_position(Position::new(
            area.x + app.search.visual_cursor() as u16 + 1,
            area.y + 1,
        ));
    }
}

// ---- form view ----

fn draw_form(frame: &mut Frame, app: &App) {
    let Some(form) = &app.form else { return };

    let [title_area, description_area, price_area, asset_area, phase_area, help_area] =
        Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    draw_field(
        frame,
        app,
        FormField::Title,
        title_area,
        " Product Name ",
        form.title(),
        form.errors().title.as_deref(),
    );
    draw_field(
        frame,
        app,
        FormField::Description,
        description_area,
        " Description ",
        form.description(),
        form.errors().description.as_deref(),
    );
    let price = if form.price() > 0.0 {
        form.price().to_string()
    } else {
        String::new()
    };
    draw_field(
        frame,
        app,
        FormField::Price,
        price_area,
        " Price ",
        &price,
        form.errors().price.as_deref(),
    );
    draw_asset_field(frame, app, form, asset_area);

    let phase = match form.phase() {
        FormPhase::Loading => "Loading product...",
        FormPhase::Uploading => "Uploading asset...",
        FormPhase::Submitting => "Submitting...",
        _ => "",
    };
    let mut lines = vec![Line::from(phase)];
    if let Some(notice) = form.notice().or(app.status.as_deref()) {
        lines.push(Line::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(Paragraph::new(lines), phase_area);

    let heading = match form.mode() {
        FormMode::Create => "Add Product",
        FormMode::Edit { .. } => "Edit Product",
    };
    frame.render_widget(
        Paragraph::new(format!(
            "{heading} · Tab next field · Enter upload (asset) · Ctrl-S submit · Esc back"
        ))
        .style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

#[allow(clippy::too_many_arguments)]
fn draw_field(
    frame: &mut Frame,
    app: &App,
    field: FormField,
    area: Rect,
    title: &str,
    value: &str,
    error: Option<&str>,
) {
    let focused = app.focus == field;
    let [input_area, error_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(area);

    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let shown = if focused { app.field_input.value() } else { value };
    frame.render_widget(
        Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .border_style(border),
        ),
        input_area,
    );
    if focused {
        frame.set_cursor_position(Position::new(
            input_area.x + app.field_input.visual_cursor() as u16 + 1,
            input_area.y + 1,
        ));
    }
    if let Some(message) = error {
        frame.render_widget(
            Paragraph::new(message.to_string()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }
}

fn draw_asset_field(frame: &mut Frame, app: &App, form: &ProductForm, area: Rect) {
    let focused = app.focus == FormField::Asset;
    let [input_area, current_area, error_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let shown = if focused { app.field_input.value() } else { "" };
    frame.render_widget(
        Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Image (file path) ")
                .border_style(border),
        ),
        input_area,
    );
    if focused {
        frame.set_cursor_position(Position::new(
            input_area.x + app.field_input.visual_cursor() as u16 + 1,
            input_area.y + 1,
        ));
    }

    let current = if form.image_url().is_empty() {
        "no asset uploaded".to_string()
    } else {
        format!("current: {}", form.image_url())
    };
    frame.render_widget(
        Paragraph::new(current).style(Style::default().fg(Color::DarkGray)),
        current_area,
    );
    if let Some(message) = form.errors().image.as_deref() {
        frame.render_widget(
            Paragraph::new(message.to_string()).style(Style::default().fg(Color::Red)),
            error_area,
        );
    }
}
