use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Cell, Chart, Clear, Dataset,
        Gauge, GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use timechart_core::service::summary::{self, SeriesPoint, TOP_ENTRIES_PER_DAY};
use timechart_core::{Category, ChartKind};

use crate::tui::app::{App, DayDetail, InputMode, LoadState, View};

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
};

fn category_color(category: Category) -> Color {
    let (r, g, b) = category.color();
    Color::Rgb(r, g, b)
}

/// Category color when the label is a category, accent color otherwise
/// (trend labels are dates).
fn color_for_label(label: &str) -> Color {
    Category::parse(label)
        .map(category_color)
        .unwrap_or(THEME.primary)
}

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer
        ])
        .split(size);

    draw_header(f, app, main_chunks[0]);

    match &app.load_state {
        LoadState::Idle | LoadState::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Style::default().fg(THEME.muted))
                .alignment(Alignment::Center);
            f.render_widget(loading, main_chunks[1]);
        }
        LoadState::Failed(message) => {
            let error = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(error, main_chunks[1]);
        }
        LoadState::Loaded => match app.view {
            View::Calendar => draw_calendar(f, app, main_chunks[1]),
            View::Trends => draw_trends(f, app, main_chunks[1]),
        },
    }

    draw_footer(f, app, main_chunks[2]);

    if let Some(detail) = &app.detail {
        draw_day_detail(f, app, detail, size);
    }
    if matches!(app.input_mode, InputMode::Adding) {
        draw_add_form(f, app, size);
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Min(1),
            Constraint::Length(16),
        ])
        .split(inner);

    let title = Paragraph::new(Span::styled(
        "TIMECHART",
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(title, chunks[0]);

    let tabs = Line::from(vec![
        tab_span("Calendar", app.view == View::Calendar),
        Span::styled("  |  ", Style::default().fg(THEME.muted)),
        tab_span("Trends", app.view == View::Trends),
    ]);
    f.render_widget(Paragraph::new(tabs).alignment(Alignment::Center), chunks[1]);

    let nav = Line::from(vec![
        Span::styled("< ", Style::default().fg(THEME.muted)),
        Span::styled(
            format!("{}-{:02}", app.year, app.month),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" >", Style::default().fg(THEME.muted)),
    ]);
    f.render_widget(Paragraph::new(nav).alignment(Alignment::Right), chunks[2]);
}

fn tab_span(label: &str, active: bool) -> Span<'_> {
    if active {
        Span::styled(
            label,
            Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(THEME.muted))
    }
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.input_mode {
        InputMode::Adding => "Enter: Save | Esc: Cancel",
        InputMode::Normal => {
            if app.detail.is_some() {
                "c: Chart kind | Esc: Close | q: Quit"
            } else {
                match app.view {
                    View::Calendar => {
                        "arrows: Day | [/]: Month | Enter: Detail | Tab: Trends | a: Add | r: Reload | q: Quit"
                    }
                    View::Trends => {
                        "up/down: Category | left/right: Chart | [/]: Month | Tab: Calendar | a: Add | q: Quit"
                    }
                }
            }
        }
    };

    let show_status = matches!(app.input_mode, InputMode::Normal) && app.detail.is_none();
    let line = match &app.status {
        Some(status) if show_status => Line::from(vec![
            Span::styled(status.clone(), Style::default().fg(THEME.primary)),
            Span::raw("   "),
            Span::styled(help, Style::default().fg(THEME.muted)),
        ]),
        _ => Line::from(Span::styled(help, Style::default().fg(THEME.muted))),
    };
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

// --- Calendar view ---

fn draw_calendar(f: &mut Frame, app: &App, area: Rect) {
    let days = summary::days_in_month(app.year, app.month);
    let first = NaiveDate::from_ymd_opt(app.year, app.month, 1)
        .unwrap_or_else(|| app.selected_date());
    let lead = first.weekday().num_days_from_sunday() as usize;
    let cell_width = ((area.width.saturating_sub(2)) / 7) as usize;

    let header = Row::new(["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"])
        .style(Style::default().fg(Color::Yellow));

    let mut rows: Vec<Row> = Vec::new();
    let mut day = 1u32;
    while day <= days {
        let mut cells: Vec<Cell> = Vec::with_capacity(7);
        for weekday in 0..7 {
            if (rows.is_empty() && weekday < lead) || day > days {
                cells.push(Cell::from(""));
                continue;
            }
            cells.push(day_cell(app, day, cell_width));
            day += 1;
        }
        rows.push(Row::new(cells).height(1 + TOP_ENTRIES_PER_DAY as u16));
    }

    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header)
        .column_spacing(0)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        );
    f.render_widget(table, area);
}

fn day_cell(app: &App, day: u32, width: usize) -> Cell<'static> {
    let selected = day == app.selected_day;
    let day_style = if selected {
        Style::default()
            .fg(Color::Black)
            .bg(THEME.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(Span::styled(format!("{:>2}", day), day_style))];

    if let Some(date) = NaiveDate::from_ymd_opt(app.year, app.month, day) {
        if let Some(day_entries) = app.grouped.get(&date) {
            for (i, entry) in summary::top_entries(day_entries, TOP_ENTRIES_PER_DAY)
                .iter()
                .enumerate()
            {
                let text = fit(
                    &format!("{}. {} {:.1}h", i + 1, entry.category, entry.duration),
                    width,
                );
                lines.push(Line::from(Span::styled(
                    text,
                    Style::default().fg(color_for_label(&entry.category)),
                )));
            }
        }
    }

    let mut cell = Cell::from(Text::from(lines));
    if selected {
        cell = cell.style(Style::default().bg(Color::DarkGray));
    }
    cell
}

/// Truncates to a display width; the Korean category names are
/// double-width per character.
fn fit(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out
}

// --- Trends view ---

fn draw_trends(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(68), Constraint::Percentage(32)])
        .split(area);

    let title = format!(
        " {} ({}) ",
        app.trend_category.wire_name(),
        app.trend_chart.label()
    );
    let series = summary::category_series(&app.entries, app.trend_category);

    match app.trend_chart {
        ChartKind::Pie => {
            // The proportional view is over the whole month, not one category.
            let slices: Vec<SeriesPoint> = summary::pie_slices(&app.totals)
                .into_iter()
                .map(|(category, value)| SeriesPoint {
                    label: category.wire_name().to_string(),
                    value,
                })
                .collect();
            draw_pie_panel(f, chunks[0], " Month by category (Pie) ", &slices);
        }
        ChartKind::Column => draw_column_chart(f, chunks[0], &title, &series),
        ChartKind::Line => draw_xy_chart(
            f,
            chunks[0],
            &title,
            &series,
            GraphType::Line,
            symbols::Marker::Braille,
            category_color(app.trend_category),
        ),
        ChartKind::Scatter => draw_xy_chart(
            f,
            chunks[0],
            &title,
            &series,
            GraphType::Scatter,
            symbols::Marker::Dot,
            category_color(app.trend_category),
        ),
    }

    draw_summary_panel(f, app, chunks[1]);
}

fn draw_summary_panel(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let totals_lines: Vec<Line> = Category::ALL
        .iter()
        .map(|category| summary_line(app, *category, app.totals[category]))
        .collect();
    let totals = Paragraph::new(totals_lines).block(summary_block(" Totals (h) "));
    f.render_widget(totals, chunks[0]);

    let average_lines: Vec<Line> = Category::ALL
        .iter()
        .map(|category| summary_line(app, *category, app.averages[category]))
        .collect();
    let averages = Paragraph::new(average_lines).block(summary_block(" Daily averages (h) "));
    f.render_widget(averages, chunks[1]);
}

fn summary_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}

fn summary_line(app: &App, category: Category, value: f64) -> Line<'static> {
    let marker = if category == app.trend_category { "> " } else { "  " };
    Line::from(vec![
        Span::styled(
            format!("{}{}", marker, pad_label(category.wire_name())),
            Style::default().fg(category_color(category)),
        ),
        Span::styled(
            format!("{:>7.1}", value),
            Style::default().fg(THEME.text).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn pad_label(label: &str) -> String {
    let pad = 8usize.saturating_sub(label.width());
    format!("{}{}", label, " ".repeat(pad))
}

// --- Chart renderers (one arm per ChartKind; the match is exhaustive) ---

fn draw_column_chart(f: &mut Frame, area: Rect, title: &str, points: &[SeriesPoint]) {
    if points.is_empty() {
        draw_empty_chart(f, area, title);
        return;
    }

    // One decimal survives the integer bar values: store x10, print /10.
    let bars: Vec<Bar> = points
        .iter()
        .map(|point| {
            Bar::default()
                .label(point.label.clone())
                .value((point.value * 10.0).round() as u64)
                .style(Style::default().fg(color_for_label(&point.label)))
                .text_value(format!("{:.1}", point.value))
        })
        .collect();

    let max = points
        .iter()
        .map(|p| (p.value * 10.0).round() as u64)
        .max()
        .unwrap_or(0)
        .max(10);

    let chart = BarChart::default()
        .block(chart_block(title))
        .bar_width(7)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars))
        .max(max);
    f.render_widget(chart, area);
}

fn draw_xy_chart(
    f: &mut Frame,
    area: Rect,
    title: &str,
    points: &[SeriesPoint],
    graph_type: GraphType,
    marker: symbols::Marker,
    color: Color,
) {
    if points.is_empty() {
        draw_empty_chart(f, area, title);
        return;
    }

    let data: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.value))
        .collect();
    let max_y = points.iter().fold(1.0f64, |acc, p| acc.max(p.value));
    let max_x = points.len().saturating_sub(1).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name("hours")
        .marker(marker)
        .graph_type(graph_type)
        .style(Style::default().fg(color))
        .data(&data)];

    let x_labels = vec![
        Span::raw(points.first().map(|p| p.label.clone()).unwrap_or_default()),
        Span::raw(points.last().map(|p| p.label.clone()).unwrap_or_default()),
    ];
    let y_labels = vec![
        Span::raw("0.0"),
        Span::raw(format!("{:.1}", max_y / 2.0)),
        Span::raw(format!("{:.1}", max_y)),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(title))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, max_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(THEME.muted))
                .bounds([0.0, max_y * 1.1])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

fn draw_pie_panel(f: &mut Frame, area: Rect, title: &str, slices: &[SeriesPoint]) {
    let block = chart_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if slices.is_empty() {
        let empty = Paragraph::new("No data this month")
            .style(Style::default().fg(THEME.muted))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let total: f64 = slices.iter().map(|s| s.value).sum();
    let mut constraints: Vec<Constraint> = slices.iter().map(|_| Constraint::Length(2)).collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (slice, chunk) in slices.iter().zip(chunks.iter()) {
        let ratio = if total > 0.0 { slice.value / total } else { 0.0 };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color_for_label(&slice.label)))
            .ratio(ratio.min(1.0))
            .label(format!(
                "{} {:.1}h ({:.0}%)",
                slice.label,
                slice.value,
                ratio * 100.0
            ));
        f.render_widget(gauge, *chunk);
    }
}

fn draw_empty_chart(f: &mut Frame, area: Rect, title: &str) {
    let block = chart_block(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let empty = Paragraph::new("No data this month")
        .style(Style::default().fg(THEME.muted))
        .alignment(Alignment::Center);
    f.render_widget(empty, inner);
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
}

// --- Overlays ---

fn draw_day_detail(f: &mut Frame, app: &App, detail: &DayDetail, area: Rect) {
    let popup = centered_rect(70, 70, area);
    f.render_widget(Clear, popup);

    let title = format!(
        " {} ({}) ",
        detail.date.format("%Y-%m-%d"),
        detail.chart.label()
    );
    let points = summary::day_series(&app.entries, detail.date);

    match detail.chart {
        ChartKind::Pie => {
            let slices: Vec<SeriesPoint> =
                points.into_iter().filter(|p| p.value > 0.0).collect();
            draw_pie_panel(f, popup, &title, &slices);
        }
        ChartKind::Column => draw_column_chart(f, popup, &title, &points),
        ChartKind::Line => draw_xy_chart(
            f,
            popup,
            &title,
            &points,
            GraphType::Line,
            symbols::Marker::Braille,
            THEME.primary,
        ),
        ChartKind::Scatter => draw_xy_chart(
            f,
            popup,
            &title,
            &points,
            GraphType::Scatter,
            symbols::Marker::Dot,
            THEME.primary,
        ),
    }
}

fn draw_add_form(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(60, 40, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Record today's hours ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.primary));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // input line
            Constraint::Length(1),
            Constraint::Length(1), // hints
            Constraint::Length(1),
            Constraint::Min(1), // status
        ])
        .split(inner);

    let input = Paragraph::new(app.input.as_str()).style(Style::default().fg(THEME.text));
    f.render_widget(input, chunks[0]);

    let cursor_x: usize = app
        .input
        .chars()
        .take(app.cursor_position)
        .map(|c| c.width().unwrap_or(0))
        .sum();
    f.set_cursor_position(Position::new(inner.x + cursor_x as u16, inner.y));

    let hint = Paragraph::new("category:duration pairs, e.g. sleep:7h30m exercise:45m")
        .style(Style::default().fg(THEME.muted));
    f.render_widget(hint, chunks[2]);
    let keys = Paragraph::new("categories: study sleep exercise leisure other")
        .style(Style::default().fg(THEME.muted));
    f.render_widget(keys, chunks[3]);

    if let Some(status) = &app.status {
        let style = if app.saving {
            Style::default().fg(THEME.muted)
        } else {
            Style::default().fg(Color::Red)
        };
        let status_line = Paragraph::new(status.as_str())
            .style(style)
            .wrap(Wrap { trim: true });
        f.render_widget(status_line, chunks[4]);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
