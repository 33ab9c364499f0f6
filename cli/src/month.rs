use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

use timechart_core::service::summary;
use timechart_core::{Category, TimeLogEntry};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Total (h)")]
    total: String,
    #[tabled(rename = "Daily avg (h)")]
    average: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

/// Prints one month: the per-category summary, then a per-day breakdown.
/// Values are rounded to one decimal for display only.
pub fn print_month_report(year: i32, month: u32, entries: &[TimeLogEntry]) {
    let totals = summary::category_totals(entries);
    let averages = summary::category_averages(&totals, year, month);

    println!(
        "\n\x1b[1;36m{}-{:02}\x1b[0m ({} days, {:.1}h logged)",
        year,
        month,
        summary::days_in_month(year, month),
        summary::total_hours(&totals)
    );

    let rows: Vec<SummaryRow> = Category::ALL
        .iter()
        .map(|category| SummaryRow {
            category: category.wire_name().to_string(),
            total: format!("{:.1}", totals[category]),
            average: format!("{:.1}", averages[category]),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);

    let grouped = summary::group_by_date(entries);
    if grouped.is_empty() {
        println!("No records for this month.");
        return;
    }

    let mut day_rows = Vec::new();
    for (date, day_entries) in &grouped {
        for (i, entry) in day_entries.iter().enumerate() {
            day_rows.push(DayRow {
                // Date column only on the first row of each day group
                date: if i == 0 {
                    date.format("%Y-%m-%d (%a)").to_string()
                } else {
                    String::new()
                },
                category: entry.category.clone(),
                hours: format!("{:.1}", entry.duration),
            });
        }
    }

    let mut day_table = Table::new(day_rows);
    day_table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", day_table);
}
