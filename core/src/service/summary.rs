use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::model::category::Category;
use crate::model::entry::TimeLogEntry;

/// How many entries a calendar day cell shows.
pub const TOP_ENTRIES_PER_DAY: usize = 3;

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Buckets one month of entries by day. Fetch order is preserved inside
/// each bucket, so grouping the same list twice yields identical buckets.
pub fn group_by_date(entries: &[TimeLogEntry]) -> BTreeMap<NaiveDate, Vec<TimeLogEntry>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<TimeLogEntry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.date).or_default().push(entry.clone());
    }
    grouped
}

/// The busiest entries of a day for the compact calendar cell: duration
/// descending, truncated to `limit`. The sort is stable, so ties keep
/// fetch order.
pub fn top_entries(day_entries: &[TimeLogEntry], limit: usize) -> Vec<TimeLogEntry> {
    let mut sorted = day_entries.to_vec();
    sorted.sort_by(|a, b| {
        b.duration
            .partial_cmp(&a.duration)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(limit);
    sorted
}

/// Hours per category over the month. Every known category is present even
/// at zero; entries outside the fixed set are skipped, not an error.
pub fn category_totals(entries: &[TimeLogEntry]) -> BTreeMap<Category, f64> {
    let mut totals: BTreeMap<Category, f64> =
        Category::ALL.iter().map(|c| (*c, 0.0)).collect();
    for entry in entries {
        if let Some(category) = Category::parse(&entry.category) {
            *totals.entry(category).or_insert(0.0) += entry.duration;
        }
    }
    totals
}

/// Daily averages over the real length of the displayed month, so a quiet
/// February and a quiet March divide by different day counts.
pub fn category_averages(
    totals: &BTreeMap<Category, f64>,
    year: i32,
    month: u32,
) -> BTreeMap<Category, f64> {
    let days = f64::from(days_in_month(year, month));
    totals
        .iter()
        .map(|(category, total)| (*category, total / days))
        .collect()
}

/// Actual number of calendar days in a month (28-31). `month` must be 1-12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1).unwrap();
    first_of_next.pred_opt().unwrap().day()
}

/// One day's entries as `{category, duration}` points, in fetch order.
pub fn day_series(entries: &[TimeLogEntry], date: NaiveDate) -> Vec<SeriesPoint> {
    entries
        .iter()
        .filter(|entry| entry.date == date)
        .map(|entry| SeriesPoint {
            label: entry.category.clone(),
            value: entry.duration,
        })
        .collect()
}

/// One category's entries over the month as `{MM-DD, duration}` points,
/// sorted by label. Within a single month lexicographic label order is
/// chronological order.
pub fn category_series(entries: &[TimeLogEntry], category: Category) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = entries
        .iter()
        .filter(|entry| entry.category == category.wire_name())
        .map(|entry| SeriesPoint {
            label: entry.date.format("%m-%d").to_string(),
            value: entry.duration,
        })
        .collect();
    points.sort_by(|a, b| a.label.cmp(&b.label));
    points
}

/// Slices for proportional charts. A pie cannot draw an empty slice, so
/// exactly-zero categories are left out here; they stay present in totals
/// and averages.
pub fn pie_slices(totals: &BTreeMap<Category, f64>) -> Vec<(Category, f64)> {
    totals
        .iter()
        .filter(|(_, total)| **total > 0.0)
        .map(|(category, total)| (*category, *total))
        .collect()
}

pub fn total_hours(totals: &BTreeMap<Category, f64>) -> f64 {
    totals.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn may_entries() -> Vec<TimeLogEntry> {
        vec![
            TimeLogEntry::new(date("2024-05-01"), "수면", 7.5),
            TimeLogEntry::new(date("2024-05-01"), "운동", 1.2),
            TimeLogEntry::new(date("2024-05-02"), "수면", 6.0),
        ]
    }

    #[test]
    fn groups_by_date_with_duration_desc_top_entries() {
        let grouped = group_by_date(&may_entries());
        assert_eq!(grouped.len(), 2);

        let first_day = &grouped[&date("2024-05-01")];
        assert_eq!(first_day.len(), 2);
        let top = top_entries(first_day, TOP_ENTRIES_PER_DAY);
        assert_eq!(top[0].category, "수면");
        assert_eq!(top[0].duration, 7.5);
        assert_eq!(top[1].category, "운동");

        assert_eq!(grouped[&date("2024-05-02")].len(), 1);
    }

    #[test]
    fn grouping_is_idempotent_and_order_stable() {
        let entries = may_entries();
        assert_eq!(group_by_date(&entries), group_by_date(&entries));
    }

    #[test]
    fn top_entries_breaks_ties_by_fetch_order() {
        let entries = vec![
            TimeLogEntry::new(date("2024-05-03"), "여가", 2.0),
            TimeLogEntry::new(date("2024-05-03"), "운동", 2.0),
            TimeLogEntry::new(date("2024-05-03"), "수면", 2.0),
            TimeLogEntry::new(date("2024-05-03"), "기타", 1.0),
        ];
        let top = top_entries(&entries, 3);
        let labels: Vec<&str> = top.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(labels, vec!["여가", "운동", "수면"]);
    }

    #[test]
    fn totals_cover_every_category_and_match_the_worked_example() {
        let totals = category_totals(&may_entries());
        assert_eq!(totals.len(), Category::ALL.len());
        assert_eq!(totals[&Category::Sleep], 13.5);
        assert_eq!(totals[&Category::Exercise], 1.2);
        assert_eq!(totals[&Category::StudyWork], 0.0);
        assert_eq!(totals[&Category::Leisure], 0.0);
        assert_eq!(totals[&Category::Other], 0.0);
    }

    #[test]
    fn totals_sum_equals_the_sum_of_known_durations() {
        let totals = category_totals(&may_entries());
        let entry_sum: f64 = may_entries().iter().map(|e| e.duration).sum();
        assert!((total_hours(&totals) - entry_sum).abs() < 1e-9);
    }

    #[test]
    fn unknown_categories_are_silently_ignored() {
        let mut entries = may_entries();
        entries.push(TimeLogEntry::new(date("2024-05-04"), "낮잠", 3.0));
        let totals = category_totals(&entries);
        assert_eq!(totals.len(), Category::ALL.len());
        assert!((total_hours(&totals) - 14.7).abs() < 1e-9);
    }

    #[test]
    fn empty_month_keeps_every_key_at_zero() {
        let totals = category_totals(&[]);
        let averages = category_averages(&totals, 2024, 5);
        for category in Category::ALL {
            assert_eq!(totals[&category], 0.0);
            assert_eq!(averages[&category], 0.0);
        }
        assert!(group_by_date(&[]).is_empty());
    }

    #[test]
    fn averages_divide_by_the_actual_month_length() {
        let totals = category_totals(&may_entries());
        let averages = category_averages(&totals, 2024, 5);
        for category in Category::ALL {
            assert_eq!(averages[&category], totals[&category] / 31.0);
        }
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 1), 31);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn day_series_filters_by_date_in_fetch_order() {
        let points = day_series(&may_entries(), date("2024-05-01"));
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "수면");
        assert_eq!(points[1].label, "운동");
    }

    #[test]
    fn category_series_uses_sorted_month_day_labels() {
        let entries = vec![
            TimeLogEntry::new(date("2024-05-10"), "수면", 6.0),
            TimeLogEntry::new(date("2024-05-02"), "수면", 7.0),
            TimeLogEntry::new(date("2024-05-21"), "운동", 1.0),
        ];
        let points = category_series(&entries, Category::Sleep);
        assert_eq!(
            points,
            vec![
                SeriesPoint {
                    label: "05-02".to_string(),
                    value: 7.0
                },
                SeriesPoint {
                    label: "05-10".to_string(),
                    value: 6.0
                },
            ]
        );
    }

    #[test]
    fn pie_slices_drop_zero_categories_only() {
        let totals = category_totals(&may_entries());
        let slices = pie_slices(&totals);
        assert_eq!(
            slices,
            vec![(Category::Sleep, 13.5), (Category::Exercise, 1.2)]
        );
    }
}
