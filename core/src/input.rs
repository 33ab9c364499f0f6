use anyhow::{anyhow, bail, Result};
use chrono::Datelike;

use crate::model::category::Category;

/// Whole hours and minutes, the shape the insert endpoint takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoursMinutes {
    pub hour: u32,
    pub minutes: u32,
}

impl HoursMinutes {
    pub fn is_zero(self) -> bool {
        self.hour == 0 && self.minutes == 0
    }
}

/// Splits `category:duration` arguments, keeping argument order.
pub fn parse_log_args(args: &[String]) -> Result<Vec<(Category, HoursMinutes)>> {
    let mut parsed = Vec::new();
    for arg in args {
        let (key, value) = arg
            .split_once(':')
            .ok_or_else(|| anyhow!("Expected category:duration, got '{}'", arg))?;
        parsed.push((expand_category(key)?, parse_hours(value)?));
    }
    Ok(parsed)
}

/// Resolves a category from its wire name, exact CLI key, or an
/// unambiguous prefix of a CLI key.
pub fn expand_category(key: &str) -> Result<Category> {
    if let Some(by_wire_name) = Category::parse(key) {
        return Ok(by_wire_name);
    }

    let key = key.to_lowercase();
    if let Some(exact) = Category::ALL.iter().find(|c| c.key() == key) {
        return Ok(*exact);
    }

    let matches: Vec<Category> = Category::ALL
        .iter()
        .filter(|c| c.key().starts_with(&key))
        .copied()
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("Unknown category: '{}'", key)),
        _ => Err(anyhow!(
            "Ambiguous category: '{}' matches {:?}",
            key,
            matches.iter().map(|c| c.key()).collect::<Vec<_>>()
        )),
    }
}

/// Parses a duration into whole hours and minutes. Accepts `7h30m`, `45m`,
/// `1.5h` and a bare hour count like `7.5`.
pub fn parse_hours(input: &str) -> Result<HoursMinutes> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        bail!("Empty duration");
    }

    let total_minutes = if let Some((hours_part, rest)) = input.split_once('h') {
        let hours: f64 = hours_part
            .parse()
            .map_err(|_| anyhow!("Invalid hour count in '{}'", input))?;
        let minutes: u32 = if rest.is_empty() {
            0
        } else {
            rest.strip_suffix('m')
                .ok_or_else(|| anyhow!("Trailing '{}' in duration '{}'", rest, input))?
                .parse()
                .map_err(|_| anyhow!("Invalid minute count in '{}'", input))?
        };
        if hours < 0.0 {
            bail!("Negative duration '{}'", input);
        }
        (hours * 60.0).round() as u32 + minutes
    } else if let Some(minutes_part) = input.strip_suffix('m') {
        minutes_part
            .parse()
            .map_err(|_| anyhow!("Invalid minute count in '{}'", input))?
    } else {
        let hours: f64 = input
            .parse()
            .map_err(|_| anyhow!("Invalid duration '{}'", input))?;
        if hours < 0.0 {
            bail!("Negative duration '{}'", input);
        }
        (hours * 60.0).round() as u32
    };

    Ok(HoursMinutes {
        hour: total_minutes / 60,
        minutes: total_minutes % 60,
    })
}

/// Parses `YYYY-MM` for the month report.
pub fn parse_year_month(input: &str) -> Result<(i32, u32)> {
    let (year_str, month_str) = input
        .split_once('-')
        .ok_or_else(|| anyhow!("Expected YYYY-MM, got '{}'", input))?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| anyhow!("Invalid year in '{}'", input))?;
    let month: u32 = month_str
        .parse()
        .map_err(|_| anyhow!("Invalid month in '{}'", input))?;
    if !(1..=12).contains(&month) {
        bail!("Month must be 1-12, got {}", month);
    }
    Ok((year, month))
}

pub fn current_year_month() -> (i32, u32) {
    let today = chrono::Local::now().date_naive();
    (today.year(), today.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_duration_pairs_in_order() {
        let args = vec!["sleep:7h30m".to_string(), "ex:45m".to_string()];
        let parsed = parse_log_args(&args).unwrap();
        assert_eq!(
            parsed,
            vec![
                (Category::Sleep, HoursMinutes { hour: 7, minutes: 30 }),
                (Category::Exercise, HoursMinutes { hour: 0, minutes: 45 }),
            ]
        );
    }

    #[test]
    fn rejects_arguments_without_a_colon() {
        assert!(parse_log_args(&["sleep".to_string()]).is_err());
    }

    #[test]
    fn expand_category_accepts_keys_prefixes_and_wire_names() {
        assert_eq!(expand_category("sleep").unwrap(), Category::Sleep);
        assert_eq!(expand_category("sl").unwrap(), Category::Sleep);
        assert_eq!(expand_category("st").unwrap(), Category::StudyWork);
        assert_eq!(expand_category("e").unwrap(), Category::Exercise);
        assert_eq!(expand_category("l").unwrap(), Category::Leisure);
        assert_eq!(expand_category("o").unwrap(), Category::Other);
        assert_eq!(expand_category("수면").unwrap(), Category::Sleep);

        // "s" matches study and sleep
        assert!(expand_category("s").is_err());
        assert!(expand_category("nap").is_err());
    }

    #[test]
    fn parse_hours_accepts_the_usual_spellings() {
        assert_eq!(parse_hours("7h30m").unwrap(), HoursMinutes { hour: 7, minutes: 30 });
        assert_eq!(parse_hours("7h").unwrap(), HoursMinutes { hour: 7, minutes: 0 });
        assert_eq!(parse_hours("45m").unwrap(), HoursMinutes { hour: 0, minutes: 45 });
        assert_eq!(parse_hours("1.5h").unwrap(), HoursMinutes { hour: 1, minutes: 30 });
        assert_eq!(parse_hours("7.5").unwrap(), HoursMinutes { hour: 7, minutes: 30 });
        assert_eq!(parse_hours("0").unwrap(), HoursMinutes { hour: 0, minutes: 0 });
        assert!(parse_hours("0").unwrap().is_zero());
    }

    #[test]
    fn parse_hours_rejects_garbage() {
        assert!(parse_hours("").is_err());
        assert!(parse_hours("h").is_err());
        assert!(parse_hours("7x").is_err());
        assert!(parse_hours("-1h").is_err());
        assert!(parse_hours("7h30").is_err());
    }

    #[test]
    fn parse_hours_normalizes_minute_overflow() {
        assert_eq!(parse_hours("90m").unwrap(), HoursMinutes { hour: 1, minutes: 30 });
    }

    #[test]
    fn parse_year_month_validates_the_month() {
        assert_eq!(parse_year_month("2024-05").unwrap(), (2024, 5));
        assert_eq!(parse_year_month("2024-12").unwrap(), (2024, 12));
        assert!(parse_year_month("2024").is_err());
        assert!(parse_year_month("2024-13").is_err());
        assert!(parse_year_month("2024-00").is_err());
    }
}
