use std::collections::BTreeMap;

use chrono::{Datelike, Local, NaiveDate};
use crossterm::event::KeyCode;
use tokio::sync::mpsc;

use timechart_core::api::{summarize_batch, ApiClient, BatchOutcome, InsertLogRequest};
use timechart_core::input::parse_log_args;
use timechart_core::service::summary;
use timechart_core::{ApiResult, Category, ChartKind, TimeLogEntry};

/// Which dashboard is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Calendar,
    Trends,
}

/// Month fetch lifecycle. Every month change re-enters `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

pub enum InputMode {
    Normal,
    Adding,
}

/// Day overlay. The chart kind resets to the default every time it opens.
pub struct DayDetail {
    pub date: NaiveDate,
    pub chart: ChartKind,
}

/// What the spawned network tasks report back over the channel.
pub enum AppMsg {
    MonthLoaded {
        seq: u64,
        result: ApiResult<Vec<TimeLogEntry>>,
    },
    BatchSaved {
        outcome: BatchOutcome,
    },
}

pub struct App {
    api: ApiClient,
    token: String,

    pub view: View,
    pub year: i32,
    pub month: u32,
    pub load_state: LoadState,
    pub entries: Vec<TimeLogEntry>,
    pub grouped: BTreeMap<NaiveDate, Vec<TimeLogEntry>>,
    pub totals: BTreeMap<Category, f64>,
    pub averages: BTreeMap<Category, f64>,

    pub selected_day: u32,
    pub detail: Option<DayDetail>,

    pub trend_category: Category,
    pub trend_chart: ChartKind,

    pub input_mode: InputMode,
    pub input: String,
    pub cursor_position: usize,
    pub saving: bool,
    pub status: Option<String>,

    seq: u64,
    tx: mpsc::UnboundedSender<AppMsg>,
    rx: mpsc::UnboundedReceiver<AppMsg>,
}

impl App {
    pub fn new(api: ApiClient, token: String) -> App {
        let today = Local::now().date_naive();
        let (tx, rx) = mpsc::unbounded_channel();
        let totals = summary::category_totals(&[]);
        let averages = summary::category_averages(&totals, today.year(), today.month());
        App {
            api,
            token,
            view: View::Calendar,
            year: today.year(),
            month: today.month(),
            load_state: LoadState::Idle,
            entries: Vec::new(),
            grouped: BTreeMap::new(),
            totals,
            averages,
            selected_day: today.day(),
            detail: None,
            trend_category: Category::default(),
            trend_chart: ChartKind::TREND_DEFAULT,
            input_mode: InputMode::Normal,
            input: String::new(),
            cursor_position: 0,
            saving: false,
            status: None,
            seq: 0,
            tx,
            rx,
        }
    }

    /// Kicks off a month fetch. There is no abort signal: a response for a
    /// superseded request completes anyway and is dropped on receipt.
    pub fn request_month(&mut self) {
        self.seq += 1;
        self.load_state = LoadState::Loading;
        let seq = self.seq;
        let api = self.api.clone();
        let token = self.token.clone();
        let (year, month) = (self.year, self.month);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_month(&token, year, month).await;
            let _ = tx.send(AppMsg::MonthLoaded { seq, result });
        });
    }

    pub fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.apply_message(msg);
        }
    }

    fn apply_message(&mut self, msg: AppMsg) {
        match msg {
            AppMsg::MonthLoaded { seq, result } => {
                if seq != self.seq {
                    return; // superseded; the result is simply unused
                }
                match result {
                    Ok(entries) => {
                        self.set_entries(entries);
                        self.load_state = LoadState::Loaded;
                    }
                    Err(err) => self.load_state = LoadState::Failed(err.to_string()),
                }
            }
            AppMsg::BatchSaved { outcome } => {
                self.saving = false;
                match outcome {
                    BatchOutcome::Saved { count } => {
                        self.status = Some(format!("Saved {} record(s).", count));
                        self.input.clear();
                        self.cursor_position = 0;
                        self.input_mode = InputMode::Normal;
                        self.request_month();
                    }
                    BatchOutcome::Failed {
                        message,
                        duplicate_day,
                    } => {
                        // The form stays open; the backend message is shown as-is.
                        self.status = Some(if duplicate_day {
                            format!("Today's records already exist. ({})", message)
                        } else {
                            message
                        });
                    }
                }
            }
        }
    }

    fn set_entries(&mut self, entries: Vec<TimeLogEntry>) {
        self.grouped = summary::group_by_date(&entries);
        self.totals = summary::category_totals(&entries);
        self.averages = summary::category_averages(&self.totals, self.year, self.month);
        self.entries = entries;
        self.clamp_selected_day();
    }

    fn clamp_selected_day(&mut self) {
        let days = summary::days_in_month(self.year, self.month);
        self.selected_day = self.selected_day.clamp(1, days);
    }

    pub fn selected_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.selected_day)
            .unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn next_month(&mut self) {
        if self.month == 12 {
            self.month = 1;
            self.year += 1;
        } else {
            self.month += 1;
        }
        self.after_month_change();
    }

    pub fn prev_month(&mut self) {
        if self.month == 1 {
            self.month = 12;
            self.year -= 1;
        } else {
            self.month -= 1;
        }
        self.after_month_change();
    }

    fn after_month_change(&mut self) {
        self.detail = None;
        self.clamp_selected_day();
        self.request_month();
    }

    pub fn move_day(&mut self, delta: i32) {
        let days = summary::days_in_month(self.year, self.month) as i32;
        let day = (self.selected_day as i32 + delta).clamp(1, days);
        self.selected_day = day as u32;
    }

    /// Opens the day overlay when the day has entries. The chart kind starts
    /// at the pie default on every open.
    pub fn open_detail(&mut self) {
        let date = self.selected_date();
        if self.grouped.get(&date).is_some_and(|day| !day.is_empty()) {
            self.detail = Some(DayDetail {
                date,
                chart: ChartKind::DAY_DETAIL_DEFAULT,
            });
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn next_trend_category(&mut self) {
        let i = Category::ALL
            .iter()
            .position(|c| *c == self.trend_category)
            .unwrap_or(0);
        self.trend_category = Category::ALL[(i + 1) % Category::ALL.len()];
    }

    pub fn prev_trend_category(&mut self) {
        let i = Category::ALL
            .iter()
            .position(|c| *c == self.trend_category)
            .unwrap_or(0);
        self.trend_category = Category::ALL[(i + Category::ALL.len() - 1) % Category::ALL.len()];
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Calendar => View::Trends,
            View::Trends => View::Calendar,
        };
    }

    pub fn enter_add_mode(&mut self) {
        self.input_mode = InputMode::Adding;
        self.input.clear();
        self.cursor_position = 0;
        self.status = None;
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self
            .input
            .chars()
            .take(self.cursor_position)
            .map(|c| c.len_utf8())
            .sum();
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index: usize = self
                .input
                .chars()
                .take(self.cursor_position - 1)
                .map(|c| c.len_utf8())
                .sum();
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    /// Parses the form and fires the batch. Parse failures and rejected
    /// saves keep the form open with a message.
    pub fn submit_form(&mut self) {
        if self.saving {
            return;
        }
        let args: Vec<String> = self
            .input
            .split_whitespace()
            .map(|s| s.to_string())
            .collect();
        if args.is_empty() {
            self.exit_input_mode();
            return;
        }
        let parsed = match parse_log_args(&args) {
            Ok(parsed) => parsed,
            Err(err) => {
                self.status = Some(err.to_string());
                return;
            }
        };
        let requests: Vec<InsertLogRequest> = parsed
            .iter()
            .filter(|(_, duration)| !duration.is_zero())
            .map(|(category, duration)| {
                InsertLogRequest::new(*category, duration.hour, duration.minutes)
            })
            .collect();
        if requests.is_empty() {
            self.status = Some("Every duration was zero; nothing to save.".to_string());
            return;
        }

        self.saving = true;
        self.status = Some("Saving...".to_string());
        let api = self.api.clone();
        let token = self.token.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let results = api.insert_batch(&token, requests).await;
            let _ = tx.send(AppMsg::BatchSaved {
                outcome: summarize_batch(&results),
            });
        });
    }

    /// Normal-mode key dispatch. Returns true when the app should quit.
    pub fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        if let KeyCode::Char('q') = code {
            return true;
        }

        if self.detail.is_some() {
            match code {
                KeyCode::Esc | KeyCode::Enter => self.close_detail(),
                KeyCode::Char('c') | KeyCode::Right => {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.chart = detail.chart.next();
                    }
                }
                KeyCode::Left => {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.chart = detail.chart.prev();
                    }
                }
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Tab => self.toggle_view(),
            KeyCode::Char('a') => self.enter_add_mode(),
            KeyCode::Char('r') => self.request_month(),
            KeyCode::Char('[') | KeyCode::PageUp => self.prev_month(),
            KeyCode::Char(']') | KeyCode::PageDown => self.next_month(),
            _ => match self.view {
                View::Calendar => match code {
                    KeyCode::Left | KeyCode::Char('h') => self.move_day(-1),
                    KeyCode::Right | KeyCode::Char('l') => self.move_day(1),
                    KeyCode::Up | KeyCode::Char('k') => self.move_day(-7),
                    KeyCode::Down | KeyCode::Char('j') => self.move_day(7),
                    KeyCode::Enter => self.open_detail(),
                    _ => {}
                },
                View::Trends => match code {
                    KeyCode::Up | KeyCode::Char('k') => self.prev_trend_category(),
                    KeyCode::Down | KeyCode::Char('j') => self.next_trend_category(),
                    KeyCode::Left | KeyCode::Char('h') => self.trend_chart = self.trend_chart.prev(),
                    KeyCode::Right | KeyCode::Char('l') => self.trend_chart = self.trend_chart.next(),
                    _ => {}
                },
            },
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timechart_core::api::MSG_DUPLICATE_DAY;
    use timechart_core::ClientConfig;

    fn test_app() -> App {
        let mut app = App::new(ApiClient::new(&ClientConfig::default()), "tok".to_string());
        app.year = 2024;
        app.month = 5;
        app.selected_day = 1;
        app
    }

    fn may_entries() -> Vec<TimeLogEntry> {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        vec![
            TimeLogEntry::new(date, "수면", 7.5),
            TimeLogEntry::new(date, "운동", 1.2),
        ]
    }

    #[test]
    fn open_detail_resets_the_chart_kind_every_time() {
        let mut app = test_app();
        app.set_entries(may_entries());

        app.open_detail();
        let detail = app.detail.as_mut().unwrap();
        assert_eq!(detail.chart, ChartKind::Pie);
        detail.chart = detail.chart.next();

        app.close_detail();
        app.open_detail();
        assert_eq!(app.detail.as_ref().unwrap().chart, ChartKind::Pie);
    }

    #[test]
    fn detail_does_not_open_on_an_empty_day() {
        let mut app = test_app();
        app.set_entries(may_entries());
        app.selected_day = 15;
        app.open_detail();
        assert!(app.detail.is_none());
    }

    #[test]
    fn stale_month_results_are_dropped() {
        let mut app = test_app();
        app.seq = 3;
        app.load_state = LoadState::Loading;
        app.apply_message(AppMsg::MonthLoaded {
            seq: 2,
            result: Ok(may_entries()),
        });
        assert!(app.entries.is_empty());
        assert_eq!(app.load_state, LoadState::Loading);
    }

    #[test]
    fn current_month_result_is_applied() {
        let mut app = test_app();
        app.seq = 3;
        app.load_state = LoadState::Loading;
        app.apply_message(AppMsg::MonthLoaded {
            seq: 3,
            result: Ok(may_entries()),
        });
        assert_eq!(app.entries.len(), 2);
        assert_eq!(app.load_state, LoadState::Loaded);
        assert_eq!(app.totals[&Category::Sleep], 7.5);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn month_navigation_wraps_the_year_and_reenters_loading() {
        let mut app = test_app();
        app.month = 12;
        app.load_state = LoadState::Loaded;
        app.next_month();
        assert_eq!((app.year, app.month), (2025, 1));
        assert_eq!(app.load_state, LoadState::Loading);

        app.prev_month();
        assert_eq!((app.year, app.month), (2024, 12));
    }

    #[test]
    fn move_day_clamps_to_the_month_length() {
        let mut app = test_app();
        app.selected_day = 30;
        app.move_day(7);
        assert_eq!(app.selected_day, 31);
        app.move_day(-40);
        assert_eq!(app.selected_day, 1);
    }

    #[test]
    fn failed_batch_keeps_the_form_open_with_the_exact_message() {
        let mut app = test_app();
        app.input_mode = InputMode::Adding;
        app.saving = true;
        app.apply_message(AppMsg::BatchSaved {
            outcome: BatchOutcome::Failed {
                message: MSG_DUPLICATE_DAY.to_string(),
                duplicate_day: true,
            },
        });
        assert!(matches!(app.input_mode, InputMode::Adding));
        assert!(!app.saving);
        assert!(app.status.as_ref().unwrap().contains(MSG_DUPLICATE_DAY));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn saved_batch_closes_the_form_and_refetches() {
        let mut app = test_app();
        app.input_mode = InputMode::Adding;
        app.input = "sleep:7h".to_string();
        app.saving = true;
        app.apply_message(AppMsg::BatchSaved {
            outcome: BatchOutcome::Saved { count: 1 },
        });
        assert!(matches!(app.input_mode, InputMode::Normal));
        assert!(app.input.is_empty());
        assert_eq!(app.load_state, LoadState::Loading);
    }
}
