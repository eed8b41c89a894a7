use crate::error::{DreError, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Half-open calendar month `[start, end_exclusive)`.
///
/// The only way to build one is [`resolve_period`] (or [`resolve_year`]), so every
/// window in circulation satisfies `start < end_exclusive` and spans exactly one
/// calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    start: NaiveDate,
    end_exclusive: NaiveDate,
    label: String,
}

impl PeriodWindow {
    fn for_month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end_exclusive = first_day_of_next_month(year, month)?;

        Some(Self {
            start,
            end_exclusive,
            label: format!("{} de {}", month_name(month), year),
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end_exclusive(&self) -> NaiveDate {
        self.end_exclusive
    }

    /// Human readable label, e.g. "Setembro de 2025".
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn year(&self) -> i32 {
        self.start.year()
    }

    pub fn month(&self) -> u32 {
        self.start.month()
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month())
    }

    /// The `YYYY-MM` token this window was resolved from.
    pub fn token(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    pub fn last_day(&self) -> NaiveDate {
        last_day_of_month(self.year(), self.month()).unwrap_or(self.start)
    }

    pub fn days(&self) -> i64 {
        (self.end_exclusive - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end_exclusive
    }
}

/// Parses a `YYYY-MM` token into its calendar month window.
pub fn resolve_period(period: &str) -> Result<PeriodWindow> {
    let invalid = || DreError::InvalidPeriod(period.to_string());
    let trimmed = period.trim();

    let (year_part, month_part) = trimmed.split_once('-').ok_or_else(invalid)?;
    if year_part.len() != 4
        || month_part.len() != 2
        || !is_digits(year_part)
        || !is_digits(month_part)
    {
        return Err(invalid());
    }

    let year: i32 = year_part.parse().map_err(|_| invalid())?;
    let month: u32 = month_part.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    PeriodWindow::for_month(year, month).ok_or_else(invalid)
}

/// Parses a 4-digit year into the twelve monthly windows of that year, in order.
pub fn resolve_year(year: &str) -> Result<Vec<PeriodWindow>> {
    let trimmed = year.trim();
    let invalid = || DreError::InvalidYear(year.to_string());

    if trimmed.len() != 4 || !is_digits(trimmed) {
        return Err(invalid());
    }
    let year: i32 = trimmed.parse().map_err(|_| invalid())?;

    (1..=12)
        .map(|month| PeriodWindow::for_month(year, month).ok_or_else(invalid))
        .collect()
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "",
    }
}

fn first_day_of_next_month(year: i32, month: u32) -> Option<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
}

/// Last calendar day of the month: day zero of the following month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    first_day_of_next_month(year, month)?.checked_sub_days(Days::new(1))
}
