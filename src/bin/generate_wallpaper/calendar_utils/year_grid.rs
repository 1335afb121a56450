use chrono::{Datelike, NaiveDate};

use super::{all_months, day_of_year, CalendarMonth, CalendarPosition, MonthDate, MONTHS_IN_YEAR};
use crate::error::{Error, Result};

/// How a single day relates to today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Past,
    Today,
    Future,
}

impl CellState {
    pub fn classify(ordinal: u16, today_ordinal: u16) -> Self {
        match ordinal.cmp(&today_ordinal) {
            core::cmp::Ordering::Less => Self::Past,
            core::cmp::Ordering::Equal => Self::Today,
            core::cmp::Ordering::Greater => Self::Future,
        }
    }
}

/// A single drawable dot of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    column: u8,
    row: u8,
    state: CellState,
}

impl DayCell {
    pub const fn new(column: u8, row: u8, state: CellState) -> Self {
        Self { column, row, state }
    }

    /// Zero-based month index
    pub const fn column(&self) -> u8 {
        self.column
    }

    /// Zero-based day of month
    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn state(&self) -> CellState {
        self.state
    }

    /// Past days and today are both filled
    pub fn is_filled(&self) -> bool {
        self.state != CellState::Future
    }
}

/// Every day of the year of `today`, laid out one column per month
#[derive(Debug, Clone)]
pub struct YearGrid {
    today: NaiveDate,
    months: [CalendarMonth; MONTHS_IN_YEAR],
}

impl YearGrid {
    pub fn new(today: NaiveDate) -> Result<Self> {
        let year = today.year();
        let invalid = || Error::InvalidDate {
            year,
            month: today.month(),
            day: today.day(),
        };

        let mut months = [CalendarMonth::from_date(today); MONTHS_IN_YEAR];
        for (slot, month) in months.iter_mut().zip(all_months()) {
            *slot = CalendarMonth::new(MonthDate::new(year, month).ok_or_else(invalid)?);
        }

        Ok(Self { today, months })
    }

    pub fn year(&self) -> i32 {
        self.today.year()
    }

    pub fn position(&self) -> CalendarPosition {
        CalendarPosition::from_date(self.today)
    }

    pub fn day_of_year(&self) -> u16 {
        day_of_year(self.today)
    }

    /// Length of the longest month of the year
    pub fn max_rows(&self) -> u8 {
        self.months
            .iter()
            .map(CalendarMonth::days_amount)
            .max()
            .unwrap_or(31)
    }

    pub fn days_in_year(&self) -> u16 {
        self.months
            .iter()
            .map(|month| u16::from(month.days_amount()))
            .sum()
    }

    /// All cells of the year in chronological order
    pub fn cells(&self) -> impl Iterator<Item = DayCell> + '_ {
        let today_ordinal = self.day_of_year();
        self.months
            .iter()
            .flat_map(move |month| month.days_iter(today_ordinal))
    }

    pub fn filled_count(&self) -> usize {
        self.cells().filter(DayCell::is_filled).count()
    }
}
