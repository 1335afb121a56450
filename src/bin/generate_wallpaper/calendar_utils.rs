//! A bunch of utils for working with calendar stuff

pub mod calendar;
mod month_date;
pub mod year_grid;

use chrono::{Datelike, Month, NaiveDate};
use num_traits::FromPrimitive;

pub use calendar::CalendarMonth;
pub use month_date::MonthDate;
pub use year_grid::{CellState, DayCell, YearGrid};

/// Amount of columns in the grid, one per month
pub const MONTHS_IN_YEAR: usize = 12;

pub const fn all_months() -> [Month; MONTHS_IN_YEAR] {
    [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ]
}

/// 1-based ordinal of `date` within its year, leap years included
pub fn day_of_year(date: NaiveDate) -> u16 {
    date.ordinal() as u16
}

/// Where a date sits in the grid: its month and its day of month, both 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CalendarPosition {
    month: u8,
    day: u8,
}

impl CalendarPosition {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month() as u8,
            day: date.day() as u8,
        }
    }

    pub fn month(self) -> Month {
        Month::from_u8(self.month).expect("chrono months are within 1..=12")
    }

    pub const fn day(self) -> u8 {
        self.day
    }

    /// Zero-based grid column
    pub const fn column(self) -> u8 {
        self.month - 1
    }

    /// Zero-based grid row
    pub const fn row(self) -> u8 {
        self.day - 1
    }
}
