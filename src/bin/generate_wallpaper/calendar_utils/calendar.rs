use core::ops::Range;

use chrono::{Datelike, Months, NaiveDate};

use super::{CellState, DayCell, MonthDate};

/// Iterates over the days of one month, producing a cell per day
pub struct DaysIter {
    column: u8,
    first_ordinal: u16,
    today_ordinal: u16,
    range: Range<u8>,
}

impl DaysIter {
    fn new(calendar: &CalendarMonth, today_ordinal: u16) -> Self {
        Self {
            column: calendar.column(),
            first_ordinal: calendar.first_ordinal(),
            today_ordinal,
            range: 0..calendar.days_amount(),
        }
    }
}

impl Iterator for DaysIter {
    type Item = DayCell;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.range.next()?;
        let ordinal = self.first_ordinal + u16::from(row);
        let state = CellState::classify(ordinal, self.today_ordinal);
        Some(DayCell::new(self.column, row, state))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for DaysIter {}

/// Data used to describe a calendar month
#[derive(Debug, Clone, Copy)]
pub struct CalendarMonth {
    date: MonthDate,
}

impl CalendarMonth {
    pub const fn new(date: MonthDate) -> Self {
        Self { date }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(MonthDate::new_from_date(date))
    }

    /// Cells of this month, classified against the day of year of `today`
    pub fn days_iter(&self, today_ordinal: u16) -> DaysIter {
        DaysIter::new(self, today_ordinal)
    }

    pub const fn start_date(&self) -> NaiveDate {
        self.date.to_start_day_naive()
    }

    /// Get the amount of days in this month
    pub fn days_amount(&self) -> u8 {
        let start = self.start_date();
        match start.checked_add_months(Months::new(1)) {
            Some(end) => end.signed_duration_since(start).num_days() as u8,
            // Only December of the last year chrono can represent ends up here
            None => 31,
        }
    }

    /// Day of year of the first day of this month
    pub fn first_ordinal(&self) -> u16 {
        self.start_date().ordinal() as u16
    }

    /// Zero-based column of this month in the grid
    pub fn column(&self) -> u8 {
        self.start_date().month0() as u8
    }
}
