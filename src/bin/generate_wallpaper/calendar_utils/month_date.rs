use chrono::{Datelike, Days, Month, NaiveDate};

/// A calendar month of a specific year, stored as its first day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDate(NaiveDate);

impl MonthDate {
    /// `None` only when the month falls outside of the range chrono can represent
    pub fn new(year: i32, month: Month) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month.number_from_month(), 1).map(Self)
    }

    pub fn new_from_date(date: NaiveDate) -> Self {
        Self(date - Days::new(date.day0().into()))
    }

    pub const fn to_start_day_naive(self) -> NaiveDate {
        self.0
    }
}
