use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;

use crate::error::{Error, Result};

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::UnknownTimezone(name.to_owned()))
}

/// Parse a strict `YYYY-MM-DD` date
///
/// A well formed string naming a day that does not exist, like `2023-02-29`,
/// is an [`Error::InvalidDate`] rather than a format error.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let format_error = || Error::InvalidDateFormat(value.to_owned());

    let mut parts = value.splitn(3, '-');
    let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format_error());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(format_error());
    }
    if ![year, month, day]
        .iter()
        .all(|part| part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(format_error());
    }
    let year: i32 = year.parse().map_err(|_| format_error())?;
    let month: u32 = month.parse().map_err(|_| format_error())?;
    let day: u32 = day.parse().map_err(|_| format_error())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidDate { year, month, day })
}

/// Calendar date of `now` as seen in `tz`
pub fn local_date<Z: TimeZone>(now: DateTime<Utc>, tz: &Z) -> NaiveDate {
    now.with_timezone(tz).date_naive()
}

/// The explicit override if there is one, otherwise today on the host clock
///
/// Without `tz` the day rolls over at the host's local midnight.
pub fn resolve_today(date_override: Option<NaiveDate>, tz: Option<Tz>) -> NaiveDate {
    if let Some(date) = date_override {
        debug!("Using date override {date}");
        return date;
    }

    let now = Utc::now();
    match tz {
        Some(tz) => {
            let today = local_date(now, &tz);
            debug!("Host clock says {today} in {tz}");
            today
        }
        None => {
            let today = local_date(now, &Local);
            debug!("Host clock says {today} in local time");
            today
        }
    }
}
