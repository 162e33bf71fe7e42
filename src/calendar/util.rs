use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{
    format_description::FormatItem, macros::format_description, Date, Duration, Month, Weekday,
};

pub(crate) const DAYS_IN_WEEK: usize = 7;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Which day heads each week column of the calendar
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Position of `wd` within a week laid out with this convention, from 0
    /// through 6
    pub(crate) fn index_of(self, wd: Weekday) -> usize {
        usize::from(match self {
            WeekStart::Sunday => wd.number_days_from_sunday(),
            WeekStart::Monday => wd.number_days_from_monday(),
        })
    }

    pub(crate) fn first_weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sunday,
            WeekStart::Monday => Weekday::Monday,
        }
    }

    /// The weekdays of a week in display order
    pub(crate) fn weekdays(self) -> impl Iterator<Item = Weekday> {
        successors(Some(self.first_weekday()), |wd| Some(wd.next())).take(DAYS_IN_WEEK)
    }

    /// Returns the first day of the week containing `date`, or `None` if that
    /// day is before the beginning of time
    pub(crate) fn start_of_week(self, date: Date) -> Option<Date> {
        let offset = self.index_of(date.weekday());
        let offset = i64::try_from(offset).ok()?;
        date.checked_sub(Duration::days(offset))
    }
}

/// The canonical `YYYY-MM-DD` identifier of a calendar day.
///
/// A `DateKey` can only be built from a real [`Date`], so its textual form is
/// always a plain ISO date with no characters that a shell would treat
/// specially.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DateKey(Date);

impl DateKey {
    pub(crate) fn date(self) -> Date {
        self.0
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        DateKey(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .0
            .format(&YMD_FMT)
            .expect("formatting a Date as YYYY-MM-DD should not fail");
        f.write_str(&s)
    }
}

impl FromStr for DateKey {
    type Err = ParseDateKeyError;

    fn from_str(s: &str) -> Result<DateKey, ParseDateKeyError> {
        Date::parse(s, &YMD_FMT)
            .map(DateKey)
            .map_err(|source| ParseDateKeyError {
                text: s.to_owned(),
                source,
            })
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid date {text:?}; expected YYYY-MM-DD")]
pub(crate) struct ParseDateKeyError {
    text: String,
    source: time::error::Parse,
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

/// Formats a date like "Jun 2, 2024"
pub(crate) fn long_date(date: Date) -> String {
    format!(
        "{} {}, {}",
        month_abbrev(date.month()),
        date.day(),
        date.year()
    )
}

/// Returns the same month & day one year earlier, with February 29 mapping to
/// February 28
pub(crate) fn one_year_before(date: Date) -> Option<Date> {
    let year = date.year().checked_sub(1)?;
    date.replace_year(year)
        .or_else(|_| Date::from_calendar_date(year, Month::February, 28))
        .ok()
}

pub(crate) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}
