/*!
Facilities for the Gregorian calendar that are independent of any time zone.

This module provides the two closed enumerations that calendar arithmetic is
built on, [`Month`] and [`Weekday`], along with a handful of free functions
answering questions about years and months:

* [`is_leap_year`] reports whether a year has 366 days.
* [`days_in_year`] returns `365` or `366`.
* [`days_in_month`] returns the length of a month in a particular year.
* [`weekday`] returns the day of the week for a particular date.

These are the same routines [`PointInTime`](crate::PointInTime) and
[`TransitionRule`](crate::tz::TransitionRule) use internally, so they agree
with every conversion done by this crate.

# Year numbering

This crate allows years to be negative and also to be `0`, which is
contrary to the common practice of excluding the year `0` when writing
dates for the Gregorian calendar. That is, the year `1 BCE` is year `0` in
this crate. The year `2 BCE` is the year `-1` in this crate. The leap year
rule is applied proleptically, so year `0` is a leap year.
*/

pub use self::{month::Month, weekday::Weekday};

use crate::util::itime;

mod month;
mod weekday;

/// Returns true if and only if the given year is a leap year.
///
/// A leap year is a year with 366 days. Typical years have 365 days. A
/// year is a leap year when it is divisible by `4`, except for years
/// divisible by `100` that are not also divisible by `400`.
///
/// # Example
///
/// ```
/// use tempora::civil::is_leap_year;
///
/// assert!(!is_leap_year(1900));
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(2100));
/// assert!(is_leap_year(2400));
/// assert!(is_leap_year(2024));
/// assert!(!is_leap_year(2023));
/// ```
#[inline]
pub const fn is_leap_year(year: i16) -> bool {
    itime::is_leap_year(year)
}

/// Returns the number of days in the given year.
///
/// This is `366` for leap years and `365` otherwise.
///
/// # Example
///
/// ```
/// use tempora::civil::days_in_year;
///
/// assert_eq!(days_in_year(2000), 366);
/// assert_eq!(days_in_year(2001), 365);
/// ```
#[inline]
pub const fn days_in_year(year: i16) -> i16 {
    itime::days_in_year(year)
}

/// Return the number of days in the given month of the given year.
///
/// April, June, September and November have `30` days. February has `29`
/// days in a leap year and `28` otherwise. Every other month has `31` days.
///
/// # Example
///
/// ```
/// use tempora::civil::{days_in_month, Month};
///
/// assert_eq!(days_in_month(1900, Month::February), 28);
/// assert_eq!(days_in_month(2000, Month::February), 29);
/// assert_eq!(days_in_month(2023, Month::June), 30);
/// assert_eq!(days_in_month(2023, Month::July), 31);
/// ```
#[inline]
pub const fn days_in_month(year: i16, month: Month) -> i8 {
    itime::days_in_month(year, month.to_number())
}

/// Returns the weekday of the given Gregorian date.
///
/// The day given is not validated. Days past the end of the month simply
/// continue counting into the following month, and days less than `1` count
/// backwards into the previous month.
///
/// # Example
///
/// ```
/// use tempora::civil::{weekday, Month, Weekday};
///
/// assert_eq!(weekday(1970, Month::January, 1), Weekday::Thursday);
/// assert_eq!(weekday(2000, Month::February, 29), Weekday::Tuesday);
/// assert_eq!(weekday(2024, Month::March, 31), Weekday::Sunday);
/// ```
#[inline]
pub fn weekday(year: i16, month: Month, day: i8) -> Weekday {
    let first = itime::IDate { year, month: month.to_number(), day: 1 };
    let epoch_day = first.to_epoch_day().epoch_day + i32::from(day) - 1;
    Weekday::from_epoch_day(itime::IEpochDay { epoch_day })
}
