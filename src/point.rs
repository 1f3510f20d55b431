use core::{cell::OnceCell, time::Duration};

use crate::{
    civil::{Month, Weekday},
    error::{civil::Error as E, Error, ErrorContext},
    tz::{TimeZone, UtcOffset},
    util::itime::{
        IDateTime, IEpochDay, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE,
        MS_PER_SECOND,
    },
};

/// A precise point in time on the Gregorian calendar, viewed through a time
/// zone.
///
/// A `PointInTime` has millisecond precision and supports the instants from
/// `-9999-01-01T00:00:00.000Z` through `9999-12-31T23:59:59.999Z`. It
/// carries its own [`TimeZone`], which determines the wall clock fields
/// (year, month, day and so on) reported for the instant.
///
/// # Representation
///
/// The number of milliseconds since the Unix epoch is the authoritative
/// representation. The wall clock fields are derived from it on first access
/// and memoized. They are never modified afterwards. Every "mutating"
/// operation returns a new value.
///
/// Since the memoized fields use interior mutability, a `PointInTime` can be
/// sent to another thread but not shared between threads.
///
/// # Comparisons
///
/// The `Eq`, `Ord` and `Hash` trait implementations compare only the
/// instant. Two values in different time zones are equal when they refer to
/// the same instant. The same is true of [`PointInTime::is_equal_to`].
///
/// # Arithmetic
///
/// Milliseconds, seconds, minutes, hours and [`Duration`]s are added to the
/// instant. Adding one hour always yields the instant one hour later, even
/// when the wall clock jumps across a daylight saving time transition.
///
/// Days, months and years are added to the wall clock fields, keeping the
/// time of day. When the day doesn't exist in the resulting month, it is
/// clamped to the last day of that month. So January 31 plus one month is
/// February 28 (or 29 in a leap year).
///
/// # Example
///
/// ```
/// use tempora::{civil::{Month, Weekday}, PointInTime};
///
/// let pt = PointInTime::from_epoch_seconds(951_826_154)?;
/// assert_eq!(pt.year(), 2000);
/// assert_eq!(pt.month(), Month::February);
/// assert_eq!(pt.day(), 29);
/// assert_eq!((pt.hour(), pt.minute(), pt.second()), (12, 9, 14));
/// assert_eq!(pt.weekday(), Weekday::Tuesday);
///
/// let next = pt.add_years(1)?;
/// assert_eq!((next.month(), next.day()), (Month::February, 28));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct PointInTime {
    epoch_millis: i64,
    tz: TimeZone,
    fields: OnceCell<IDateTime>,
}

impl PointInTime {
    /// The smallest supported number of milliseconds since the Unix epoch.
    /// This corresponds to `-9999-01-01T00:00:00.000Z`.
    pub const MIN_EPOCH_MILLIS: i64 = -377_705_116_800_000;

    /// The largest supported number of milliseconds since the Unix epoch.
    /// This corresponds to `9999-12-31T23:59:59.999Z`.
    pub const MAX_EPOCH_MILLIS: i64 = 253_402_300_799_999;

    /// Creates a new point in time in UTC from its Gregorian fields.
    ///
    /// # Errors
    ///
    /// This returns an error naming the first field that is out of range.
    /// The valid ranges are:
    ///
    /// * `year`: `-9999..=9999`
    /// * `day`: `1..=N`, where `N` is the number of days in the month of
    ///   the year given.
    /// * `hour`: `0..=23`
    /// * `minute` and `second`: `0..=59`
    /// * `millisecond`: `0..=999`
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, PointInTime};
    ///
    /// assert!(PointInTime::new(2000, Month::February, 29, 0, 0, 0, 0).is_ok());
    /// let err = PointInTime::new(1900, Month::February, 29, 0, 0, 0, 0)
    ///     .unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Expected day between 1 and 28 inclusive, found 29",
    /// );
    /// ```
    pub fn new(
        year: i16,
        month: Month,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> Result<PointInTime, Error> {
        PointInTime::new_in(
            TimeZone::utc(),
            year,
            month,
            day,
            hour,
            minute,
            second,
            millisecond,
        )
    }

    /// Creates a new point in time from its wall clock fields in the given
    /// time zone.
    ///
    /// The offset used is the one the zone reports for the fields given
    /// when they are interpreted as standard time. Wall clock times that
    /// occur twice resolve to the instant at which the zone observes its
    /// standard offset. For the usual positive saving, that's the later of
    /// the two. Wall clock times that are skipped resolve to an instant
    /// whose wall clock fields differ from the ones given.
    ///
    /// # Errors
    ///
    /// This returns an error for out of range fields, like
    /// [`PointInTime::new`], and when the instant is outside of the
    /// supported range.
    pub fn new_in(
        tz: TimeZone,
        year: i16,
        month: Month,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> Result<PointInTime, Error> {
        let fields =
            validate(year, month, day, hour, minute, second, millisecond)?;
        PointInTime::from_local(tz, fields)
    }

    /// Creates a new point in time in UTC from the number of seconds since
    /// the Unix epoch.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is outside of the supported
    /// range.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::PointInTime;
    ///
    /// let pt = PointInTime::from_epoch_seconds(-1)?;
    /// assert_eq!(pt.to_string(), "1969-12-31T23:59:59.000+00:00[UTC]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_epoch_seconds(seconds: i64) -> Result<PointInTime, Error> {
        let min = PointInTime::MIN_EPOCH_MILLIS / MS_PER_SECOND;
        let max = PointInTime::MAX_EPOCH_MILLIS / MS_PER_SECOND;
        if !(min <= seconds && seconds <= max) {
            return Err(Error::range("epoch seconds", seconds, min, max));
        }
        PointInTime::from_epoch_millis(seconds * MS_PER_SECOND)
    }

    /// Creates a new point in time in UTC from the number of milliseconds
    /// since the Unix epoch.
    ///
    /// # Errors
    ///
    /// This returns an error when the value given is outside of
    /// [`PointInTime::MIN_EPOCH_MILLIS`] and
    /// [`PointInTime::MAX_EPOCH_MILLIS`].
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::{Month, Weekday}, PointInTime};
    ///
    /// let pt = PointInTime::from_epoch_millis(0)?;
    /// assert_eq!((pt.year(), pt.month(), pt.day()), (1970, Month::January, 1));
    /// assert_eq!(pt.weekday(), Weekday::Thursday);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_epoch_millis(millis: i64) -> Result<PointInTime, Error> {
        PointInTime::from_epoch_millis_in(TimeZone::utc(), millis)
    }

    /// Returns the current instant in UTC.
    ///
    /// # Panics
    ///
    /// This panics when the system clock reports a time outside of the
    /// supported range.
    #[cfg(feature = "std")]
    pub fn now() -> PointInTime {
        PointInTime::now_in(TimeZone::utc())
    }

    /// Returns the current instant in the given time zone.
    ///
    /// # Panics
    ///
    /// This panics when the system clock reports a time outside of the
    /// supported range.
    #[cfg(feature = "std")]
    pub fn now_in(tz: TimeZone) -> PointInTime {
        PointInTime::from_epoch_millis_in(tz, now_epoch_millis())
            .expect("system time reports valid value")
    }

    /// Returns the year of this point in time in its zone.
    #[inline]
    pub fn year(&self) -> i16 {
        self.fields().year
    }

    /// Returns the month of this point in time in its zone.
    #[inline]
    pub fn month(&self) -> Month {
        Month::from_index(self.fields().month - 1)
    }

    /// Returns the day of the month of this point in time in its zone.
    #[inline]
    pub fn day(&self) -> i8 {
        self.fields().day
    }

    /// Returns the hour of this point in time in its zone.
    #[inline]
    pub fn hour(&self) -> i8 {
        self.fields().hour
    }

    /// Returns the minute of this point in time in its zone.
    #[inline]
    pub fn minute(&self) -> i8 {
        self.fields().minute
    }

    /// Returns the second of this point in time in its zone.
    #[inline]
    pub fn second(&self) -> i8 {
        self.fields().second
    }

    /// Returns the millisecond of this point in time.
    #[inline]
    pub fn millisecond(&self) -> i16 {
        self.fields().millisecond
    }

    /// Returns the day of the week of this instant.
    ///
    /// This is computed from the number of whole days since the Unix epoch,
    /// so it doesn't depend on the time zone. For the day of the week of
    /// the wall clock date, use [`civil::weekday`](crate::civil::weekday)
    /// with this point's year, month and day.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{
    ///     civil::{self, Weekday},
    ///     tz::{TimeZone, UtcOffset},
    ///     PointInTime,
    /// };
    ///
    /// let pt = PointInTime::from_epoch_millis(0)?;
    /// assert_eq!(pt.weekday(), Weekday::Thursday);
    ///
    /// // The same instant is still Wednesday evening on the wall clock in
    /// // New York, but the instant's weekday doesn't change.
    /// let tz = TimeZone::fixed(UtcOffset::new(-5, 0)?);
    /// let local = pt.with_time_zone(tz);
    /// assert_eq!(local.weekday(), Weekday::Thursday);
    /// assert_eq!(
    ///     civil::weekday(local.year(), local.month(), local.day()),
    ///     Weekday::Wednesday,
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[inline]
    pub fn weekday(&self) -> Weekday {
        let epoch_day = self.epoch_millis.div_euclid(MS_PER_DAY) as i32;
        Weekday::from_epoch_day(IEpochDay { epoch_day })
    }

    /// Returns the ordinal day of the year, from `1` through `366`.
    pub fn day_of_year(&self) -> i16 {
        self.fields().date().day_of_year()
    }

    /// Returns the time zone of this point in time.
    #[inline]
    pub fn time_zone(&self) -> &TimeZone {
        &self.tz
    }

    /// Returns the offset from UTC in effect at this point in time in its
    /// zone.
    #[inline]
    pub fn offset(&self) -> UtcOffset {
        self.tz.offset_at_epoch_millis(self.epoch_millis)
    }

    /// Returns the number of whole seconds since the Unix epoch.
    ///
    /// This rounds towards negative infinity, so one millisecond before the
    /// epoch is `-1` seconds.
    #[inline]
    pub fn epoch_seconds(&self) -> i64 {
        self.epoch_millis.div_euclid(MS_PER_SECOND)
    }

    /// Returns the number of milliseconds since the Unix epoch.
    #[inline]
    pub fn epoch_millis(&self) -> i64 {
        self.epoch_millis
    }

    /// Returns a new point in time with the date replaced in this zone,
    /// keeping the time of day.
    ///
    /// # Errors
    ///
    /// This returns an error when a field is out of range or the instant is
    /// outside of the supported range.
    pub fn with_date(
        &self,
        year: i16,
        month: Month,
        day: i8,
    ) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_fields(
            year,
            month,
            day,
            f.hour,
            f.minute,
            f.second,
            f.millisecond,
        )
    }

    /// Returns a new point in time with the time of day replaced in this
    /// zone, keeping the date.
    ///
    /// # Errors
    ///
    /// This returns an error when a field is out of range or the instant is
    /// outside of the supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, PointInTime};
    ///
    /// let pt = PointInTime::new(2024, Month::June, 1, 8, 30, 0, 0)?;
    /// let noon = pt.with_time(12, 0, 0, 0)?;
    /// assert_eq!(noon.to_string(), "2024-06-01T12:00:00.000+00:00[UTC]");
    /// assert_eq!(pt.hour(), 8);
    /// assert!(pt.with_time(12, 60, 0, 0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_time(
        &self,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_fields(
            f.year,
            self.month(),
            f.day,
            hour,
            minute,
            second,
            millisecond,
        )
    }

    /// Returns a new point in time with the year replaced.
    pub fn with_year(&self, year: i16) -> Result<PointInTime, Error> {
        self.with_date(year, self.month(), self.day())
    }

    /// Returns a new point in time with the month replaced.
    pub fn with_month(&self, month: Month) -> Result<PointInTime, Error> {
        self.with_date(self.year(), month, self.day())
    }

    /// Returns a new point in time with the day of the month replaced.
    pub fn with_day(&self, day: i8) -> Result<PointInTime, Error> {
        self.with_date(self.year(), self.month(), day)
    }

    /// Returns a new point in time with the hour replaced.
    pub fn with_hour(&self, hour: i8) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_time(hour, f.minute, f.second, f.millisecond)
    }

    /// Returns a new point in time with the minute replaced.
    pub fn with_minute(&self, minute: i8) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_time(f.hour, minute, f.second, f.millisecond)
    }

    /// Returns a new point in time with the second replaced.
    pub fn with_second(&self, second: i8) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_time(f.hour, f.minute, second, f.millisecond)
    }

    /// Returns a new point in time with the millisecond replaced.
    pub fn with_millisecond(
        &self,
        millisecond: i16,
    ) -> Result<PointInTime, Error> {
        let f = self.fields();
        self.with_time(f.hour, f.minute, f.second, millisecond)
    }

    /// Returns the same instant viewed through a different time zone.
    ///
    /// The instant doesn't change, but the wall clock fields generally do.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, tz::{TimeZone, UtcOffset}, PointInTime};
    ///
    /// let pt = PointInTime::new(2024, Month::March, 1, 23, 0, 0, 0)?;
    /// let tokyo = pt.with_time_zone(TimeZone::fixed(UtcOffset::new(9, 0)?));
    /// assert_eq!((tokyo.month(), tokyo.day(), tokyo.hour()), (Month::March, 2, 8));
    /// assert!(tokyo.is_equal_to(&pt));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_time_zone(&self, tz: TimeZone) -> PointInTime {
        PointInTime {
            epoch_millis: self.epoch_millis,
            tz,
            fields: OnceCell::new(),
        }
    }

    /// Adds a duration to this instant.
    ///
    /// Sub-millisecond precision in the duration is truncated.
    ///
    /// # Errors
    ///
    /// This returns an error when the result is outside of the supported
    /// range.
    pub fn checked_add(
        &self,
        duration: Duration,
    ) -> Result<PointInTime, Error> {
        self.add_milliseconds(duration_millis(duration)?)
    }

    /// Subtracts a duration from this instant.
    ///
    /// Sub-millisecond precision in the duration is truncated.
    ///
    /// # Errors
    ///
    /// This returns an error when the result is outside of the supported
    /// range.
    pub fn checked_sub(
        &self,
        duration: Duration,
    ) -> Result<PointInTime, Error> {
        self.add_milliseconds(-duration_millis(duration)?)
    }

    /// Adds the given number of milliseconds to this instant.
    ///
    /// # Errors
    ///
    /// This returns an error when the result is outside of the supported
    /// range.
    pub fn add_milliseconds(
        &self,
        milliseconds: i64,
    ) -> Result<PointInTime, Error> {
        let millis = self.epoch_millis.saturating_add(milliseconds);
        PointInTime::from_epoch_millis_in(self.tz.clone(), millis)
            .with_context(|| E::FailedAddMilliseconds { milliseconds })
    }

    /// Adds the given number of seconds to this instant.
    pub fn add_seconds(&self, seconds: i64) -> Result<PointInTime, Error> {
        self.add_milliseconds(unit_millis(seconds, MS_PER_SECOND, "seconds")?)
    }

    /// Adds the given number of minutes to this instant.
    pub fn add_minutes(&self, minutes: i64) -> Result<PointInTime, Error> {
        self.add_milliseconds(unit_millis(minutes, MS_PER_MINUTE, "minutes")?)
    }

    /// Adds the given number of hours to this instant.
    ///
    /// This always moves the instant by exactly that many hours, regardless
    /// of any daylight saving time transition in between.
    pub fn add_hours(&self, hours: i64) -> Result<PointInTime, Error> {
        self.add_milliseconds(unit_millis(hours, MS_PER_HOUR, "hours")?)
    }

    /// Adds the given number of days to the wall clock date of this point in
    /// time, keeping the wall clock time of day.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date is outside of the
    /// supported range of years.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, PointInTime};
    ///
    /// let pt = PointInTime::new(2024, Month::February, 28, 6, 0, 0, 0)?;
    /// assert_eq!(pt.add_days(2)?.to_string(), "2024-03-01T06:00:00.000+00:00[UTC]");
    /// assert_eq!(pt.sub_days(59)?.to_string(), "2023-12-31T06:00:00.000+00:00[UTC]");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add_days(&self, days: i64) -> Result<PointInTime, Error> {
        let f = *self.fields();
        let current = i64::from(f.date().to_epoch_day().epoch_day);
        let min = i64::from(IDateTime::MIN.date().to_epoch_day().epoch_day);
        let max = i64::from(IDateTime::MAX.date().to_epoch_day().epoch_day);
        let epoch_day = current
            .checked_add(days)
            .filter(|&day| min <= day && day <= max)
            .ok_or_else(|| {
                Error::range("days", days, min - current, max - current)
            })
            .with_context(|| E::FailedAddDays { days })?;
        let date = IEpochDay { epoch_day: epoch_day as i32 }.to_date();
        let fields = IDateTime {
            year: date.year,
            month: date.month,
            day: date.day,
            ..f
        };
        PointInTime::from_local(self.tz.clone(), fields)
            .with_context(|| E::FailedAddDays { days })
    }

    /// Adds the given number of months to the wall clock date of this point
    /// in time, keeping the wall clock time of day.
    ///
    /// When the day of the month doesn't exist in the resulting month, the
    /// last day of that month is used.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date is outside of the
    /// supported range of years.
    ///
    /// # Example
    ///
    /// ```
    /// use tempora::{civil::Month, PointInTime};
    ///
    /// let pt = PointInTime::new(2024, Month::January, 31, 0, 0, 0, 0)?;
    /// assert_eq!(pt.add_months(1)?.day(), 29);
    /// assert_eq!(pt.add_months(2)?.day(), 31);
    /// assert_eq!(pt.add_months(13)?.day(), 28);
    /// assert_eq!(pt.sub_months(2)?.month(), Month::November);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add_months(&self, months: i64) -> Result<PointInTime, Error> {
        let f = *self.fields();
        let current = i64::from(f.year) * 12 + i64::from(f.month - 1);
        let min = -9999 * 12;
        let max = 9999 * 12 + 11;
        let total = current
            .checked_add(months)
            .filter(|&total| min <= total && total <= max)
            .ok_or_else(|| {
                Error::range("months", months, min - current, max - current)
            })
            .with_context(|| E::FailedAddMonths { months })?;
        let year = total.div_euclid(12) as i16;
        let month = total.rem_euclid(12) as i8 + 1;
        let fields = clamp_day(IDateTime { year, month, ..f });
        PointInTime::from_local(self.tz.clone(), fields)
            .with_context(|| E::FailedAddMonths { months })
    }

    /// Adds the given number of years to the wall clock date of this point
    /// in time, keeping the wall clock time of day.
    ///
    /// February 29 becomes February 28 when the resulting year isn't a leap
    /// year.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting year is outside of
    /// `-9999..=9999`.
    pub fn add_years(&self, years: i64) -> Result<PointInTime, Error> {
        let f = *self.fields();
        let current = i64::from(f.year);
        let year = current
            .checked_add(years)
            .filter(|&year| -9999 <= year && year <= 9999)
            .ok_or_else(|| {
                Error::range("years", years, -9999 - current, 9999 - current)
            })
            .with_context(|| E::FailedAddYears { years })?;
        let fields = clamp_day(IDateTime { year: year as i16, ..f });
        PointInTime::from_local(self.tz.clone(), fields)
            .with_context(|| E::FailedAddYears { years })
    }

    /// Subtracts the given number of milliseconds from this instant.
    pub fn sub_milliseconds(
        &self,
        milliseconds: i64,
    ) -> Result<PointInTime, Error> {
        self.add_milliseconds(milliseconds.saturating_neg())
    }

    /// Subtracts the given number of seconds from this instant.
    pub fn sub_seconds(&self, seconds: i64) -> Result<PointInTime, Error> {
        self.add_seconds(seconds.saturating_neg())
    }

    /// Subtracts the given number of minutes from this instant.
    pub fn sub_minutes(&self, minutes: i64) -> Result<PointInTime, Error> {
        self.add_minutes(minutes.saturating_neg())
    }

    /// Subtracts the given number of hours from this instant.
    pub fn sub_hours(&self, hours: i64) -> Result<PointInTime, Error> {
        self.add_hours(hours.saturating_neg())
    }

    /// Subtracts the given number of days from the wall clock date.
    pub fn sub_days(&self, days: i64) -> Result<PointInTime, Error> {
        self.add_days(days.saturating_neg())
    }

    /// Subtracts the given number of months from the wall clock date.
    pub fn sub_months(&self, months: i64) -> Result<PointInTime, Error> {
        self.add_months(months.saturating_neg())
    }

    /// Subtracts the given number of years from the wall clock date.
    pub fn sub_years(&self, years: i64) -> Result<PointInTime, Error> {
        self.add_years(years.saturating_neg())
    }

    /// Returns true when this instant is strictly before `other`.
    #[inline]
    pub fn is_before(&self, other: &PointInTime) -> bool {
        self.epoch_millis < other.epoch_millis
    }

    /// Returns true when this instant is strictly after `other`.
    #[inline]
    pub fn is_after(&self, other: &PointInTime) -> bool {
        self.epoch_millis > other.epoch_millis
    }

    /// Returns true when this is the same instant as `other`, even if the
    /// two are in different time zones.
    #[inline]
    pub fn is_equal_to(&self, other: &PointInTime) -> bool {
        self.epoch_millis == other.epoch_millis
    }

    /// Returns true when the wall clock years of both points are equal.
    ///
    /// Each point is read in its own time zone.
    pub fn is_in_same_year_as(&self, other: &PointInTime) -> bool {
        self.year() == other.year()
    }

    /// Returns true when the wall clock years and months of both points are
    /// equal.
    pub fn is_in_same_month_as(&self, other: &PointInTime) -> bool {
        self.is_in_same_year_as(other) && self.month() == other.month()
    }

    /// Returns true when the wall clock dates of both points are equal.
    pub fn is_in_same_day_as(&self, other: &PointInTime) -> bool {
        self.is_in_same_month_as(other) && self.day() == other.day()
    }

    /// Returns true when the wall clock fields of both points are equal down
    /// to the hour.
    pub fn is_in_same_hour_as(&self, other: &PointInTime) -> bool {
        self.is_in_same_day_as(other) && self.hour() == other.hour()
    }

    /// Returns true when the wall clock fields of both points are equal down
    /// to the minute.
    pub fn is_in_same_minute_as(&self, other: &PointInTime) -> bool {
        self.is_in_same_hour_as(other) && self.minute() == other.minute()
    }

    /// Returns true when the wall clock fields of both points are equal down
    /// to the second.
    pub fn is_in_same_second_as(&self, other: &PointInTime) -> bool {
        self.is_in_same_minute_as(other) && self.second() == other.second()
    }
}

impl PointInTime {
    /// Creates a point in time for an instant, checking that it's in range.
    pub(crate) fn from_epoch_millis_in(
        tz: TimeZone,
        millis: i64,
    ) -> Result<PointInTime, Error> {
        let (min, max) =
            (PointInTime::MIN_EPOCH_MILLIS, PointInTime::MAX_EPOCH_MILLIS);
        if !(min <= millis && millis <= max) {
            return Err(Error::range("epoch milliseconds", millis, min, max));
        }
        Ok(PointInTime { epoch_millis: millis, tz, fields: OnceCell::new() })
    }

    /// Creates a point in time from valid wall clock fields in a zone.
    pub(crate) fn from_local(
        tz: TimeZone,
        fields: IDateTime,
    ) -> Result<PointInTime, Error> {
        let millis = tz.to_epoch_millis(fields);
        let pt = PointInTime::from_epoch_millis_in(tz, millis)?;
        // Without transitions the conversion is a plain shift, so the given
        // fields are exactly what the instant would produce.
        if !pt.tz.has_transitions() {
            let _ = pt.fields.set(fields);
        }
        Ok(pt)
    }

    /// Returns the wall clock fields of this point in time, computing them
    /// on first use.
    fn fields(&self) -> &IDateTime {
        self.fields.get_or_init(|| self.tz.to_local(self.epoch_millis))
    }

    fn with_fields(
        &self,
        year: i16,
        month: Month,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        millisecond: i16,
    ) -> Result<PointInTime, Error> {
        let fields =
            validate(year, month, day, hour, minute, second, millisecond)?;
        PointInTime::from_local(self.tz.clone(), fields)
    }

    /// Returns the wall clock fields for the text formats.
    pub(crate) fn to_idatetime(&self) -> IDateTime {
        *self.fields()
    }
}

impl Eq for PointInTime {}

impl PartialEq for PointInTime {
    #[inline]
    fn eq(&self, other: &PointInTime) -> bool {
        self.is_equal_to(other)
    }
}

impl Ord for PointInTime {
    #[inline]
    fn cmp(&self, other: &PointInTime) -> core::cmp::Ordering {
        self.epoch_millis.cmp(&other.epoch_millis)
    }
}

impl PartialOrd for PointInTime {
    #[inline]
    fn partial_cmp(&self, other: &PointInTime) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl core::hash::Hash for PointInTime {
    #[inline]
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.epoch_millis.hash(state);
    }
}

impl core::fmt::Debug for PointInTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "PointInTime({self})")
    }
}

/// Writes the ISO 8601 form of this point in time, with its zone name as an
/// annotation. See [`fmt::iso8601`](crate::fmt::iso8601) for details.
impl core::fmt::Display for PointInTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        crate::fmt::iso8601::write(f, self)
    }
}

/// Parses the ISO 8601 form of a point in time. Only fixed offset zones may
/// be named in the annotation. Use
/// [`fmt::iso8601::parse_with`](crate::fmt::iso8601::parse_with) to look up
/// other zones.
impl core::str::FromStr for PointInTime {
    type Err = Error;

    fn from_str(text: &str) -> Result<PointInTime, Error> {
        crate::fmt::iso8601::parse(text)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PointInTime {
    #[inline]
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PointInTime {
    #[inline]
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PointInTime, D::Error> {
        use serde::de;

        struct PointInTimeVisitor;

        impl<'de> de::Visitor<'de> for PointInTimeVisitor {
            type Value = PointInTime;

            fn expecting(
                &self,
                f: &mut core::fmt::Formatter,
            ) -> core::fmt::Result {
                f.write_str("an ISO 8601 point in time string")
            }

            #[inline]
            fn visit_str<E: de::Error>(
                self,
                value: &str,
            ) -> Result<PointInTime, E> {
                value.parse().map_err(de::Error::custom)
            }

            #[inline]
            fn visit_bytes<E: de::Error>(
                self,
                value: &[u8],
            ) -> Result<PointInTime, E> {
                let value = core::str::from_utf8(value).map_err(|_| {
                    let unexpected = de::Unexpected::Bytes(value);
                    de::Error::invalid_value(unexpected, &self)
                })?;
                self.visit_str(value)
            }
        }

        deserializer.deserialize_str(PointInTimeVisitor)
    }
}

/// Adds a duration to a point in time. This panics on overflow.
///
/// For checked arithmetic, see [`PointInTime::checked_add`].
impl core::ops::Add<Duration> for PointInTime {
    type Output = PointInTime;

    #[inline]
    fn add(self, rhs: Duration) -> PointInTime {
        self.checked_add(rhs)
            .expect("adding duration to point in time overflowed")
    }
}

/// Subtracts a duration from a point in time. This panics on overflow.
///
/// For checked arithmetic, see [`PointInTime::checked_sub`].
impl core::ops::Sub<Duration> for PointInTime {
    type Output = PointInTime;

    #[inline]
    fn sub(self, rhs: Duration) -> PointInTime {
        self.checked_sub(rhs)
            .expect("subtracting duration from point in time overflowed")
    }
}

/// Checks that the given wall clock fields are in range.
fn validate(
    year: i16,
    month: Month,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
    millisecond: i16,
) -> Result<IDateTime, Error> {
    if !(-9999 <= year && year <= 9999) {
        return Err(Error::range("year", year, -9999, 9999));
    }
    let max_day = month.days(year);
    if !(1 <= day && day <= max_day) {
        return Err(Error::range("day", day, 1, max_day));
    }
    if !(0 <= hour && hour <= 23) {
        return Err(Error::range("hour", hour, 0, 23));
    }
    if !(0 <= minute && minute <= 59) {
        return Err(Error::range("minute", minute, 0, 59));
    }
    if !(0 <= second && second <= 59) {
        return Err(Error::range("second", second, 0, 59));
    }
    if !(0 <= millisecond && millisecond <= 999) {
        return Err(Error::range("millisecond", millisecond, 0, 999));
    }
    let month = month.to_number();
    Ok(IDateTime { year, month, day, hour, minute, second, millisecond })
}

/// Moves the day back to the last day of the month when it overflows it.
fn clamp_day(mut fields: IDateTime) -> IDateTime {
    let max_day = crate::util::itime::days_in_month(fields.year, fields.month);
    fields.day = fields.day.min(max_day);
    fields
}

fn unit_millis(
    amount: i64,
    millis_per_unit: i64,
    unit: &'static str,
) -> Result<i64, Error> {
    amount
        .checked_mul(millis_per_unit)
        .ok_or_else(|| E::OverflowUnit { unit }.into())
}

fn duration_millis(duration: Duration) -> Result<i64, Error> {
    i64::try_from(duration.as_millis()).map_err(|_| E::OverflowDuration.into())
}

/// Returns the number of milliseconds since the Unix epoch according to the
/// system clock.
#[cfg(feature = "std")]
pub(crate) fn now_epoch_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(since) => i64::try_from(since.as_millis()).unwrap_or(i64::MAX),
        Err(err) => {
            let before = err.duration();
            let mut millis =
                i64::try_from(before.as_millis()).map_or(i64::MIN, |ms| -ms);
            if before.subsec_nanos() % 1_000_000 != 0 {
                millis = millis.saturating_sub(1);
            }
            millis
        }
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for PointInTime {
    fn arbitrary(g: &mut quickcheck::Gen) -> PointInTime {
        let (min, max) =
            (PointInTime::MIN_EPOCH_MILLIS, PointInTime::MAX_EPOCH_MILLIS);
        let millis = i64::arbitrary(g).rem_euclid(max - min + 1) + min;
        let tz = if bool::arbitrary(g) {
            TimeZone::utc()
        } else {
            TimeZone::fixed(UtcOffset::arbitrary(g))
        };
        PointInTime::from_epoch_millis_in(tz, millis).unwrap()
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = PointInTime>> {
        let tz = self.tz.clone();
        alloc::boxed::Box::new(self.epoch_millis.shrink().filter_map(
            move |millis| {
                PointInTime::from_epoch_millis_in(tz.clone(), millis).ok()
            },
        ))
    }
}
